//! Mock implementations of service traits for testing

use super::traits::{ConfigProvider, Transport};
use crate::config::DependencyConfig;
use crate::core::{UpdaterError, UpdaterResult};
use crate::http::types::{is_success, DownloadEvent, ProbeStatus, TextResponse};
use crate::progress::ProgressObserver;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use updater::di::mocks::MockConfigProvider;
/// use updater::di::ConfigProvider;
///
/// let mut config = MockConfigProvider::default();
/// config.max_parallelism = 4;
///
/// assert_eq!(config.max_parallelism(), 4);
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub base_url: String,
    pub timeout: Duration,
    pub max_parallelism: usize,
    pub install_root: PathBuf,
    pub restore_backup_on_failure: bool,
    pub dependencies: Vec<DependencyConfig>,
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            base_url: "https://origin.test/".to_string(),
            timeout: Duration::from_secs(30),
            max_parallelism: 2,
            install_root: PathBuf::from("."),
            restore_backup_on_failure: true,
            dependencies: Vec::new(),
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    fn install_root(&self) -> PathBuf {
        self.install_root.clone()
    }

    fn restore_backup_on_failure(&self) -> bool {
        self.restore_backup_on_failure
    }

    fn dependencies(&self) -> &[DependencyConfig] {
        &self.dependencies
    }
}

#[derive(Clone)]
struct MockResponse {
    status: u16,
    body: Vec<u8>,
}

/// In-memory stand-in for the HTTP session
///
/// Unknown URLs answer 404. Every request is logged as `(method, url)`.
///
/// # Example
///
/// ```
/// use updater::di::mocks::MockTransport;
///
/// let transport = MockTransport::new("https://origin.test/");
/// transport.add_text("https://origin.test/octo/game/master/assets.json", "[]");
/// transport.add_file("https://cdn.test/assets/a.png", b"png".to_vec());
///
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Clone)]
pub struct MockTransport {
    base_url: String,
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    unreachable: Arc<Mutex<bool>>,
    get_statuses: Arc<Mutex<HashMap<String, u16>>>,
    broken_gets: Arc<Mutex<HashSet<String>>>,
    chunk_size: usize,
    latency: Option<Duration>,
    active_downloads: Arc<AtomicUsize>,
    peak_downloads: Arc<AtomicUsize>,
}

impl MockTransport {
    /// Create a mock transport with no registered resources
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            unreachable: Arc::new(Mutex::new(false)),
            get_statuses: Arc::new(Mutex::new(HashMap::new())),
            broken_gets: Arc::new(Mutex::new(HashSet::new())),
            chunk_size: 4,
            latency: None,
            active_downloads: Arc::new(AtomicUsize::new(0)),
            peak_downloads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Deliver download bodies in chunks of `size` bytes
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Hold every download open for `latency` before streaming
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Serve `body` with status 200, replacing any earlier response
    pub fn add_text(&self, url: &str, body: &str) {
        self.add_response(url, 200, body.as_bytes().to_vec());
    }

    /// Serve binary `content` with status 200
    pub fn add_file(&self, url: &str, content: Vec<u8>) {
        self.add_response(url, 200, content);
    }

    /// Answer `url` with an empty body and the given status
    pub fn add_status(&self, url: &str, status: u16) {
        self.add_response(url, status, Vec::new());
    }

    fn add_response(&self, url: &str, status: u16, body: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), MockResponse { status, body });
    }

    /// Make every request behave as if the origin could not be reached
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().unwrap() = unreachable;
    }

    /// Answer text GETs of `url` with `status` while HEAD keeps the
    /// registered response
    pub fn set_get_status(&self, url: &str, status: u16) {
        self.get_statuses
            .lock()
            .unwrap()
            .insert(url.to_string(), status);
    }

    /// Fail text GETs of `url` at transport level while HEAD still answers
    pub fn break_get(&self, url: &str) {
        self.broken_gets.lock().unwrap().insert(url.to_string());
    }

    /// Requests made so far, in order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of GET requests made for `url`
    pub fn download_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(method, requested)| method == "GET" && requested == url)
            .count()
    }

    /// Highest number of downloads observed in flight at once
    pub fn peak_concurrent_downloads(&self) -> usize {
        self.peak_downloads.load(Ordering::SeqCst)
    }

    fn record(&self, method: &str, url: &str) {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), url.to_string()));
    }

    fn is_unreachable(&self) -> bool {
        *self.unreachable.lock().unwrap()
    }

    fn response(&self, url: &str) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or(MockResponse {
                status: 404,
                body: Vec::new(),
            })
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn probe(&self, url: &str) -> ProbeStatus {
        self.record("HEAD", url);
        if self.is_unreachable() {
            return ProbeStatus::Unreachable;
        }
        ProbeStatus::Status(self.response(url).status)
    }

    async fn get_text(&self, url: &str) -> UpdaterResult<TextResponse> {
        self.record("GET", url);
        if self.is_unreachable() || self.broken_gets.lock().unwrap().contains(url) {
            return Err(UpdaterError::ServiceUnavailable);
        }
        let response = self.response(url);
        let status = self
            .get_statuses
            .lock()
            .unwrap()
            .get(url)
            .copied()
            .unwrap_or(response.status);
        Ok(TextResponse {
            status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        })
    }

    async fn download(
        &self,
        url: &str,
        on_event: &(dyn Fn(DownloadEvent) + Send + Sync),
    ) -> UpdaterResult<Vec<u8>> {
        self.record("GET", url);
        if self.is_unreachable() {
            return Err(UpdaterError::DownloadFailed(url.to_string()));
        }

        let response = self.response(url);
        if !is_success(response.status) {
            return Err(UpdaterError::DownloadFailed(url.to_string()));
        }

        let now = self.active_downloads.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_downloads.fetch_max(now, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let total = Some(response.body.len() as u64);
        on_event(DownloadEvent::Started { total });

        let mut data = Vec::with_capacity(response.body.len());
        for chunk in response.body.chunks(self.chunk_size) {
            data.extend_from_slice(chunk);
            on_event(DownloadEvent::Progress {
                received: data.len() as u64,
                total,
            });
            tokio::task::yield_now().await;
        }
        if data.is_empty() {
            on_event(DownloadEvent::Progress { received: 0, total });
        }

        self.active_downloads.fetch_sub(1, Ordering::SeqCst);
        Ok(data)
    }
}

/// One notification seen by a [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Started(PathBuf),
    Progress(PathBuf, u64, u64),
}

/// Progress observer that keeps every notification for later inspection
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, in arrival order
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Notifications concerning `path`, in arrival order
    pub fn events_for(&self, path: &Path) -> Vec<ObservedEvent> {
        self.events()
            .into_iter()
            .filter(|event| match event {
                ObservedEvent::Started(p) | ObservedEvent::Progress(p, _, _) => p == path,
            })
            .collect()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_download_start(&self, path: &Path) {
        self.events
            .lock()
            .unwrap()
            .push(ObservedEvent::Started(path.to_path_buf()));
    }

    fn on_download_progress(&self, path: &Path, received: u64, total: u64) {
        self.events
            .lock()
            .unwrap()
            .push(ObservedEvent::Progress(path.to_path_buf(), received, total));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let transport = MockTransport::new("https://origin.test/");
        assert_eq!(
            transport.probe("https://origin.test/x").await,
            ProbeStatus::Status(404)
        );
        let response = transport.get_text("https://origin.test/x").await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_download_is_chunked() {
        let transport = MockTransport::new("https://origin.test/").with_chunk_size(2);
        transport.add_file("https://cdn.test/f", b"abcde".to_vec());

        let events = Mutex::new(Vec::new());
        let data = transport
            .download("https://cdn.test/f", &|event| events.lock().unwrap().push(event))
            .await
            .unwrap();

        assert_eq!(data, b"abcde");
        let events = events.into_inner().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[3],
            DownloadEvent::Progress {
                received: 5,
                total: Some(5)
            }
        );
        assert_eq!(transport.download_count("https://cdn.test/f"), 1);
        assert_eq!(transport.peak_concurrent_downloads(), 1);
    }

    #[test]
    fn test_recording_observer_filters_by_path() {
        let observer = RecordingObserver::new();
        observer.on_download_start(Path::new("a"));
        observer.on_download_start(Path::new("b"));
        observer.on_download_progress(Path::new("a"), 1, 2);

        assert_eq!(
            observer.events_for(Path::new("a")),
            vec![
                ObservedEvent::Started(PathBuf::from("a")),
                ObservedEvent::Progress(PathBuf::from("a"), 1, 2)
            ]
        );
    }
}
