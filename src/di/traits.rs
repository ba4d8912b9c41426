//! Trait definitions for dependency injection

use crate::config::DependencyConfig;
use crate::core::UpdaterResult;
use crate::http::types::{DownloadEvent, ProbeStatus, TextResponse};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to application configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Base endpoint manifests are resolved against
    fn base_url(&self) -> &str;

    /// Read/write timeout of the shared transport
    fn timeout(&self) -> Duration;

    /// Default number of concurrent file updates per dependency
    fn max_parallelism(&self) -> usize;

    /// Directory hints and local paths are resolved against
    fn install_root(&self) -> PathBuf;

    /// Whether a `.bak` file is moved back when a download fails verification
    fn restore_backup_on_failure(&self) -> bool;

    /// Configured dependencies, in registration order
    fn dependencies(&self) -> &[DependencyConfig];
}

/// Trait for the shared HTTP session
///
/// One instance is shared by every dependency and every file. URLs passed
/// in are absolute; callers resolve relative ones with
/// [`join_url`](crate::http::join_url) against [`Transport::base_url`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Base endpoint of the remote origin
    fn base_url(&self) -> &str;

    /// HEAD request used as an existence probe. Never fails; an unanswered
    /// request is [`ProbeStatus::Unreachable`].
    async fn probe(&self, url: &str) -> ProbeStatus;

    /// GET a textual resource. Transport failures map to
    /// `UpdaterError::ServiceUnavailable`; non-success statuses are returned.
    async fn get_text(&self, url: &str) -> UpdaterResult<TextResponse>;

    /// Stream a file into memory, reporting each chunk through `on_event`.
    ///
    /// A non-success status or a broken transfer is `UpdaterError::DownloadFailed(url)`.
    async fn download(
        &self,
        url: &str,
        on_event: &(dyn Fn(DownloadEvent) + Send + Sync),
    ) -> UpdaterResult<Vec<u8>>;
}
