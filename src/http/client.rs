//! `reqwest` transport implementation

use crate::core::{UpdaterError, UpdaterResult};
use crate::di::traits::{ConfigProvider, Transport};
use crate::http::types::{DownloadEvent, ProbeStatus, TextResponse};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, Client as HttpClient, Response};
use std::time::Duration;

/// Identifier advertised to the remote origin.
pub fn user_agent() -> String {
    format!("updater/Build-{}", env!("CARGO_PKG_VERSION"))
}

/// Shared HTTP session: one connection pool, cookie store and timeout for
/// every request the updater makes.
pub struct HttpTransport {
    http_client: HttpClient,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport from configuration
    pub fn new(config: &dyn ConfigProvider) -> UpdaterResult<Self> {
        Self::with_settings(config.base_url(), config.timeout())
    }

    /// Create a transport for an explicit base endpoint and timeout
    ///
    /// The timeout bounds connecting and each individual read, so a slow but
    /// steady transfer may take longer than `timeout` in total.
    pub fn with_settings(base_url: &str, timeout: Duration) -> UpdaterResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&user_agent())
                .map_err(|e| UpdaterError::Config(format!("Invalid user agent: {}", e)))?,
        );

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .cookie_store(true)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| UpdaterError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.to_string(),
        })
    }

    /// Content length of `url` as reported by a HEAD request
    async fn probe_content_length(&self, url: &str) -> Option<u64> {
        let response = self.http_client.head(url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        header_content_length(&response)
    }
}

/// Content length from the header, falling back to the body size hint.
fn header_content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .or_else(|| response.content_length())
}

#[async_trait]
impl Transport for HttpTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn probe(&self, url: &str) -> ProbeStatus {
        match self.http_client.head(url).send().await {
            Ok(response) => {
                tracing::debug!(url, status = %response.status(), "probe answered");
                ProbeStatus::Status(response.status().as_u16())
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "probe unanswered");
                ProbeStatus::Unreachable
            }
        }
    }

    async fn get_text(&self, url: &str) -> UpdaterResult<TextResponse> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::warn!(url, error = %e, "request failed");
            UpdaterError::ServiceUnavailable
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TextResponse { status, body })
    }

    async fn download(
        &self,
        url: &str,
        on_event: &(dyn Fn(DownloadEvent) + Send + Sync),
    ) -> UpdaterResult<Vec<u8>> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::warn!(url, error = %e, "download request failed");
            UpdaterError::DownloadFailed(url.to_string())
        })?;

        if !response.status().is_success() {
            tracing::warn!(url, status = %response.status(), "download refused");
            return Err(UpdaterError::DownloadFailed(url.to_string()));
        }

        let total = match header_content_length(&response) {
            Some(length) => Some(length),
            None => self.probe_content_length(url).await,
        };
        on_event(DownloadEvent::Started { total });

        let mut data = Vec::with_capacity(total.unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                tracing::warn!(url, error = %e, "download interrupted");
                UpdaterError::DownloadFailed(url.to_string())
            })?;
            data.extend_from_slice(&chunk);
            on_event(DownloadEvent::Progress {
                received: data.len() as u64,
                total,
            });
        }

        if data.is_empty() {
            on_event(DownloadEvent::Progress { received: 0, total });
        }

        Ok(data)
    }
}
