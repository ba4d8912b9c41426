//! HTTP transport shared by all dependencies
//!
//! This module provides:
//! - The wire-level types exchanged with the [`Transport`](crate::di::Transport) trait
//! - A `reqwest`-backed transport with base endpoint, timeout, user agent and cookies
//! - URL joining against the base endpoint

pub mod client;
pub mod types;

pub use client::HttpTransport;
pub use types::{is_success, DownloadEvent, ProbeStatus, TextResponse};

/// Resolve `url` against `base` unless it is already absolute.
pub fn join_url(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") || base.is_empty() {
        return url.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        url.trim_start_matches('/')
    )
}
