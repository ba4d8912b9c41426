//! Download progress reporting.

use std::path::Path;

/// Receives download notifications for individual files.
///
/// Calls are made synchronously from the task performing the download. For
/// one file they arrive in order with non-decreasing byte counts; calls for
/// different files may interleave.
pub trait ProgressObserver: Send + Sync {
    /// The server accepted the request for `path` and the body is about to stream.
    fn on_download_start(&self, _path: &Path) {}

    /// `received` bytes of `total` have arrived for `path`.
    fn on_download_progress(&self, _path: &Path, _received: u64, _total: u64) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}
