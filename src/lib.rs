//! Manifest-driven self-update client
//!
//! Tracks repository-hosted manifests listing files by URL and checksum, and
//! keeps local copies of those files in sync. The error taxonomy and
//! platform paths live in `updater-core` and are re-exported here.

pub use updater_core::{format_error_with_help, ErrorHelp, UpdaterError, UpdaterResult};

/// Core module re-exported from updater-core.
pub mod core {
    pub use updater_core::core::*;
    pub use updater_core::*;

    /// Path module re-exported from updater-core.
    pub mod path {
        pub use updater_core::core::path::*;
    }
}

/// Checksum computation and comparison.
pub mod checksum;

/// Configuration management.
pub mod config;

/// Tracked dependencies and per-file updates.
pub mod dependency;

/// Dependency injection infrastructure.
pub mod di;

/// HTTP transport.
pub mod http;

/// Manifest format.
pub mod manifest;

/// Download progress reporting.
pub mod progress;

/// Bounded concurrency for per-file work.
pub mod runner;

/// Update orchestration.
pub mod session;

pub use dependency::DependencyEntry;
pub use manifest::ManifestFile;
pub use session::{UpdateReport, UpdateSession};
