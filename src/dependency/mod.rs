//! Tracked dependencies
//!
//! A dependency pairs a repository (username, name, branch) with a manifest
//! file listing the files to keep in sync. Updating one:
//! 1. probes and fetches `{base}/{user}/{repo}/{branch}/{manifest}.json`
//! 2. maps every listed URL onto a local path through environment hints
//! 3. downloads files whose checksum differs, at most K at a time

pub mod entry;
pub mod file_update;
pub mod local_path;

pub use entry::{DependencyEntry, DependencyKey, DependencyReport};
pub use file_update::FileOutcome;
pub use local_path::{derive_relative_path, select_hint};
