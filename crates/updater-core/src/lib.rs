//! Core types shared by the updater binary and library.
//!
//! Holds the error taxonomy, user-facing error hints and the platform
//! paths used for configuration.

pub mod core;

pub use core::error::{UpdaterError, UpdaterResult};
pub use core::error_help::{format_error_with_help, ErrorHelp};
