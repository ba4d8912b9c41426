//! Human-readable hints attached to errors shown by the CLI.

use crate::core::error::UpdaterError;

/// Suggests a next step for an error.
pub trait ErrorHelp {
    fn help(&self) -> Option<&'static str>;
}

impl ErrorHelp for UpdaterError {
    fn help(&self) -> Option<&'static str> {
        match self {
            UpdaterError::ServiceUnavailable | UpdaterError::Http(_) => {
                Some("Check your network connection and the configured base_url.")
            }
            UpdaterError::ManifestNotFound(_) => Some(
                "Verify the username, repository, branch and manifest name of the dependency.",
            ),
            UpdaterError::InvalidManifestSchema(_) => Some(
                "The manifest must be a JSON array of objects with string 'sha' and 'url' fields.",
            ),
            UpdaterError::InvalidConfiguration(_)
            | UpdaterError::Config(_)
            | UpdaterError::Yaml(_) => {
                Some("Review config.yaml or run `updater add` to register a dependency.")
            }
            UpdaterError::PathDerivationError(_) => Some(
                "Add an environment hint that occurs in the file URL (`updater add --env <hint>`).",
            ),
            UpdaterError::ChecksumMismatch(_) => {
                Some("The remote file does not match its manifest checksum; try again later.")
            }
            UpdaterError::DuplicateDependency(_) => {
                Some("Each branch/repository/username/manifest combination may only be added once.")
            }
            UpdaterError::NoDependencies => Some("Register one with `updater add`."),
            _ => None,
        }
    }
}

/// Render an error followed by its hint, if any.
pub fn format_error_with_help(error: &UpdaterError) -> String {
    match error.help() {
        Some(help) => format!("Error: {}\n  help: {}", error, help),
        None => format!("Error: {}", error),
    }
}
