//! Manifest entries and manifest decoding.

use crate::core::{UpdaterError, UpdaterResult};
use serde::{Deserialize, Serialize};

/// One file listed in a dependency manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    /// Where the file is downloaded from.
    pub url: String,

    /// Expected hex SHA-512 of the file content.
    #[serde(rename = "sha")]
    pub checksum: String,
}

impl ManifestFile {
    pub fn new(url: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            checksum: checksum.into(),
        }
    }
}

/// Parse a manifest body: a JSON array of `{"sha": ..., "url": ...}` objects.
///
/// Any decoding problem is reported as [`UpdaterError::InvalidManifestSchema`]
/// carrying the manifest name.
pub fn parse_manifest(manifest_name: &str, content: &str) -> UpdaterResult<Vec<ManifestFile>> {
    serde_json::from_str::<Vec<ManifestFile>>(content).map_err(|e| {
        tracing::debug!(manifest = manifest_name, error = %e, "manifest rejected");
        UpdaterError::InvalidManifestSchema(manifest_name.to_string())
    })
}

/// Relative location of a manifest below the base endpoint.
pub fn manifest_path(username: &str, repository: &str, branch: &str, manifest: &str) -> String {
    format!("{}/{}/{}/{}.json", username, repository, branch, manifest)
}
