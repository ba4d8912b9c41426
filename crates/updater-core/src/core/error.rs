use thiserror::Error;

pub type UpdaterResult<T> = Result<T, UpdaterError>;

#[derive(Error, Debug)]
pub enum UpdaterError {
    /// The remote origin did not answer the manifest probe at all.
    #[error("Update service is currently not available")]
    ServiceUnavailable,

    #[error("Manifest '{0}' could not be found")]
    ManifestNotFound(String),

    #[error("Manifest '{0}' does not match the expected schema")]
    InvalidManifestSchema(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Could not derive a local path for '{0}'")]
    PathDerivationError(String),

    #[error("Checksum mismatch for '{0}'")]
    ChecksumMismatch(String),

    #[error("Download of '{0}' failed")]
    DownloadFailed(String),

    /// Identity is (branch, repository, username, manifest).
    #[error("Dependency '{0}' is already registered")]
    DuplicateDependency(String),

    #[error("No dependencies registered")]
    NoDependencies,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),
}
