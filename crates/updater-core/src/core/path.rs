use crate::core::error::{UpdaterError, UpdaterResult};
use std::path::{Path, PathBuf};

/// Get the updater home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\updater
/// - Linux: ~/.config/updater
/// - macOS: ~/Library/Application Support/updater
pub fn updater_home() -> UpdaterResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| UpdaterError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("updater"))
}

/// Get the config file path
///
/// `UPDATER_CONFIG` takes precedence over the platform location.
pub fn config_file() -> UpdaterResult<PathBuf> {
    if let Ok(path) = std::env::var("UPDATER_CONFIG") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    Ok(updater_home()?.join("config.yaml"))
}

/// Path of the single-generation backup kept next to `path`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> UpdaterResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
