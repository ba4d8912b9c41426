pub mod add;
pub mod checksum;
pub mod list;
pub mod progress;
pub mod update;

use std::path::{Path, PathBuf};
use updater::config::Config;
use updater::core::path::config_file;
use updater::core::UpdaterResult;

/// Config file selected by `--config`, falling back to the platform default
pub fn config_path(explicit: Option<&Path>) -> UpdaterResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => config_file(),
    }
}

/// Load (or create) the config at the selected location
pub fn load_config(explicit: Option<&Path>) -> UpdaterResult<Config> {
    Config::load_from(&config_path(explicit)?)
}
