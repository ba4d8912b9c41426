use crate::core::path::{config_file, ensure_dir};
use crate::core::{UpdaterError, UpdaterResult};
use crate::dependency::{DependencyEntry, DependencyKey};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base endpoint manifests live under
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Read/write timeout of the shared HTTP session, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Concurrent file updates per dependency
    #[serde(default = "default_max_parallelism")]
    pub max_parallelism: usize,

    /// Directory local files are written under (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_root: Option<PathBuf>,

    /// Move `{file}.bak` back into place when a download fails verification
    #[serde(default = "default_true")]
    pub restore_backup_on_failure: bool,

    /// Tracked dependencies, updated in this order
    #[serde(default)]
    pub dependencies: Vec<DependencyConfig>,
}

/// One dependency as written in config.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyConfig {
    pub username: String,
    pub repository: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Manifest name without the `.json` suffix
    pub manifest: String,
    /// Path fragments mapping file URLs onto local directories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Vec<String>>,
}

fn default_base_url() -> String {
    "https://raw.githubusercontent.com/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_parallelism() -> usize {
    2
}

pub(crate) fn default_branch() -> String {
    "master".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_parallelism: default_max_parallelism(),
            install_root: None,
            restore_backup_on_failure: true,
            dependencies: Vec::new(),
        }
    }
}

impl DependencyConfig {
    pub fn key(&self) -> DependencyKey {
        DependencyKey {
            branch: self.branch.clone(),
            repository_name: self.repository.clone(),
            username: self.username.clone(),
            manifest_filename: self.manifest.clone(),
        }
    }

    /// Build an unvalidated entry for this dependency
    pub fn to_entry(&self, config: &dyn ConfigProvider) -> DependencyEntry {
        let entry = DependencyEntry::new(&self.username, &self.repository, &self.manifest)
            .with_branch(&self.branch)
            .with_install_root(config.install_root())
            .with_backup_restore(config.restore_backup_on_failure());

        match &self.environment {
            Some(hints) => entry.with_environment(hints.clone()),
            None => entry,
        }
    }
}

impl Config {
    /// Load config from the platform-specific config file, creating a default
    /// one if it doesn't exist
    ///
    /// Config locations (`UPDATER_CONFIG` overrides all of them):
    /// - Windows: %APPDATA%\updater\config.yaml
    /// - Linux: ~/.config/updater/config.yaml
    /// - macOS: ~/Library/Application Support/updater/config.yaml
    pub fn load() -> UpdaterResult<Self> {
        Self::load_from(&config_file()?)
    }

    /// Load config from an explicit path, creating a default one if missing
    pub fn load_from(config_path: &Path) -> UpdaterResult<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = fs::read_to_string(config_path)?;
        let config: Config = serde_yaml::from_str(&content)?;

        config.validate()?;
        Ok(config)
    }

    /// Save config to the platform-specific config file
    pub fn save(&self) -> UpdaterResult<()> {
        self.save_to(&config_file()?)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, config_path: &Path) -> UpdaterResult<()> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.as_os_str().is_empty() {
                ensure_dir(config_dir)?;
            }
        }

        let content = serde_yaml::to_string(self)?;

        fs::write(config_path, content)?;
        Ok(())
    }

    /// Reject settings the updater cannot work with
    pub fn validate(&self) -> UpdaterResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(UpdaterError::Config("base_url must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(UpdaterError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Append a dependency, rejecting an identical one
    pub fn add_dependency(&mut self, dependency: DependencyConfig) -> UpdaterResult<()> {
        let key = dependency.key();
        if self.dependencies.iter().any(|d| d.key() == key) {
            return Err(UpdaterError::DuplicateDependency(key.to_string()));
        }
        self.dependencies.push(dependency);
        Ok(())
    }
}

// Implement ConfigProvider trait
impl ConfigProvider for Config {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    fn install_root(&self) -> PathBuf {
        self.install_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn restore_backup_on_failure(&self) -> bool {
        self.restore_backup_on_failure
    }

    fn dependencies(&self) -> &[DependencyConfig] {
        &self.dependencies
    }
}
