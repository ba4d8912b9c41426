use crate::cli::{config_path as resolve_config_path, load_config};
use std::path::Path;
use updater::config::DependencyConfig;
use updater::core::{UpdaterError, UpdaterResult};

pub struct AddOptions {
    pub username: String,
    pub repository: String,
    pub manifest: String,
    pub branch: String,
    pub environment: Vec<String>,
}

pub fn run(config_path: Option<&Path>, options: AddOptions) -> UpdaterResult<()> {
    if options.manifest.trim().is_empty() {
        return Err(UpdaterError::InvalidConfiguration(
            "manifest name must not be empty".to_string(),
        ));
    }

    let path = resolve_config_path(config_path)?;
    let mut config = load_config(Some(&path))?;

    let dependency = DependencyConfig {
        username: options.username,
        repository: options.repository,
        branch: options.branch,
        manifest: options.manifest,
        environment: if options.environment.is_empty() {
            None
        } else {
            Some(options.environment)
        },
    };
    let key = dependency.key();

    config.add_dependency(dependency)?;
    config.save_to(&path)?;

    println!("✓ Added {}", key);
    Ok(())
}
