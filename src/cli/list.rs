use crate::cli::load_config;
use std::path::Path;
use updater::core::UpdaterResult;
use updater::di::ConfigProvider;

pub fn run(config_path: Option<&Path>) -> UpdaterResult<()> {
    let config = load_config(config_path)?;

    if config.dependencies().is_empty() {
        println!("No dependencies configured.");
        return Ok(());
    }

    println!("Base URL: {}", config.base_url());
    println!("Install root: {}", config.install_root().display());
    println!("\nDependencies:");
    for dependency in config.dependencies() {
        let hints = match &dependency.environment {
            Some(hints) => hints.join(", "),
            None => dependency.manifest.clone(),
        };
        println!("  {} [{}]", dependency.key(), hints);
    }

    Ok(())
}
