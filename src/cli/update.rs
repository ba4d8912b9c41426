use crate::cli::load_config;
use crate::cli::progress::TerminalProgress;
use std::path::Path;
use std::sync::Arc;
use updater::core::UpdaterResult;
use updater::di::{ConfigProvider, ServiceContainer};
use updater::session::UpdateSession;

pub async fn run(config_path: Option<&Path>, jobs: Option<usize>) -> UpdaterResult<()> {
    let config = load_config(config_path)?;
    let container = ServiceContainer::new(config)?;
    let max_parallelism = jobs.unwrap_or_else(|| container.config().max_parallelism());

    let progress = Arc::new(TerminalProgress::new());
    let session = UpdateSession::from_container(&container);
    session.register_configured(container.config(), progress.clone())?;

    let result = session.try_update(max_parallelism).await;
    progress.finish();
    let report = result?;

    for dependency in &report.dependencies {
        println!(
            "✓ {} ({} files, {} downloaded)",
            dependency.key, dependency.files, dependency.downloaded
        );
    }
    println!(
        "\nUp to date: {} dependencies, {} files, {} downloaded",
        report.dependencies.len(),
        report.total_files(),
        report.downloaded()
    );

    Ok(())
}
