use crate::config::default_branch;
use crate::core::{UpdaterError, UpdaterResult};
use crate::dependency::file_update::FileOutcome;
use crate::di::Transport;
use crate::http::{join_url, ProbeStatus};
use crate::manifest::{manifest_path, parse_manifest, ManifestFile};
use crate::progress::{NoopObserver, ProgressObserver};
use crate::runner::BoundedRunner;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Identity of a dependency; two entries with the same key are duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyKey {
    pub branch: String,
    pub repository_name: String,
    pub username: String,
    pub manifest_filename: String,
}

impl fmt::Display for DependencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}:{}",
            self.username, self.repository_name, self.branch, self.manifest_filename
        )
    }
}

/// What one successful dependency update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    pub key: DependencyKey,
    /// Files listed in the manifest
    pub files: usize,
    /// Files that had to be downloaded
    pub downloaded: usize,
}

/// One repository + manifest pairing whose files are kept in sync locally.
pub struct DependencyEntry {
    username: String,
    repository_name: String,
    branch: String,
    manifest_filename: String,
    environment: Option<Vec<String>>,
    install_root: PathBuf,
    restore_backup_on_failure: bool,
    observer: Arc<dyn ProgressObserver>,
    manifest_files: RwLock<Option<Vec<ManifestFile>>>,
}

impl fmt::Debug for DependencyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyEntry")
            .field("key", &self.key())
            .field("environment", &self.environment)
            .field("install_root", &self.install_root)
            .finish_non_exhaustive()
    }
}

impl DependencyEntry {
    /// Create an entry on the default branch with no environment hints
    pub fn new(
        username: impl Into<String>,
        repository_name: impl Into<String>,
        manifest_filename: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            repository_name: repository_name.into(),
            branch: default_branch(),
            manifest_filename: manifest_filename.into(),
            environment: None,
            install_root: PathBuf::from("."),
            restore_backup_on_failure: true,
            observer: Arc::new(NoopObserver),
            manifest_files: RwLock::new(None),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_environment(mut self, hints: Vec<String>) -> Self {
        self.environment = Some(hints);
        self
    }

    pub fn with_install_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.install_root = root.into();
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_backup_restore(mut self, restore: bool) -> Self {
        self.restore_backup_on_failure = restore;
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn manifest_filename(&self) -> &str {
        &self.manifest_filename
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn restores_backup_on_failure(&self) -> bool {
        self.restore_backup_on_failure
    }

    pub(crate) fn observer(&self) -> &dyn ProgressObserver {
        self.observer.as_ref()
    }

    pub fn key(&self) -> DependencyKey {
        DependencyKey {
            branch: self.branch.clone(),
            repository_name: self.repository_name.clone(),
            username: self.username.clone(),
            manifest_filename: self.manifest_filename.clone(),
        }
    }

    /// Environment hints, defaulting to the manifest name when unset.
    pub fn environment_hints(&self) -> Vec<String> {
        match &self.environment {
            Some(hints) => hints.clone(),
            None => vec![self.manifest_filename.clone()],
        }
    }

    /// Files from the last successful validation, if any.
    pub fn manifest_files(&self) -> Option<Vec<ManifestFile>> {
        self.manifest_files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn manifest_url(&self, base_url: &str) -> String {
        join_url(
            base_url,
            &manifest_path(
                &self.username,
                &self.repository_name,
                &self.branch,
                &self.manifest_filename,
            ),
        )
    }

    pub(crate) fn check_manifest_filename(&self) -> UpdaterResult<()> {
        if self.manifest_filename.trim().is_empty() {
            return Err(UpdaterError::InvalidConfiguration(format!(
                "manifest filename of {}/{} is empty or whitespace",
                self.username, self.repository_name
            )));
        }
        Ok(())
    }

    /// Probe, fetch and parse the manifest, replacing any earlier file list.
    pub async fn validate(&self, transport: &dyn Transport) -> UpdaterResult<Vec<ManifestFile>> {
        self.check_manifest_filename()?;

        let url = self.manifest_url(transport.base_url());
        let probe = transport.probe(&url).await;
        tracing::debug!(url = %url, ?probe, "manifest probe");

        if !probe.is_success() {
            return Err(match probe {
                ProbeStatus::Unreachable => UpdaterError::ServiceUnavailable,
                ProbeStatus::Status(_) => {
                    UpdaterError::ManifestNotFound(self.manifest_filename.clone())
                }
            });
        }

        let response = transport.get_text(&url).await?;
        if !response.is_success() {
            return Err(UpdaterError::ManifestNotFound(self.manifest_filename.clone()));
        }

        let files = parse_manifest(&self.manifest_filename, &response.body)?;
        tracing::debug!(dependency = %self.key(), files = files.len(), "manifest validated");

        *self
            .manifest_files
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(files.clone());

        Ok(files)
    }

    /// Reject manifests where two files land on the same local path.
    ///
    /// Files whose path cannot be derived are left to fail in their own
    /// update so siblings still run.
    fn check_distinct_paths(&self, files: &[ManifestFile]) -> UpdaterResult<()> {
        let mut seen = HashSet::new();
        for file in files {
            let Ok(path) = self.local_path_for(&file.url) else {
                continue;
            };
            if !seen.insert(path) {
                tracing::warn!(dependency = %self.key(), url = %file.url, "duplicate local path");
                return Err(UpdaterError::PathDerivationError(file.url.clone()));
            }
        }
        Ok(())
    }

    /// Validate the manifest and bring every listed file up to date.
    ///
    /// Files run through a [`BoundedRunner`] of `max_parallelism`. Any file
    /// failure fails the dependency, after all started files have finished.
    pub async fn update(
        self: &Arc<Self>,
        transport: Arc<dyn Transport>,
        max_parallelism: usize,
    ) -> UpdaterResult<DependencyReport> {
        let files = self.validate(transport.as_ref()).await?;
        let total = files.len();
        self.check_distinct_paths(&files)?;

        let operations = files.into_iter().map(|file| {
            let entry = Arc::clone(self);
            let transport = Arc::clone(&transport);
            async move { entry.update_file(transport.as_ref(), &file).await }
        });

        let summary = BoundedRunner::new(max_parallelism).run(operations).await;
        if !summary.is_success() {
            tracing::warn!(
                dependency = %self.key(),
                failed = summary.failures.len(),
                "dependency update failed"
            );
        }

        let outcomes = summary.into_result()?;
        let downloaded = outcomes
            .iter()
            .filter(|outcome| **outcome == FileOutcome::Updated)
            .count();

        tracing::info!(dependency = %self.key(), files = total, downloaded, "dependency up to date");

        Ok(DependencyReport {
            key: self.key(),
            files: total,
            downloaded,
        })
    }
}
