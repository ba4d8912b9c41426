//! Checksum-gated update of a single manifest file.

use crate::checksum::{checksum_file_async, matches};
use crate::core::path::backup_path;
use crate::core::{UpdaterError, UpdaterResult};
use crate::dependency::DependencyEntry;
use crate::di::Transport;
use crate::http::{join_url, DownloadEvent};
use crate::manifest::ManifestFile;
use std::path::Path;
use tokio::fs;

/// What happened to one manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The local checksum already matched; nothing was touched.
    UpToDate,
    /// The file was downloaded and verified.
    Updated,
}

impl DependencyEntry {
    /// Bring the local copy of `file` in line with its manifest checksum.
    ///
    /// An existing file that is about to be replaced is first renamed to
    /// `{path}.bak`; any older backup is removed beforehand so only one
    /// generation is kept.
    pub async fn update_file(
        &self,
        transport: &dyn Transport,
        file: &ManifestFile,
    ) -> UpdaterResult<FileOutcome> {
        let path = self.local_path_for(&file.url)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let backup = backup_path(&path);
        if fs::try_exists(&backup).await? {
            fs::remove_file(&backup).await?;
        }

        let current = checksum_file_async(path.clone()).await?;
        if let Some(actual) = &current {
            if matches(actual, &file.checksum) {
                tracing::debug!(path = %path.display(), "up to date");
                return Ok(FileOutcome::UpToDate);
            }
        }

        let backed_up = current.is_some();
        if backed_up {
            fs::rename(&path, &backup).await?;
        }

        match self.download_verified(transport, file, &path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "updated");
                Ok(FileOutcome::Updated)
            }
            Err(error) => {
                if backed_up && self.restores_backup_on_failure() {
                    restore_backup(&path, &backup).await;
                }
                Err(error)
            }
        }
    }

    async fn download_verified(
        &self,
        transport: &dyn Transport,
        file: &ManifestFile,
        path: &Path,
    ) -> UpdaterResult<()> {
        let url = join_url(transport.base_url(), &file.url);
        let observer = self.observer();

        let data = transport
            .download(&url, &|event| match event {
                DownloadEvent::Started { .. } => observer.on_download_start(path),
                DownloadEvent::Progress { received, total } => {
                    observer.on_download_progress(path, received, total.unwrap_or(received))
                }
            })
            .await
            .map_err(|error| match error {
                UpdaterError::DownloadFailed(_) => error,
                other => {
                    tracing::warn!(url = %url, error = %other, "download failed");
                    UpdaterError::DownloadFailed(file.url.clone())
                }
            })?;

        fs::write(path, &data).await?;

        match checksum_file_async(path.to_path_buf()).await? {
            Some(actual) if matches(&actual, &file.checksum) => Ok(()),
            _ => {
                tracing::warn!(path = %path.display(), expected = %file.checksum, "checksum mismatch");
                Err(UpdaterError::ChecksumMismatch(path.display().to_string()))
            }
        }
    }
}

/// Put the previous version back after a failed update.
async fn restore_backup(path: &Path, backup: &Path) {
    if let Ok(true) = fs::try_exists(path).await {
        if let Err(e) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "could not discard failed download");
            return;
        }
    }
    match fs::rename(backup, path).await {
        Ok(()) => tracing::warn!(path = %path.display(), "restored previous version"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "could not restore backup"),
    }
}
