//! Update orchestration across registered dependencies
//!
//! A session owns the shared transport and an ordered, copy-on-write list of
//! dependencies. Updating walks the list strictly in registration order and
//! stops at the first dependency that fails.

use crate::core::{UpdaterError, UpdaterResult};
use crate::dependency::{DependencyEntry, DependencyReport};
use crate::di::{ConfigProvider, ServiceContainer, Transport};
use crate::progress::ProgressObserver;
use std::sync::{Arc, RwLock};

/// Result of a fully successful update run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// One report per dependency, in registration order
    pub dependencies: Vec<DependencyReport>,
}

impl UpdateReport {
    /// Files listed across every manifest
    pub fn total_files(&self) -> usize {
        self.dependencies.iter().map(|d| d.files).sum()
    }

    /// Files that had to be downloaded
    pub fn downloaded(&self) -> usize {
        self.dependencies.iter().map(|d| d.downloaded).sum()
    }
}

pub struct UpdateSession {
    transport: Arc<dyn Transport>,
    entries: RwLock<Arc<Vec<Arc<DependencyEntry>>>>,
}

impl UpdateSession {
    /// Create an empty session downloading through `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            entries: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Create an empty session sharing the container's transport
    pub fn from_container(container: &ServiceContainer) -> Self {
        Self::new(container.transport())
    }

    /// Register every dependency listed in `config`, in order.
    ///
    /// Each entry reports its downloads to `observer`. Registration stops at
    /// the first duplicate.
    pub fn register_configured(
        &self,
        config: &dyn ConfigProvider,
        observer: Arc<dyn ProgressObserver>,
    ) -> UpdaterResult<usize> {
        for dependency in config.dependencies() {
            let entry = dependency
                .to_entry(config)
                .with_observer(Arc::clone(&observer));
            self.register(entry)?;
        }
        Ok(config.dependencies().len())
    }

    /// Append an entry unless one with the same identity is registered.
    pub fn register(&self, entry: DependencyEntry) -> UpdaterResult<Arc<DependencyEntry>> {
        let key = entry.key();
        let mut guard = self.entries.write().unwrap_or_else(|e| e.into_inner());

        if guard.iter().any(|existing| existing.key() == key) {
            tracing::warn!(dependency = %key, "duplicate dependency rejected");
            return Err(UpdaterError::DuplicateDependency(key.to_string()));
        }

        let entry = Arc::new(entry);
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(Arc::clone(&entry));
        *guard = Arc::new(next);

        tracing::debug!(dependency = %key, "dependency registered");
        Ok(entry)
    }

    /// Snapshot of the registered entries, in registration order
    pub fn list_entries(&self) -> Arc<Vec<Arc<DependencyEntry>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Update every dependency, returning the first failure.
    ///
    /// Dependencies run one after another; within one dependency at most
    /// `max_parallelism` files are processed at a time.
    pub async fn try_update(&self, max_parallelism: usize) -> UpdaterResult<UpdateReport> {
        let entries = self.list_entries();
        if entries.is_empty() {
            return Err(UpdaterError::NoDependencies);
        }

        let mut report = UpdateReport::default();
        for entry in entries.iter() {
            tracing::info!(dependency = %entry.key(), "updating");
            match entry.update(Arc::clone(&self.transport), max_parallelism).await {
                Ok(dependency) => report.dependencies.push(dependency),
                Err(error) => {
                    tracing::error!(dependency = %entry.key(), error = %error, "update stopped");
                    return Err(error);
                }
            }
        }

        Ok(report)
    }

    /// `true` when at least one dependency is registered and all succeeded.
    pub async fn update(&self, max_parallelism: usize) -> bool {
        self.try_update(max_parallelism).await.is_ok()
    }
}
