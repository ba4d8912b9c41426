//! Mapping manifest URLs onto local paths
//!
//! Environment hints are path fragments chosen by the caller. The hint that
//! occurs furthest to the right in a URL anchors the local path: everything
//! from the hint onwards is kept, so directory structure embedded in the URL
//! survives. A hint matching at the very start of the URL keeps only the
//! final segment.

use crate::core::path::ensure_dir;
use crate::core::{UpdaterError, UpdaterResult};
use crate::dependency::DependencyEntry;
use std::path::{Component, Path, PathBuf};

/// Pick the hint whose last occurrence in `url` starts furthest right.
///
/// Returns the match index and the hint. Blank hints never match.
pub fn select_hint<'a>(url: &str, hints: &'a [String]) -> Option<(usize, &'a str)> {
    hints
        .iter()
        .filter(|hint| !hint.trim().is_empty())
        .filter_map(|hint| url.rfind(hint.as_str()).map(|index| (index, hint.as_str())))
        .fold(None, |best: Option<(usize, &str)>, candidate| match best {
            Some((index, _)) if index >= candidate.0 => best,
            _ => Some(candidate),
        })
}

/// Relative local path for `url` under the given hints.
pub fn derive_relative_path(url: &str, hints: &[String]) -> UpdaterResult<String> {
    let (index, _) = select_hint(url, hints)
        .ok_or_else(|| UpdaterError::PathDerivationError(url.to_string()))?;

    let relative = if index == 0 {
        url.rsplit(['/', '\\']).next().unwrap_or(url)
    } else {
        &url[index..]
    };

    if !is_contained(Path::new(relative)) {
        return Err(UpdaterError::PathDerivationError(url.to_string()));
    }

    Ok(relative.to_string())
}

/// A non-empty relative path that cannot climb out of its root.
fn is_contained(path: &Path) -> bool {
    let mut components = path.components().peekable();
    if components.peek().is_none() {
        return false;
    }
    components.all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Create every non-blank hint directory missing under `root`.
pub fn ensure_environment(root: &Path, hints: &[String]) -> UpdaterResult<()> {
    for hint in hints.iter().filter(|hint| !hint.trim().is_empty()) {
        if !is_contained(Path::new(hint)) {
            return Err(UpdaterError::InvalidConfiguration(format!(
                "environment hint '{}' must be a relative path",
                hint
            )));
        }
        ensure_dir(&root.join(hint))?;
    }
    Ok(())
}

impl DependencyEntry {
    /// Local path for a manifest URL, bootstrapping hint directories first.
    pub fn local_path_for(&self, url: &str) -> UpdaterResult<PathBuf> {
        self.check_manifest_filename()?;

        let hints = self.environment_hints();
        if hints.is_empty() {
            return Err(UpdaterError::InvalidConfiguration(format!(
                "no environment hints for {}",
                self.key()
            )));
        }

        ensure_environment(self.install_root(), &hints)?;

        let relative = derive_relative_path(url, &hints)?;
        Ok(self.install_root().join(relative))
    }
}
