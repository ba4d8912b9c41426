use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use updater::progress::ProgressObserver;

/// Renders one progress bar per downloading file.
pub struct TerminalProgress {
    bars: MultiProgress,
    active: Mutex<HashMap<PathBuf, ProgressBar>>,
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg:40!} {bar:30.cyan/blue} {bytes}/{total_bytes}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bars: MultiProgress::new(),
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Finish every bar still on screen
    pub fn finish(&self) {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        for (_, bar) in active.drain() {
            bar.finish();
        }
    }
}

impl ProgressObserver for TerminalProgress {
    fn on_download_start(&self, path: &Path) {
        let bar = self.bars.add(ProgressBar::new(0));
        bar.set_style(bar_style());
        bar.set_message(path.display().to_string());

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = active.insert(path.to_path_buf(), bar) {
            previous.finish_and_clear();
        }
    }

    fn on_download_progress(&self, path: &Path, received: u64, total: u64) {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(bar) = active.get(path) {
            bar.set_length(total);
            bar.set_position(received);
        }
    }
}
