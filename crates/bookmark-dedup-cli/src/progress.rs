use bookmark_dedup_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// CLI progress reporter using indicatif.
///
/// - Scan: spinner
/// - Delete: progress bar over the selected ids
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message("Scanning bookmarks...");
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_scan_complete(&self, bookmarks: usize, groups: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} bookmarks, {} duplicate groups in {:.2}s",
            bookmarks, groups, duration_secs
        );
    }

    fn on_delete_start(&self, total: usize) {
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("  Removing [{bar:30.cyan/dim}] {pos}/{len} bookmarks")
        {
            pb.set_style(style.progress_chars("━╸─"));
        }
        self.set_bar(pb);
    }

    fn on_delete_progress(&self, removed: usize, _total: usize) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_position(removed as u64);
            }
        }
    }

    fn on_delete_complete(&self, removed: usize) {
        self.finish_bar();
        eprintln!("  \x1b[32m✓\x1b[0m Removed {} bookmarks", removed);
    }
}
