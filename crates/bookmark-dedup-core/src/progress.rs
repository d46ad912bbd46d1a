/// Trait for reporting scan and deletion progress.
///
/// CLI implements with indicatif, tests and the message loop use `SilentReporter`.
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_complete(&self, _bookmarks: usize, _groups: usize, _duration_secs: f64) {}
    fn on_delete_start(&self, _total: usize) {}
    fn on_delete_progress(&self, _removed: usize, _total: usize) {}
    fn on_delete_complete(&self, _removed: usize) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + ?Sized>() {}

    #[test]
    fn test_reporters_are_shareable_across_threads() {
        assert_send_sync::<dyn ProgressReporter>();
        assert_send_sync::<SilentReporter>();

        let reporter: std::sync::Arc<dyn ProgressReporter> = std::sync::Arc::new(SilentReporter);
        let worker = std::sync::Arc::clone(&reporter);
        std::thread::spawn(move || worker.on_delete_progress(1, 2))
            .join()
            .unwrap();
        reporter.on_delete_complete(2);
    }
}
