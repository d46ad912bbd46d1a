use crate::analysis::grouper::DuplicateReport;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::storage::BookmarkStore;
use tracing::{debug, error, info};

/// Every non-keeper member of every group, in display order.
pub fn select_redundant(report: &DuplicateReport) -> Vec<String> {
    report
        .groups
        .iter()
        .flat_map(|group| group.redundant().iter().map(|b| b.id.clone()))
        .collect()
}

/// Remove `ids` one by one, stopping at the first failure.
///
/// There is no rollback: bookmarks removed before the failing id stay
/// removed. Callers should re-scan to observe the resulting state.
pub fn execute_deletion<S>(
    store: &mut S,
    ids: &[String],
    reporter: &dyn ProgressReporter,
) -> Result<usize, Error>
where
    S: BookmarkStore + ?Sized,
{
    reporter.on_delete_start(ids.len());

    for (done, id) in ids.iter().enumerate() {
        if let Err(e) = store.remove(id) {
            error!("Failed to remove bookmark {} after {} removals: {}", id, done, e);
            return Err(e);
        }
        debug!("Removed bookmark {}", id);
        reporter.on_delete_progress(done + 1, ids.len());
    }

    reporter.on_delete_complete(ids.len());
    info!("Removed {} bookmarks", ids.len());
    Ok(ids.len())
}
