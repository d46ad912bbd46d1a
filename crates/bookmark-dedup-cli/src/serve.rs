use std::io::{self, BufRead, Write};

use bookmark_dedup_core::session::TabManager;
use bookmark_dedup_core::storage::BookmarkStore;
use bookmark_dedup_core::DedupEngine;
use serde_json::Value;
use tracing::{debug, info};

/// Answer one JSON request per stdin line with one JSON response per stdout
/// line. A `{"event":"tabClosed","tabId":N}` line is a tab-close notification
/// and gets no response.
pub fn run_serve<S, T>(engine: &mut DedupEngine<S, T>) -> io::Result<()>
where
    S: BookmarkStore,
    T: TabManager,
{
    info!("Waiting for messages on stdin");
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(tab_id) = tab_closed_event(&line) {
            debug!("Tab {} closed", tab_id);
            engine.tab_closed(tab_id);
            continue;
        }

        let response = engine.handle_message(&line);
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

fn tab_closed_event(line: &str) -> Option<u32> {
    let value: Value = serde_json::from_str(line).ok()?;
    if value.get("event")?.as_str()? != "tabClosed" {
        return None;
    }
    value.get("tabId")?.as_u64()?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_closed_event() {
        assert_eq!(tab_closed_event(r#"{"event":"tabClosed","tabId":4}"#), Some(4));
        assert_eq!(tab_closed_event(r#"{"action":"getFolders"}"#), None);
        assert_eq!(tab_closed_event(r#"{"event":"tabClosed"}"#), None);
        assert_eq!(tab_closed_event("nope"), None);
    }
}
