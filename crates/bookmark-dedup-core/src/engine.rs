use crate::analysis::deletion_plan;
use crate::analysis::grouper::{self, DuplicateReport};
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::{ProgressReporter, SilentReporter};
use crate::protocol::{self, Request, Response};
use crate::scanner;
use crate::session::{OpenOutcome, TabId, TabManager, TabSession};
use crate::storage::models::{BookmarkNode, FolderDescriptor, MatchOptions};
use crate::storage::BookmarkStore;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, error, info};

/// Serves scan, folder, removal and tab requests against one bookmark store.
///
/// Requests are handled one at a time; the only state kept between them is
/// the tracked cleaner tab.
pub struct DedupEngine<S, T> {
    config: AppConfig,
    store: S,
    tabs: T,
    session: TabSession,
}

impl<S, T> DedupEngine<S, T>
where
    S: BookmarkStore,
    T: TabManager,
{
    pub fn new(config: AppConfig, store: S, tabs: T) -> Self {
        let session = TabSession::new(&config.cleaner_page_url);
        Self {
            config,
            store,
            tabs,
            session,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tabs(&self) -> &T {
        &self.tabs
    }

    pub fn tabs_mut(&mut self) -> &mut T {
        &mut self.tabs
    }

    pub fn session(&self) -> &TabSession {
        &self.session
    }

    fn fetch_tree(&self) -> Result<Vec<BookmarkNode>, Error> {
        self.store.get_tree().map_err(|e| match e {
            Error::Retrieval(_) => e,
            other => Error::Retrieval(other.to_string()),
        })
    }

    pub fn find_duplicates(
        &self,
        options: &MatchOptions,
        reporter: &dyn ProgressReporter,
    ) -> Result<DuplicateReport, Error> {
        reporter.on_scan_start();
        let start = Instant::now();

        let forest = self.fetch_tree()?;
        let report = grouper::find_duplicates(&forest, options, &self.config)?;

        let duration = start.elapsed();
        reporter.on_scan_complete(report.scanned, report.count(), duration.as_secs_f64());
        info!(
            "Scanned {} bookmarks in {:.3}s: {} duplicate groups, {} removable",
            report.scanned,
            duration.as_secs_f64(),
            report.count(),
            report.total_duplicates(),
        );
        Ok(report)
    }

    pub fn get_folders(&self) -> Result<Vec<FolderDescriptor>, Error> {
        let forest = self.fetch_tree()?;
        let folders = scanner::list_folders(&forest, &self.config)?;
        debug!("Listed {} folders", folders.len());
        Ok(folders)
    }

    pub fn remove_selected(
        &mut self,
        ids: &[String],
        reporter: &dyn ProgressReporter,
    ) -> Result<usize, Error> {
        deletion_plan::execute_deletion(&mut self.store, ids, reporter)
    }

    pub fn open_cleaner_tab(&mut self) -> Result<OpenOutcome, Error> {
        self.session.open(&mut self.tabs)
    }

    /// Tab-close notification from the platform.
    pub fn tab_closed(&mut self, id: TabId) {
        self.session.on_tab_closed(id);
    }

    pub fn dispatch(&mut self, request: Request) -> Response {
        debug!("Dispatching {:?}", request);
        match request {
            Request::OpenCleanerTab => match self.open_cleaner_tab() {
                Ok(_) => Response::ok(),
                Err(e) => {
                    error!("Error opening cleaner tab: {}", e);
                    Response::failure(&e)
                }
            },
            Request::GetFolders => Response::folders(self.get_folders()),
            Request::FindDuplicates { options } => {
                Response::duplicates(self.find_duplicates(&options, &SilentReporter))
            }
            Request::RemoveSelected { bookmark_ids } => {
                Response::removed(self.remove_selected(&bookmark_ids, &SilentReporter))
            }
        }
    }

    /// Handle one raw JSON message and return the JSON response.
    pub fn handle_message(&mut self, raw: &str) -> String {
        let response = match protocol::parse_request(raw) {
            Ok(request) => self.dispatch(request),
            Err(e) => {
                error!("Rejected message: {}", e);
                Response::failure(&e)
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            json!({ "success": false, "error": e.to_string() }).to_string()
        })
    }
}
