use crate::error::Error;
use serde::Serialize;
use tracing::{debug, info, warn};

pub type TabId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub id: TabId,
    pub url: String,
    pub active: bool,
}

/// The platform tab API.
pub trait TabManager {
    fn query(&self, url: &str) -> Result<Vec<Tab>, Error>;
    fn create(&mut self, url: &str, active: bool) -> Result<Tab, Error>;
    /// Fails when the tab no longer exists.
    fn update(&mut self, id: TabId, active: bool) -> Result<Tab, Error>;
    fn get(&self, id: TabId) -> Result<Tab, Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoTab,
    /// May be stale; that is only discovered when focusing fails.
    Tracked(TabId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The tracked tab was focused.
    Focused(TabId),
    /// An untracked tab already showing the page was focused and is now tracked.
    Adopted(TabId),
    Created(TabId),
}

/// Keeps at most one cleaner tab open.
#[derive(Debug, Clone)]
pub struct TabSession {
    page_url: String,
    tracked: Option<TabId>,
}

impl TabSession {
    pub fn new(page_url: &str) -> Self {
        Self {
            page_url: page_url.to_string(),
            tracked: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.tracked {
            Some(id) => SessionState::Tracked(id),
            None => SessionState::NoTab,
        }
    }

    /// Focus the cleaner tab, creating it only when none is open.
    pub fn open<T>(&mut self, tabs: &mut T) -> Result<OpenOutcome, Error>
    where
        T: TabManager + ?Sized,
    {
        if let Some(id) = self.tracked {
            match tabs.update(id, true) {
                Ok(_) => {
                    debug!("Focused tracked tab {}", id);
                    return Ok(OpenOutcome::Focused(id));
                }
                Err(e) => {
                    warn!("Tracked tab {} is gone ({}), forgetting it", id, e);
                    self.tracked = None;
                }
            }
        }

        if let Some(existing) = tabs.query(&self.page_url)?.into_iter().next() {
            tabs.update(existing.id, true)?;
            self.tracked = Some(existing.id);
            info!("Focused existing tab {}", existing.id);
            return Ok(OpenOutcome::Adopted(existing.id));
        }

        let tab = tabs.create(&self.page_url, true)?;
        self.tracked = Some(tab.id);
        info!("Opened tab {}", tab.id);
        Ok(OpenOutcome::Created(tab.id))
    }

    pub fn on_tab_closed(&mut self, id: TabId) {
        if self.tracked == Some(id) {
            debug!("Tracked tab {} closed", id);
            self.tracked = None;
        }
    }
}

/// In-process tab list.
#[derive(Debug, Clone, Default)]
pub struct MemoryTabs {
    tabs: Vec<Tab>,
    next_id: TabId,
}

impl MemoryTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Close a tab without notifying anyone, the way a user would.
    pub fn close(&mut self, id: TabId) -> bool {
        let before = self.tabs.len();
        self.tabs.retain(|tab| tab.id != id);
        self.tabs.len() != before
    }

    fn missing(id: TabId) -> Error {
        Error::Tab(format!("no tab with id {}", id))
    }
}

impl TabManager for MemoryTabs {
    fn query(&self, url: &str) -> Result<Vec<Tab>, Error> {
        Ok(self.tabs.iter().filter(|tab| tab.url == url).cloned().collect())
    }

    fn create(&mut self, url: &str, active: bool) -> Result<Tab, Error> {
        self.next_id += 1;
        if active {
            self.tabs.iter_mut().for_each(|tab| tab.active = false);
        }
        let tab = Tab {
            id: self.next_id,
            url: url.to_string(),
            active,
        };
        self.tabs.push(tab.clone());
        Ok(tab)
    }

    fn update(&mut self, id: TabId, active: bool) -> Result<Tab, Error> {
        if !self.tabs.iter().any(|tab| tab.id == id) {
            return Err(Self::missing(id));
        }
        for tab in self.tabs.iter_mut() {
            if tab.id == id {
                tab.active = active;
            } else if active {
                tab.active = false;
            }
        }
        self.get(id)
    }

    fn get(&self, id: TabId) -> Result<Tab, Error> {
        self.tabs
            .iter()
            .find(|tab| tab.id == id)
            .cloned()
            .ok_or_else(|| Self::missing(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "tab/tab.html";

    #[test]
    fn test_open_twice_focuses_same_tab() {
        let mut tabs = MemoryTabs::new();
        let mut session = TabSession::new(PAGE);
        assert_eq!(session.state(), SessionState::NoTab);

        let first = session.open(&mut tabs).unwrap();
        assert_eq!(first, OpenOutcome::Created(1));
        assert_eq!(session.open(&mut tabs).unwrap(), OpenOutcome::Focused(1));
        assert_eq!(tabs.tabs().len(), 1);
        assert_eq!(session.state(), SessionState::Tracked(1));
    }

    #[test]
    fn test_stale_tab_is_replaced() {
        let mut tabs = MemoryTabs::new();
        let mut session = TabSession::new(PAGE);
        session.open(&mut tabs).unwrap();
        tabs.close(1);

        // Still tracked until focusing fails.
        assert_eq!(session.state(), SessionState::Tracked(1));
        assert_eq!(session.open(&mut tabs).unwrap(), OpenOutcome::Created(2));
        assert_eq!(session.state(), SessionState::Tracked(2));
    }

    #[test]
    fn test_close_notification_clears_tracking() {
        let mut tabs = MemoryTabs::new();
        let mut session = TabSession::new(PAGE);
        session.open(&mut tabs).unwrap();
        session.on_tab_closed(7);
        assert_eq!(session.state(), SessionState::Tracked(1));
        session.on_tab_closed(1);
        assert_eq!(session.state(), SessionState::NoTab);
    }

    #[test]
    fn test_existing_page_tab_is_adopted() {
        let mut tabs = MemoryTabs::new();
        tabs.create("https://example.com", true).unwrap();
        let existing = tabs.create(PAGE, false).unwrap();
        tabs.create("https://rust-lang.org", true).unwrap();

        let mut session = TabSession::new(PAGE);
        assert_eq!(
            session.open(&mut tabs).unwrap(),
            OpenOutcome::Adopted(existing.id)
        );
        assert!(tabs.get(existing.id).unwrap().active);
        assert_eq!(tabs.tabs().len(), 3);
    }
}
