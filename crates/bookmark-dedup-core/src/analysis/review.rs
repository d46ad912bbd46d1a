use crate::analysis::grouper::DuplicateReport;
use crate::storage::models::{FlatBookmark, MatchOptions};

/// One duplicate group as presented for review: a header, one kept member
/// and a checkbox for each of the others.
#[derive(Debug, Clone)]
pub struct ReviewGroup {
    pub header: String,
    pub bookmarks: Vec<FlatBookmark>,
    keeper: usize,
    selected: Vec<bool>,
}

impl ReviewGroup {
    pub fn keeper(&self) -> usize {
        self.keeper
    }

    pub fn is_selected(&self, member: usize) -> bool {
        self.selected.get(member).copied().unwrap_or(false)
    }
}

/// Selection state behind the review screen.
#[derive(Debug, Clone)]
pub struct ReviewState {
    groups: Vec<ReviewGroup>,
    summary: String,
    all_selected: bool,
}

/// Group header for `key` under the options the scan ran with.
pub fn header_label(key: &str, options: &MatchOptions, key_separator: &str) -> String {
    match (options.match_base_url, options.match_title) {
        (true, true) => {
            let (url, title) = key.rsplit_once(key_separator).unwrap_or((key, ""));
            format!("URL: {} | Title: \"{}\"", url, title)
        }
        (false, true) => format!("Title: \"{}\"", key),
        (true, false) => format!("Base URL: {}", key),
        (false, false) => format!("URL: {}", key),
    }
}

pub fn summary_line(report: &DuplicateReport) -> String {
    if let Some(message) = &report.message {
        return message.clone();
    }
    if report.groups.is_empty() {
        return "No duplicate bookmarks found!".to_string();
    }
    format!(
        "Found {} duplicate groups ({} total duplicates)",
        report.count(),
        report.total_duplicates()
    )
}

impl ReviewState {
    pub fn new(report: &DuplicateReport, options: &MatchOptions, key_separator: &str) -> Self {
        let groups = report
            .groups
            .iter()
            .map(|group| ReviewGroup {
                header: header_label(&group.key, options, key_separator),
                bookmarks: group.bookmarks.clone(),
                keeper: 0,
                selected: vec![false; group.bookmarks.len()],
            })
            .collect();

        Self {
            groups,
            summary: summary_line(report),
            all_selected: false,
        }
    }

    pub fn groups(&self) -> &[ReviewGroup] {
        &self.groups
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    /// Flip one checkbox. The kept member has no checkbox; returns the new state.
    pub fn toggle(&mut self, group: usize, member: usize) -> bool {
        let Some(g) = self.groups.get_mut(group) else {
            return false;
        };
        if member == g.keeper || member >= g.selected.len() {
            return false;
        }
        g.selected[member] = !g.selected[member];
        g.selected[member]
    }

    /// Make `member` the kept bookmark of `group`, clearing its checkbox.
    pub fn set_keeper(&mut self, group: usize, member: usize) -> bool {
        match self.groups.get_mut(group) {
            Some(g) if member < g.bookmarks.len() => {
                g.keeper = member;
                g.selected[member] = false;
                true
            }
            _ => false,
        }
    }

    /// Select or clear every checkbox; returns whether everything is now selected.
    pub fn toggle_select_all(&mut self) -> bool {
        self.all_selected = !self.all_selected;
        for group in self.groups.iter_mut() {
            let keeper = group.keeper;
            for (member, selected) in group.selected.iter_mut().enumerate() {
                *selected = self.all_selected && member != keeper;
            }
        }
        self.all_selected
    }

    pub fn can_delete(&self) -> bool {
        self.groups.iter().any(|g| g.selected.iter().any(|s| *s))
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.groups
            .iter()
            .flat_map(|g| {
                g.bookmarks
                    .iter()
                    .zip(g.selected.iter())
                    .filter(|(_, selected)| **selected)
                    .map(|(b, _)| b.id.clone())
            })
            .collect()
    }
}
