use crate::config::AppConfig;
use crate::error::Error;
use crate::scanner::{flatten_bookmarks, NodeIndex};
use crate::storage::models::{BookmarkNode, FlatBookmark, KeepPolicy, MatchOptions};
use ahash::AHashMap;
use serde::ser::{SerializeMap, Serializer};
use tracing::{debug, info};

pub const EMPTY_SCOPE_MESSAGE: &str = "No bookmarks found in the selected folder";

/// Bookmarks sharing one equivalence key. The first member is the one kept.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub key: String,
    pub bookmarks: Vec<FlatBookmark>,
}

impl DuplicateGroup {
    pub fn keeper(&self) -> &FlatBookmark {
        &self.bookmarks[0]
    }

    pub fn redundant(&self) -> &[FlatBookmark] {
        &self.bookmarks[1..]
    }
}

/// Outcome of one duplicate scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateReport {
    /// Groups with at least two members, ordered by first appearance.
    pub groups: Vec<DuplicateGroup>,
    /// Bookmarks considered after folder scoping.
    pub scanned: usize,
    /// Set when the requested folder held no bookmarks.
    pub message: Option<String>,
}

impl DuplicateReport {
    pub fn empty_scope() -> Self {
        Self {
            groups: Vec::new(),
            scanned: 0,
            message: Some(EMPTY_SCOPE_MESSAGE.to_string()),
        }
    }

    pub fn count(&self) -> usize {
        self.groups.len()
    }

    /// Bookmarks that would go if every non-first member were removed.
    pub fn total_duplicates(&self) -> usize {
        self.groups.iter().map(|g| g.bookmarks.len() - 1).sum()
    }
}

/// Strip the query string and fragment.
pub fn base_url(url: &str) -> &str {
    match url.find(['?', '#']) {
        Some(end) => &url[..end],
        None => url,
    }
}

/// Case-insensitive grouping key for `bookmark` under `options`.
pub fn equivalence_key(bookmark: &FlatBookmark, options: &MatchOptions, separator: &str) -> String {
    match (options.match_base_url, options.match_title) {
        (true, true) => format!(
            "{}{}{}",
            base_url(&bookmark.url).to_lowercase(),
            separator,
            bookmark.title.to_lowercase()
        ),
        (false, true) => bookmark.title.to_lowercase(),
        (true, false) => base_url(&bookmark.url).to_lowercase(),
        (false, false) => bookmark.url.to_lowercase(),
    }
}

/// Partition `bookmarks` by key, keeping groups of two or more. Group order
/// and member order follow the input order, then `policy` picks the keeper.
pub fn group_duplicates(
    bookmarks: Vec<FlatBookmark>,
    options: &MatchOptions,
    config: &AppConfig,
) -> DuplicateReport {
    let scanned = bookmarks.len();
    let mut positions: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for bookmark in bookmarks {
        let key = equivalence_key(&bookmark, options, &config.key_separator);
        match positions.get(&key) {
            Some(&pos) => groups[pos].bookmarks.push(bookmark),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    bookmarks: vec![bookmark],
                });
            }
        }
    }

    groups.retain(|group| group.bookmarks.len() > 1);

    if config.keep_policy == KeepPolicy::Oldest {
        for group in groups.iter_mut() {
            group
                .bookmarks
                .sort_by_key(|b| (b.date_added.is_none(), b.date_added));
        }
    }

    debug!(
        "{} bookmarks grouped into {} duplicate groups",
        scanned,
        groups.len()
    );

    DuplicateReport {
        groups,
        scanned,
        message: None,
    }
}

/// Flatten `forest`, restrict it to `options.folder_id` when set, and group.
pub fn find_duplicates(
    forest: &[BookmarkNode],
    options: &MatchOptions,
    config: &AppConfig,
) -> Result<DuplicateReport, Error> {
    let mut bookmarks = flatten_bookmarks(forest, config)?;

    if let Some(folder_id) = options.folder_id.as_deref() {
        let index = NodeIndex::build(forest, config.max_depth)?;
        let mut scoped = Vec::with_capacity(bookmarks.len());
        for bookmark in bookmarks {
            if index.is_descendant(&bookmark.id, folder_id)? {
                scoped.push(bookmark);
            }
        }
        if scoped.is_empty() {
            info!("Folder {} contains no bookmarks", folder_id);
            return Ok(DuplicateReport::empty_scope());
        }
        bookmarks = scoped;
    }

    Ok(group_duplicates(bookmarks, options, config))
}

/// Serialize groups as a JSON object keyed by equivalence key, in group order.
pub fn serialize_groups<S>(groups: &[DuplicateGroup], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(groups.len()))?;
    for group in groups {
        map.serialize_entry(&group.key, &group.bookmarks)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(id: &str, title: &str, url: &str) -> FlatBookmark {
        FlatBookmark {
            id: id.to_string(),
            url: url.to_string(),
            title: title.to_string(),
            parent_id: None,
            date_added: None,
            path: String::new(),
        }
    }

    fn options(match_title: bool, match_base_url: bool) -> MatchOptions {
        MatchOptions {
            match_title,
            match_base_url,
            folder_id: None,
        }
    }

    #[test]
    fn test_base_url_strips_query_and_fragment() {
        assert_eq!(base_url("https://a.com/x?q=1#frag"), "https://a.com/x");
        assert_eq!(base_url("https://a.com/x#frag?not-a-query"), "https://a.com/x");
        assert_eq!(base_url("https://a.com/x"), "https://a.com/x");
    }

    #[test]
    fn test_key_variants() {
        let b = flat("1", "Rust Book", "https://Doc.rust-lang.org/book?x=1");
        let sep = "::";
        assert_eq!(
            equivalence_key(&b, &options(false, false), sep),
            "https://doc.rust-lang.org/book?x=1"
        );
        assert_eq!(
            equivalence_key(&b, &options(false, true), sep),
            "https://doc.rust-lang.org/book"
        );
        assert_eq!(equivalence_key(&b, &options(true, false), sep), "rust book");
        assert_eq!(
            equivalence_key(&b, &options(true, true), sep),
            "https://doc.rust-lang.org/book::rust book"
        );
    }

    #[test]
    fn test_url_case_is_ignored() {
        let bookmarks = vec![
            flat("1", "A", "HTTP://A.COM/Page"),
            flat("2", "B", "http://a.com/page"),
        ];
        let report = group_duplicates(bookmarks, &options(false, false), &AppConfig::default());
        assert_eq!(report.count(), 1);
        assert_eq!(report.groups[0].bookmarks.len(), 2);
    }

    #[test]
    fn test_singletons_are_dropped() {
        let bookmarks = vec![
            flat("1", "A", "http://a.com"),
            flat("2", "B", "http://b.com"),
            flat("3", "A again", "http://a.com"),
            flat("4", "A thrice", "http://a.com"),
        ];
        let report = group_duplicates(bookmarks, &options(false, false), &AppConfig::default());
        assert_eq!(report.count(), 1);
        assert_eq!(report.total_duplicates(), 2);
        assert_eq!(report.groups[0].keeper().id, "1");
        assert_eq!(report.scanned, 4);
    }

    #[test]
    fn test_oldest_policy_reorders_group() {
        let mut newer = flat("1", "A", "http://a.com");
        newer.date_added = Some(2_000);
        let undated = flat("2", "A", "http://a.com");
        let mut older = flat("3", "A", "http://a.com");
        older.date_added = Some(1_000);
        let config = AppConfig {
            keep_policy: KeepPolicy::Oldest,
            ..AppConfig::default()
        };
        let report = group_duplicates(vec![newer, undated, older], &options(false, false), &config);
        let ids: Vec<&str> = report.groups[0].bookmarks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_serialized_map_keeps_group_order() {
        let report = group_duplicates(
            vec![
                flat("1", "Z", "http://z.com"),
                flat("2", "A", "http://a.com"),
                flat("3", "Z", "http://z.com"),
                flat("4", "A", "http://a.com"),
            ],
            &options(false, false),
            &AppConfig::default(),
        );
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut out);
        serialize_groups(&report.groups, &mut serializer).unwrap();
        let json = String::from_utf8(out).unwrap();
        let z = json.find("http://z.com").unwrap();
        let a = json.find("http://a.com").unwrap();
        assert!(z < a);
    }
}
