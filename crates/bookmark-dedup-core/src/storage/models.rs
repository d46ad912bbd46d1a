use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node of the platform-owned bookmark tree, shaped like the result of
/// `bookmarks.getTree()`. Leaves carry `url`, folders carry `children`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
    /// Platform fields not modelled here (`index`, `type`, `dateGroupModified`, ...),
    /// kept so a rewritten tree loses nothing.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookmarkNode {
    pub fn bookmark(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: Some(url.to_string()),
            title: title.to_string(),
            parent_id: None,
            date_added: None,
            children: None,
            extra: Map::new(),
        }
    }

    /// Build a folder, pointing each child's `parent_id` at it.
    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        let children = children
            .into_iter()
            .map(|mut child| {
                child.parent_id = Some(id.to_string());
                child
            })
            .collect();
        Self {
            id: id.to_string(),
            url: None,
            title: title.to_string(),
            parent_id: None,
            date_added: None,
            children: Some(children),
            extra: Map::new(),
        }
    }

    pub fn with_date_added(mut self, millis: i64) -> Self {
        self.date_added = Some(millis);
        self
    }

    pub fn is_bookmark(&self) -> bool {
        self.url.is_some()
    }

    /// Untitled, URL-less nodes at the top of the forest (the platform's
    /// root) add no path segment. `depth` is 0 for forest roots.
    pub fn is_root_pseudo_node(&self, depth: usize) -> bool {
        depth == 0 && self.url.is_none() && self.title.trim().is_empty()
    }
}

/// A leaf bookmark annotated with its folder path, produced fresh on every scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatBookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub parent_id: Option<String>,
    pub date_added: Option<i64>,
    pub path: String,
}

impl FlatBookmark {
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.date_added
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
    }
}

/// A folder offered in the folder filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderDescriptor {
    pub id: String,
    pub title: String,
    pub path: String,
}

/// Which bookmark attributes make two bookmarks equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOptions {
    pub match_title: bool,
    pub match_base_url: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
}

/// Which member of a duplicate group is listed first and kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeepPolicy {
    /// Tree traversal order.
    #[default]
    First,
    /// Smallest `dateAdded`; bookmarks without a date sort last.
    Oldest,
}
