use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

use crate::storage::models::KeepPolicy;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON file holding the bookmark forest, shaped like `bookmarks.getTree()`.
    pub bookmarks_path: String,
    /// Joins folder titles into a bookmark's `path`.
    pub path_separator: String,
    /// Joins base URL and title when both are matched.
    pub key_separator: String,
    pub untitled_bookmark: String,
    pub untitled_folder: String,
    /// Nesting limit; deeper trees are rejected as malformed.
    pub max_depth: usize,
    pub keep_policy: KeepPolicy,
    pub cleaner_page_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bookmarks_path: "bookmarks.json".to_string(),
            path_separator: " > ".to_string(),
            key_separator: "::".to_string(),
            untitled_bookmark: "(no title)".to_string(),
            untitled_folder: "(untitled folder)".to_string(),
            max_depth: 256,
            keep_policy: KeepPolicy::First,
            cleaner_page_url: "tab/tab.html".to_string(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("BOOKMARK_DEDUP"))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
