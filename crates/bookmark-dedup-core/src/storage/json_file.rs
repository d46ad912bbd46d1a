use super::memory::MemoryStore;
use super::models::BookmarkNode;
use super::BookmarkStore;
use crate::error::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bookmark store backed by a JSON export of `bookmarks.getTree()`.
///
/// The file is re-read on every call so external edits are observed, and
/// rewritten after each successful removal.
pub struct JsonFileStore {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TreeFile {
    Forest(Vec<BookmarkNode>),
    Root(BookmarkNode),
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_forest(&self) -> Result<Vec<BookmarkNode>, String> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| format!("{}: {}", self.path.display(), e))?;
        let parsed: TreeFile = serde_json::from_str(&contents)
            .map_err(|e| format!("{}: {}", self.path.display(), e))?;
        Ok(match parsed {
            TreeFile::Forest(forest) => forest,
            TreeFile::Root(root) => vec![root],
        })
    }

    fn write_forest(&self, forest: &[BookmarkNode]) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(forest)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote bookmark tree to {}", self.path.display());
        Ok(())
    }
}

impl BookmarkStore for JsonFileStore {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, Error> {
        let forest = self.read_forest().map_err(Error::Retrieval)?;
        info!("Loaded bookmark tree from {}", self.path.display());
        Ok(forest)
    }

    fn remove(&mut self, id: &str) -> Result<(), Error> {
        let deletion_error = |reason: String| Error::Deletion {
            id: id.to_string(),
            reason,
        };

        let forest = self.read_forest().map_err(deletion_error)?;
        let mut tree = MemoryStore::new(forest);
        tree.remove(id)?;
        self.write_forest(tree.forest())
            .map_err(|e| deletion_error(e.to_string()))
    }
}
