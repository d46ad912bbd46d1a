pub mod json_file;
pub mod memory;
pub mod models;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Error;
use models::BookmarkNode;

/// The platform bookmark store. Consumed, never owned, by the scan pipeline.
pub trait BookmarkStore {
    /// Return the whole bookmark forest.
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, Error>;

    /// Remove one bookmark (or empty folder). Fails when `id` is unknown.
    fn remove(&mut self, id: &str) -> Result<(), Error>;
}
