pub mod flatten;
pub mod index;

pub use flatten::{flatten_bookmarks, list_folders};
pub use index::NodeIndex;
