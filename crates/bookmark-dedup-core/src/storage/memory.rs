use super::models::BookmarkNode;
use super::BookmarkStore;
use crate::error::Error;
use tracing::debug;

/// In-process bookmark tree.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    forest: Vec<BookmarkNode>,
}

impl MemoryStore {
    pub fn new(forest: Vec<BookmarkNode>) -> Self {
        Self { forest }
    }

    pub fn forest(&self) -> &[BookmarkNode] {
        &self.forest
    }

    pub fn contains(&self, id: &str) -> bool {
        fn find(nodes: &[BookmarkNode], id: &str) -> bool {
            nodes.iter().any(|node| {
                node.id == id || node.children.as_deref().is_some_and(|c| find(c, id))
            })
        }
        find(&self.forest, id)
    }
}

/// Detach the node with `id` from `siblings` or any level below.
fn detach(siblings: &mut Vec<BookmarkNode>, id: &str) -> Result<Option<BookmarkNode>, Error> {
    if let Some(pos) = siblings.iter().position(|node| node.id == id) {
        let has_children = siblings[pos]
            .children
            .as_ref()
            .is_some_and(|children| !children.is_empty());
        if has_children {
            return Err(Error::Deletion {
                id: id.to_string(),
                reason: "folder is not empty".to_string(),
            });
        }
        return Ok(Some(siblings.remove(pos)));
    }

    for node in siblings.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            if let Some(removed) = detach(children, id)? {
                return Ok(Some(removed));
            }
        }
    }

    Ok(None)
}

impl BookmarkStore for MemoryStore {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>, Error> {
        Ok(self.forest.clone())
    }

    fn remove(&mut self, id: &str) -> Result<(), Error> {
        match detach(&mut self.forest, id)? {
            Some(removed) => {
                debug!("Removed bookmark {} ({})", removed.id, removed.title);
                Ok(())
            }
            None => Err(Error::Deletion {
                id: id.to_string(),
                reason: "no bookmark with that id".to_string(),
            }),
        }
    }
}
