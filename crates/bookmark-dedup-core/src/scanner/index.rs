use crate::error::Error;
use crate::storage::models::BookmarkNode;
use ahash::{AHashMap, AHashSet};

/// id → parent id map built once per scan, answering folder-membership
/// queries with O(1) parent lookups.
pub struct NodeIndex<'a> {
    parents: AHashMap<&'a str, Option<&'a str>>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(forest: &'a [BookmarkNode], max_depth: usize) -> Result<Self, Error> {
        let mut parents = AHashMap::new();
        let mut stack: Vec<(&'a BookmarkNode, Option<&'a str>, usize)> =
            forest.iter().rev().map(|node| (node, None, 0)).collect();

        while let Some((node, structural_parent, depth)) = stack.pop() {
            if depth > max_depth {
                return Err(Error::Structure(format!(
                    "node {} is nested deeper than {} levels",
                    node.id, max_depth
                )));
            }
            // The node's own parentId wins; the structural parent covers trees without it.
            let parent = node.parent_id.as_deref().or(structural_parent);
            parents.insert(node.id.as_str(), parent);

            if let Some(children) = node.children.as_deref() {
                for child in children.iter().rev() {
                    stack.push((child, Some(node.id.as_str()), depth + 1));
                }
            }
        }

        Ok(Self { parents })
    }

    pub fn parent_of(&self, id: &str) -> Option<&'a str> {
        self.parents.get(id).copied().flatten()
    }

    /// True when `folder_id` is an ancestor of `bookmark_id`. Unknown ids are
    /// never descendants. A parent chain that loops is a structural error.
    pub fn is_descendant(&self, bookmark_id: &str, folder_id: &str) -> Result<bool, Error> {
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut current = self.parent_of(bookmark_id);

        while let Some(id) = current {
            if id == folder_id {
                return Ok(true);
            }
            if !seen.insert(id) {
                return Err(Error::Structure(format!(
                    "parent chain of {} loops at {}",
                    bookmark_id, id
                )));
            }
            current = self.parent_of(id);
        }

        Ok(false)
    }
}
