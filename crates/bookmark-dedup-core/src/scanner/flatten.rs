use crate::config::AppConfig;
use crate::error::Error;
use crate::storage::models::{BookmarkNode, FlatBookmark, FolderDescriptor};

/// Pre-order walk of the forest. Produces one `FlatBookmark` per leaf, with
/// `path` set to the titles of its ancestor folders joined by
/// `config.path_separator`.
pub fn flatten_bookmarks(
    forest: &[BookmarkNode],
    config: &AppConfig,
) -> Result<Vec<FlatBookmark>, Error> {
    let mut result = Vec::new();
    let mut path: Vec<&str> = Vec::new();

    for node in forest {
        visit(node, 0, &mut path, config, &mut |node, _depth, path| {
            if let Some(url) = &node.url {
                result.push(FlatBookmark {
                    id: node.id.clone(),
                    url: url.clone(),
                    title: display_title(&node.title, &config.untitled_bookmark),
                    parent_id: node.parent_id.clone(),
                    date_added: node.date_added,
                    path: path.join(config.path_separator.as_str()),
                });
            }
        })?;
    }

    Ok(result)
}

/// Every folder in the forest, in pre-order. A folder's `path` includes its
/// own title.
pub fn list_folders(
    forest: &[BookmarkNode],
    config: &AppConfig,
) -> Result<Vec<FolderDescriptor>, Error> {
    let mut result = Vec::new();
    let mut path: Vec<&str> = Vec::new();

    for node in forest {
        visit(node, 0, &mut path, config, &mut |node, depth, path| {
            if node.is_bookmark() || node.is_root_pseudo_node(depth) {
                return;
            }
            let title = display_title(&node.title, &config.untitled_folder);
            let mut full_path = path.join(config.path_separator.as_str());
            if !full_path.is_empty() {
                full_path.push_str(&config.path_separator);
            }
            full_path.push_str(&title);
            result.push(FolderDescriptor {
                id: node.id.clone(),
                title,
                path: full_path,
            });
        })?;
    }

    Ok(result)
}

/// Calls `on_node` with each node, its depth and the folder titles above it.
fn visit<'a>(
    node: &'a BookmarkNode,
    depth: usize,
    path: &mut Vec<&'a str>,
    config: &'a AppConfig,
    on_node: &mut dyn FnMut(&'a BookmarkNode, usize, &[&'a str]),
) -> Result<(), Error> {
    if depth > config.max_depth {
        return Err(Error::Structure(format!(
            "node {} is nested deeper than {} levels",
            node.id, config.max_depth
        )));
    }

    on_node(node, depth, path);

    if node.is_bookmark() {
        return Ok(());
    }
    let Some(children) = node.children.as_deref() else {
        return Ok(());
    };

    let segment = if node.is_root_pseudo_node(depth) {
        None
    } else if node.title.trim().is_empty() {
        Some(config.untitled_folder.as_str())
    } else {
        Some(node.title.as_str())
    };

    if let Some(segment) = segment {
        path.push(segment);
    }
    for child in children {
        visit(child, depth + 1, path, config, on_node)?;
    }
    if segment.is_some() {
        path.pop();
    }

    Ok(())
}

fn display_title(title: &str, fallback: &str) -> String {
    if title.trim().is_empty() {
        fallback.to_string()
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::default()
    }

    #[test]
    fn test_root_level_leaves_keep_order() {
        let forest = vec![
            BookmarkNode::bookmark("1", "A", "http://a.com"),
            BookmarkNode::bookmark("2", "B", "http://b.com"),
            BookmarkNode::bookmark("3", "C", "http://c.com"),
        ];
        let flat = flatten_bookmarks(&forest, &config()).unwrap();
        let ids: Vec<&str> = flat.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(flat.iter().all(|b| b.path.is_empty()));
    }

    #[test]
    fn test_path_excludes_own_title_and_root_pseudo_node() {
        let root = BookmarkNode {
            children: Some(vec![BookmarkNode::folder(
                "1",
                "Toolbar",
                vec![BookmarkNode::folder(
                    "2",
                    "Rust",
                    vec![BookmarkNode::bookmark("3", "Book", "https://doc.rust-lang.org/book")],
                )],
            )]),
            ..BookmarkNode::folder("0", "", vec![])
        };
        let flat = flatten_bookmarks(&[root], &config()).unwrap();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].path, "Toolbar > Rust");
    }

    #[test]
    fn test_untitled_nodes_get_fallback_labels() {
        let mut inner = BookmarkNode::folder("2", "", vec![BookmarkNode::bookmark("3", "", "http://a.com")]);
        inner.parent_id = Some("1".to_string());
        let forest = vec![BookmarkNode::folder("1", "Top", vec![inner])];
        let flat = flatten_bookmarks(&forest, &config()).unwrap();
        assert_eq!(flat[0].title, "(no title)");
        assert_eq!(flat[0].path, "Top > (untitled folder)");
    }

    #[test]
    fn test_nested_untitled_folder_without_parent_ids() {
        let json = r#"[{"id":"1","title":"Top","children":[
            {"id":"2","title":"","children":[{"id":"3","url":"http://a.com"}]}
        ]}]"#;
        let forest: Vec<BookmarkNode> = serde_json::from_str(json).unwrap();

        let flat = flatten_bookmarks(&forest, &config()).unwrap();
        assert_eq!(flat[0].path, "Top > (untitled folder)");

        let folders = list_folders(&forest, &config()).unwrap();
        let ids: Vec<&str> = folders.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(folders[1].path, "Top > (untitled folder)");
    }

    #[test]
    fn test_pre_order_across_folders() {
        let forest = vec![
            BookmarkNode::bookmark("1", "A", "http://a.com"),
            BookmarkNode::folder(
                "2",
                "F",
                vec![
                    BookmarkNode::bookmark("3", "B", "http://b.com"),
                    BookmarkNode::folder("4", "G", vec![BookmarkNode::bookmark("5", "C", "http://c.com")]),
                ],
            ),
            BookmarkNode::bookmark("6", "D", "http://d.com"),
        ];
        let flat = flatten_bookmarks(&forest, &config()).unwrap();
        let ids: Vec<&str> = flat.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "5", "6"]);
        assert_eq!(flat[2].path, "F > G");
    }

    #[test]
    fn test_depth_guard_rejects_deep_tree() {
        let mut node = BookmarkNode::bookmark("leaf", "L", "http://deep.com");
        for i in 0..10 {
            node = BookmarkNode::folder(&format!("f{}", i), "F", vec![node]);
        }
        let config = AppConfig {
            max_depth: 5,
            ..AppConfig::default()
        };
        let err = flatten_bookmarks(&[node], &config).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_list_folders_paths() {
        let forest = vec![BookmarkNode::folder(
            "1",
            "Work",
            vec![
                BookmarkNode::folder("2", "Docs", vec![]),
                BookmarkNode::bookmark("3", "A", "http://a.com"),
            ],
        )];
        let folders = list_folders(&forest, &config()).unwrap();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].path, "Work");
        assert_eq!(folders[1].id, "2");
        assert_eq!(folders[1].path, "Work > Docs");
    }
}
