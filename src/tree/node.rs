//! File system node records and materialized tree views.

use crate::types::{NodeId, NodeKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A file or directory record in the node table.
///
/// The in-memory table is the exclusive owner of all nodes. `parent_id` is a
/// lookup relation, not an ownership relation, and `children` is a derived
/// cache rebuilt from `parent_id` links on every load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Child ids, directories only. Never authoritative.
    #[serde(default)]
    pub children: Vec<NodeId>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub is_modified: bool,
    #[serde(default)]
    pub language: Option<String>,
}

impl FileNode {
    /// Create a file node. Parent linkage is the service's job.
    pub fn file(path: &str, content: String) -> Self {
        let name = super::path::leaf_name(path);
        let language = super::path::language_for(&name);
        FileNode {
            id: NodeId::generate(),
            name,
            kind: NodeKind::File,
            path: path.to_string(),
            parent_id: None,
            children: Vec::new(),
            size: content.len() as u64,
            content: Some(content),
            last_modified: Utc::now(),
            is_modified: false,
            language,
        }
    }

    /// Create a directory node with an empty child cache.
    pub fn directory(path: &str) -> Self {
        FileNode {
            id: NodeId::generate(),
            name: super::path::leaf_name(path),
            kind: NodeKind::Directory,
            path: path.to_string(),
            parent_id: None,
            children: Vec::new(),
            content: None,
            size: 0,
            last_modified: Utc::now(),
            is_modified: false,
            language: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind.is_directory()
    }

    pub fn is_file(&self) -> bool {
        !self.kind.is_directory()
    }
}

/// Sibling ordering: directories before files, then case-aware
/// lexicographic by name (case-insensitive, raw name as tiebreak).
pub fn sibling_order(a: &FileNode, b: &FileNode) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Directory, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Directory) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

/// Materialized tree view: a node together with its recursively resolved
/// children, for render/traversal by callers.
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub node: FileNode,
    pub children: Vec<TreeEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_node_derives_name_language_size() {
        let node = FileNode::file("/src/main.rs", "fn main() {}".to_string());
        assert_eq!(node.name, "main.rs");
        assert_eq!(node.language.as_deref(), Some("rust"));
        assert_eq!(node.size, 12);
        assert!(node.is_file());
        assert!(!node.is_modified);
    }

    #[test]
    fn test_directory_node_has_no_content() {
        let node = FileNode::directory("/src");
        assert!(node.is_directory());
        assert!(node.content.is_none());
        assert_eq!(node.size, 0);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_sibling_order_directories_first_then_name() {
        let dir = FileNode::directory("/zoo");
        let file_a = FileNode::file("/Apple.txt", String::new());
        let file_b = FileNode::file("/banana.txt", String::new());
        assert_eq!(sibling_order(&dir, &file_a), Ordering::Less);
        assert_eq!(sibling_order(&file_a, &file_b), Ordering::Less);
        assert_eq!(sibling_order(&file_b, &file_a), Ordering::Greater);
    }
}
