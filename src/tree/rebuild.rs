//! Tree rebuild: recompute derived child caches from `parent_id` links.
//!
//! Required after bulk load (snapshot restore or project import) since child
//! caches are persisted only as flat records plus back-references. Runs once
//! per load, not on every read.

use super::node::{sibling_order, FileNode};
use crate::types::NodeId;
use std::collections::HashMap;

/// Rebuild every directory's child cache from scratch.
///
/// Nodes whose `parent_id` points at a missing or non-directory node are
/// silently dropped from the caches (the node itself stays in the table);
/// availability of the rest of the tree wins over strict validation.
pub fn rebuild_children(nodes: &mut HashMap<NodeId, FileNode>) {
    for node in nodes.values_mut() {
        if node.is_directory() {
            node.children.clear();
        }
    }

    let links: Vec<(NodeId, NodeId)> = nodes
        .values()
        .filter_map(|n| n.parent_id.map(|p| (p, n.id)))
        .collect();

    for (parent_id, child_id) in links {
        if let Some(parent) = nodes.get_mut(&parent_id) {
            if parent.is_directory() {
                parent.children.push(child_id);
            }
        }
    }

    let dir_ids: Vec<NodeId> = nodes
        .values()
        .filter(|n| n.is_directory())
        .map(|n| n.id)
        .collect();
    for dir_id in dir_ids {
        sort_children(nodes, dir_id);
    }
}

/// Re-sort one directory's child cache per the sibling order policy.
pub fn sort_children(nodes: &mut HashMap<NodeId, FileNode>, dir_id: NodeId) {
    let Some(dir) = nodes.get(&dir_id) else {
        return;
    };
    let mut ids = dir.children.clone();
    ids.retain(|id| nodes.contains_key(id));
    ids.sort_by(|a, b| sibling_order(&nodes[a], &nodes[b]));
    if let Some(dir) = nodes.get_mut(&dir_id) {
        dir.children = ids;
    }
}

/// Sort a list of owned nodes per the sibling order policy (root listing).
pub fn sort_nodes(nodes: &mut [FileNode]) {
    nodes.sort_by(sibling_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    fn table(nodes: Vec<FileNode>) -> HashMap<NodeId, FileNode> {
        nodes.into_iter().map(|n| (n.id, n)).collect()
    }

    #[test]
    fn test_rebuild_links_children_to_parent() {
        let dir = FileNode::directory("/src");
        let mut file = FileNode::file("/src/main.rs", String::new());
        file.parent_id = Some(dir.id);
        let dir_id = dir.id;
        let file_id = file.id;

        let mut nodes = table(vec![dir, file]);
        rebuild_children(&mut nodes);

        assert_eq!(nodes[&dir_id].children, vec![file_id]);
    }

    #[test]
    fn test_rebuild_drops_dangling_parent_links() {
        let mut orphan = FileNode::file("/gone/a.txt", String::new());
        orphan.parent_id = Some(NodeId::generate());
        let orphan_id = orphan.id;

        let mut nodes = table(vec![orphan]);
        rebuild_children(&mut nodes);

        // Node survives, nothing caches it as a child.
        assert!(nodes.contains_key(&orphan_id));
        assert!(nodes.values().all(|n| n.children.is_empty()));
    }

    #[test]
    fn test_rebuild_ignores_file_parents() {
        let file = FileNode::file("/a.txt", String::new());
        let mut child = FileNode::file("/a.txt/impossible", String::new());
        child.parent_id = Some(file.id);
        let file_id = file.id;

        let mut nodes = table(vec![file, child]);
        rebuild_children(&mut nodes);

        assert_eq!(nodes[&file_id].kind, NodeKind::File);
        assert!(nodes[&file_id].children.is_empty());
    }

    #[test]
    fn test_rebuild_sorts_directories_first_then_name() {
        let root = FileNode::directory("/p");
        let root_id = root.id;
        let mut sub = FileNode::directory("/p/zeta");
        sub.parent_id = Some(root_id);
        let mut f1 = FileNode::file("/p/alpha.txt", String::new());
        f1.parent_id = Some(root_id);
        let mut f2 = FileNode::file("/p/Beta.txt", String::new());
        f2.parent_id = Some(root_id);
        let (sub_id, f1_id, f2_id) = (sub.id, f1.id, f2.id);

        let mut nodes = table(vec![root, sub, f1, f2]);
        rebuild_children(&mut nodes);

        assert_eq!(nodes[&root_id].children, vec![sub_id, f1_id, f2_id]);
    }
}
