//! File system service: the authoritative in-memory node table and every
//! operation that mutates it.
//!
//! The table owns all nodes; paths are resolved by linear scan (no secondary
//! index), parent/child structure is derived from `parent_id` links, and the
//! whole table is snapshotted to the backing store after each mutation.
//! Explicitly constructed and passed by reference to its consumers — there
//! is no ambient global instance.

use crate::error::VfsError;
use crate::project::{ProjectArchive, SEED_DIRECTORIES, SEED_FILES};
use crate::search::{self, FileSearchOptions, SearchResult};
use crate::store::SnapshotStore;
use crate::tree::{path as vpath, rebuild, sibling_order, FileNode, TreeEntry};
use crate::types::NodeId;
use crate::watch::{ChangeEvent, SubscriptionHandle, WatchHandle, WatchRegistry};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Virtual workspace file system service.
pub struct FileSystemService {
    nodes: HashMap<NodeId, FileNode>,
    store: Arc<dyn SnapshotStore>,
    watchers: WatchRegistry,
    project_name: String,
}

impl FileSystemService {
    /// Open the service over a backing store: load the snapshot, rebuild the
    /// derived tree, and seed the default project when the table is empty.
    ///
    /// A store failure here is fatal; the service is unusable without its
    /// durable mirror.
    pub async fn initialize(
        store: Arc<dyn SnapshotStore>,
        project_name: &str,
    ) -> Result<Self, VfsError> {
        let mut service = FileSystemService {
            nodes: HashMap::new(),
            store,
            watchers: WatchRegistry::new(),
            project_name: project_name.to_string(),
        };
        service.load_snapshot().await?;

        if service.nodes.is_empty() {
            info!("empty backing store, seeding default project");
            service.bootstrap().await?;
        }
        debug!(nodes = service.nodes.len(), "file system ready");
        Ok(service)
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ---- CRUD ----------------------------------------------------------

    /// Create a file, linking it under the directory at the path's parent
    /// segment when one exists. A missing parent is not an error: the node
    /// is simply created parentless.
    pub async fn create_file(&mut self, path: &str, content: &str) -> Result<FileNode, VfsError> {
        if let Some(existing) = self.find_by_path(path) {
            return Err(VfsError::PathOccupied(format!(
                "{} ({:?})",
                path, existing.kind
            )));
        }
        let mut node = FileNode::file(path, content.to_string());
        self.link_to_parent(&mut node);
        let id = node.id;
        debug!(path, %id, "create file");

        self.insert_node(node);
        self.persist().await?;
        self.watchers.emit(&ChangeEvent::Created {
            path: path.to_string(),
        });
        Ok(self.nodes[&id].clone())
    }

    /// Create a directory with an empty child cache. Same parent resolution
    /// as `create_file`; creating an already-existing directory returns it.
    pub async fn create_directory(&mut self, path: &str) -> Result<FileNode, VfsError> {
        if let Some(existing) = self.find_by_path(path) {
            if existing.is_directory() {
                return Ok(existing.clone());
            }
            return Err(VfsError::PathOccupied(format!("{} (file)", path)));
        }
        let mut node = FileNode::directory(path);
        self.link_to_parent(&mut node);
        let id = node.id;
        debug!(path, %id, "create directory");

        self.insert_node(node);
        self.persist().await?;
        self.watchers.emit(&ChangeEvent::Created {
            path: path.to_string(),
        });
        Ok(self.nodes[&id].clone())
    }

    /// Read a file's content. A directory at the path is also `NotFound`.
    pub fn read_file(&self, path: &str) -> Result<String, VfsError> {
        let node = self
            .nodes
            .values()
            .find(|n| n.path == path && n.is_file())
            .ok_or_else(|| VfsError::not_found(path))?;
        Ok(node.content.clone().unwrap_or_default())
    }

    /// Write a file, creating it if absent. After a successful persist,
    /// watchers registered for exactly this path are invoked synchronously
    /// with the new content.
    pub async fn write_file(&mut self, path: &str, content: &str) -> Result<(), VfsError> {
        let existing = self
            .nodes
            .values()
            .find(|n| n.path == path && n.is_file())
            .map(|n| n.id);

        match existing {
            None => {
                if self.find_by_path(path).is_some() {
                    // A directory holds the path; a second node would break
                    // path uniqueness.
                    return Err(VfsError::PathOccupied(format!("{} (directory)", path)));
                }
                self.create_file(path, content).await?;
            }
            Some(id) => {
                let node = self.nodes.get_mut(&id).expect("node table entry");
                node.content = Some(content.to_string());
                node.size = content.len() as u64;
                node.last_modified = Utc::now();
                node.is_modified = true;
                self.persist().await?;
            }
        }

        self.watchers.notify(path, content);
        self.watchers.emit(&ChangeEvent::Written {
            path: path.to_string(),
        });
        Ok(())
    }

    /// Delete the node at `path`; directories take their entire subtree
    /// with them, children before the node itself. Persists once.
    pub async fn delete_file(&mut self, path: &str) -> Result<(), VfsError> {
        let node = self
            .find_by_path(path)
            .ok_or_else(|| VfsError::not_found(path))?;
        let id = node.id;
        let parent_id = node.parent_id;
        debug!(path, %id, "delete");

        if let Some(parent) = parent_id.and_then(|pid| self.nodes.get_mut(&pid)) {
            parent.children.retain(|child| *child != id);
        }
        self.remove_subtree(id);

        self.persist().await?;
        self.watchers.emit(&ChangeEvent::Removed {
            path: path.to_string(),
        });
        Ok(())
    }

    /// Rename (or move) the node at `old_path` to `new_path`. Directory
    /// renames rewrite every descendant's path by anchored prefix
    /// replacement, preserving relative structure. Persists once.
    pub async fn rename_file(&mut self, old_path: &str, new_path: &str) -> Result<(), VfsError> {
        let id = self
            .find_by_path(old_path)
            .map(|n| n.id)
            .ok_or_else(|| VfsError::not_found(old_path))?;
        if self.nodes.values().any(|n| n.path == new_path && n.id != id) {
            return Err(VfsError::PathOccupied(new_path.to_string()));
        }
        debug!(old_path, new_path, "rename");

        let parent_id = {
            let node = self.nodes.get_mut(&id).expect("node table entry");
            node.name = vpath::leaf_name(new_path);
            node.path = new_path.to_string();
            node.last_modified = Utc::now();
            if node.is_file() {
                node.language = vpath::language_for(&node.name);
            }
            node.parent_id
        };

        if self.nodes[&id].is_directory() {
            let mut descendants = Vec::new();
            self.collect_descendants(id, &mut descendants);
            for desc_id in descendants {
                let node = self.nodes.get_mut(&desc_id).expect("cached child");
                if let Some(rewritten) = vpath::rewrite_prefix(&node.path, old_path, new_path) {
                    node.path = rewritten;
                }
            }
        }

        // The new name can change this node's position among its siblings.
        if let Some(pid) = parent_id {
            rebuild::sort_children(&mut self.nodes, pid);
        }

        self.persist().await?;
        self.watchers.emit(&ChangeEvent::Renamed {
            from: old_path.to_string(),
            to: new_path.to_string(),
        });
        Ok(())
    }

    /// Move is defined as a rename; no distinct semantics.
    pub async fn move_file(&mut self, old_path: &str, new_path: &str) -> Result<(), VfsError> {
        self.rename_file(old_path, new_path).await
    }

    // ---- Lookups -------------------------------------------------------

    pub fn get_file_by_id(&self, id: NodeId) -> Option<FileNode> {
        self.nodes.get(&id).cloned()
    }

    pub fn get_file_by_path(&self, path: &str) -> Option<FileNode> {
        self.find_by_path(path).cloned()
    }

    pub fn get_all_files(&self) -> Vec<FileNode> {
        self.nodes.values().cloned().collect()
    }

    /// Sorted root-level nodes, each materialized with its recursive
    /// children.
    pub fn get_file_tree(&self) -> Vec<TreeEntry> {
        let mut roots: Vec<&FileNode> = self.nodes.values().filter(|n| n.parent_id.is_none()).collect();
        roots.sort_by(|a, b| sibling_order(a, b));
        roots.iter().map(|n| self.materialize(n)).collect()
    }

    /// Cached children of the directory at `path`, in sibling order.
    pub fn list_directory(&self, path: &str) -> Result<Vec<FileNode>, VfsError> {
        let dir = self
            .nodes
            .values()
            .find(|n| n.path == path && n.is_directory())
            .ok_or_else(|| VfsError::not_found(path))?;
        Ok(dir
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id).cloned())
            .collect())
    }

    /// Search live file nodes. See [`crate::search`].
    pub fn search_files(&self, options: &FileSearchOptions) -> Result<Vec<SearchResult>, VfsError> {
        search::search_nodes(self.nodes.values(), options)
    }

    // ---- Watch ---------------------------------------------------------

    /// Register a callback for writes to exactly `path`.
    pub fn watch_file(
        &self,
        path: &str,
        callback: impl Fn(&str) + Send + Sync + 'static,
    ) -> WatchHandle {
        self.watchers.watch(path, callback)
    }

    /// Subscribe to the typed change-event feed.
    pub fn subscribe_changes(
        &self,
        callback: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> SubscriptionHandle {
        self.watchers.subscribe(callback)
    }

    // ---- Persistence ---------------------------------------------------

    /// Snapshot the whole table to the backing store.
    pub async fn save_snapshot(&self) -> Result<(), VfsError> {
        self.persist().await
    }

    /// Replace the in-memory table with the stored snapshot and rebuild
    /// the derived tree.
    pub async fn load_snapshot(&mut self) -> Result<(), VfsError> {
        let records = self.store.load_all().await?;
        self.nodes = records.into_iter().map(|n| (n.id, n)).collect();
        rebuild::rebuild_children(&mut self.nodes);
        Ok(())
    }

    /// Serialize the project (full node list plus metadata) to a portable
    /// JSON document.
    pub fn export_project(&self) -> Result<String, VfsError> {
        let mut files = self.get_all_files();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        ProjectArchive::new(&self.project_name, files).to_json()
    }

    /// Destructively replace the whole table with an archive's file list,
    /// rebuild the tree, and persist. Not a merge.
    pub async fn import_project(&mut self, text: &str) -> Result<(), VfsError> {
        let archive = ProjectArchive::from_json(text)?;
        info!(
            name = %archive.metadata.name,
            files = archive.files.len(),
            "importing project"
        );
        self.nodes = archive.files.into_iter().map(|n| (n.id, n)).collect();
        rebuild::rebuild_children(&mut self.nodes);
        self.persist().await
    }

    // ---- Internal ------------------------------------------------------

    fn find_by_path(&self, path: &str) -> Option<&FileNode> {
        self.nodes.values().find(|n| n.path == path)
    }

    /// Resolve the parent directory by path scan and link the node under
    /// it. Single-segment paths have an empty parent path and stay
    /// root-level.
    fn link_to_parent(&self, node: &mut FileNode) {
        let parent = vpath::parent_path(&node.path);
        if parent.is_empty() {
            return;
        }
        if let Some(dir) = self
            .nodes
            .values()
            .find(|n| n.path == parent && n.is_directory())
        {
            node.parent_id = Some(dir.id);
        }
    }

    fn insert_node(&mut self, node: FileNode) {
        let id = node.id;
        let parent_id = node.parent_id;
        self.nodes.insert(id, node);
        if let Some(pid) = parent_id {
            if let Some(parent) = self.nodes.get_mut(&pid) {
                parent.children.push(id);
            }
            rebuild::sort_children(&mut self.nodes, pid);
        }
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let children = self
            .nodes
            .get(&id)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.remove_subtree(child);
        }
        self.nodes.remove(&id);
    }

    fn collect_descendants(&self, id: NodeId, acc: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        for child in &node.children {
            acc.push(*child);
            self.collect_descendants(*child, acc);
        }
    }

    fn materialize(&self, node: &FileNode) -> TreeEntry {
        let children = node
            .children
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|child| self.materialize(child))
            .collect();
        TreeEntry {
            node: node.clone(),
            children,
        }
    }

    async fn persist(&self) -> Result<(), VfsError> {
        let nodes: Vec<FileNode> = self.nodes.values().cloned().collect();
        self.store.replace_all(&nodes).await?;
        Ok(())
    }

    async fn bootstrap(&mut self) -> Result<(), VfsError> {
        for dir in SEED_DIRECTORIES {
            self.create_directory(dir).await?;
        }
        for seed in SEED_FILES {
            self.create_file(seed.path, seed.content).await?;
        }
        self.persist().await
    }
}
