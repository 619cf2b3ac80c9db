//! In-memory snapshot store.
//!
//! Used for tests. All data is lost when dropped.

use super::SnapshotStore;
use crate::error::StorageError;
use crate::tree::FileNode;
use crate::types::NodeId;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// HashMap-backed store with the same replace/load semantics as the sled
/// implementation, minus durability.
#[derive(Default)]
pub struct MemorySnapshotStore {
    files: RwLock<HashMap<NodeId, FileNode>>,
    metadata: RwLock<HashMap<String, String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn replace_all(&self, nodes: &[FileNode]) -> Result<(), StorageError> {
        let mut files = self.files.write();
        files.clear();
        for node in nodes {
            files.insert(node.id, node.clone());
        }
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<FileNode>, StorageError> {
        Ok(self.files.read().values().cloned().collect())
    }

    async fn put_meta(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.metadata
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get_meta(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.metadata.read().get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_all_then_load_all() {
        let store = MemorySnapshotStore::new();
        let nodes = vec![
            FileNode::file("/a.txt", "a".to_string()),
            FileNode::directory("/d"),
        ];
        store.replace_all(&nodes).await.unwrap();

        let mut loaded = store.load_all().await.unwrap();
        loaded.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].path, "/a.txt");
        assert_eq!(loaded[1].path, "/d");
    }
}
