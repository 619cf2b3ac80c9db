//! sled-backed snapshot store.

use super::SnapshotStore;
use crate::error::StorageError;
use crate::tree::FileNode;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

const FILES_TREE: &str = "files";
const METADATA_TREE: &str = "metadata";

/// Snapshot store on a local sled database with two trees, `files` and
/// `metadata`. Records are bincode-encoded, keyed by node id bytes.
pub struct SledSnapshotStore {
    _db: sled::Db,
    files: sled::Tree,
    metadata: sled::Tree,
}

impl SledSnapshotStore {
    /// Open (or create) the database at `path`.
    ///
    /// Failure here is fatal for the service: it is unusable without its
    /// durable store.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        let files = db.open_tree(FILES_TREE)?;
        let metadata = db.open_tree(METADATA_TREE)?;
        debug!(path = %path.display(), records = files.len(), "opened snapshot store");
        Ok(Self {
            _db: db,
            files,
            metadata,
        })
    }
}

#[async_trait]
impl SnapshotStore for SledSnapshotStore {
    async fn replace_all(&self, nodes: &[FileNode]) -> Result<(), StorageError> {
        self.files.clear()?;
        for node in nodes {
            let record = bincode::serialize(node)?;
            self.files.insert(node.id.as_bytes(), record)?;
        }
        self.files.flush_async().await?;
        debug!(records = nodes.len(), "snapshot written");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<FileNode>, StorageError> {
        let mut nodes = Vec::with_capacity(self.files.len());
        for entry in self.files.iter() {
            let (_, value) = entry?;
            nodes.push(bincode::deserialize(&value)?);
        }
        Ok(nodes)
    }

    async fn put_meta(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.metadata.insert(key, value.as_bytes())?;
        self.metadata.flush_async().await?;
        Ok(())
    }

    async fn get_meta(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .metadata
            .get(key)?
            .map(|v| String::from_utf8_lossy(&v).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_all_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledSnapshotStore::open(&dir.path().join("store")).unwrap();

        let first = vec![FileNode::file("/a.txt", "a".to_string())];
        store.replace_all(&first).await.unwrap();
        let second = vec![FileNode::file("/b.txt", "b".to_string())];
        store.replace_all(&second).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].path, "/b.txt");
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        let node = FileNode::file("/keep.txt", "kept".to_string());
        let id = node.id;
        {
            let store = SledSnapshotStore::open(&path).unwrap();
            store.replace_all(&[node]).await.unwrap();
        }

        let store = SledSnapshotStore::open(&path).unwrap();
        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);
        assert_eq!(loaded[0].content.as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn test_metadata_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SledSnapshotStore::open(&dir.path().join("store")).unwrap();

        assert_eq!(store.get_meta("format").await.unwrap(), None);
        store.put_meta("format", "1.0.0").await.unwrap();
        assert_eq!(
            store.get_meta("format").await.unwrap().as_deref(),
            Some("1.0.0")
        );
    }
}
