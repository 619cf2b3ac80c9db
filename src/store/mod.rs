//! Snapshot Store
//!
//! Durable mirror of the in-memory node table. The table is the sole owner
//! of all nodes; the store only snapshots and restores it. Writes are
//! whole-table overwrites, not incremental — correct but not efficient for
//! large trees, acceptable for a single small project tree.

pub mod memory;
pub mod sled_store;

use crate::error::StorageError;
use crate::tree::FileNode;
use async_trait::async_trait;

pub use memory::MemorySnapshotStore;
pub use sled_store::SledSnapshotStore;

/// Snapshot store interface.
///
/// Two record collections: `files` (keyed by node id, value = full node
/// record) and `metadata` (free-form key-value entries, reserved).
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Clear the files collection and insert every given record.
    async fn replace_all(&self, nodes: &[FileNode]) -> Result<(), StorageError>;

    /// Read all file records.
    async fn load_all(&self) -> Result<Vec<FileNode>, StorageError>;

    /// Write a metadata entry.
    async fn put_meta(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Read a metadata entry.
    async fn get_meta(&self, key: &str) -> Result<Option<String>, StorageError>;
}
