//! Arbor: Virtual Workspace File System
//!
//! An in-memory hierarchical file/directory store with durable snapshot
//! backing, path-based addressing, parent/child maintenance, and
//! rename/move/delete propagation across subtrees.

pub mod config;
pub mod error;
pub mod logging;
pub mod project;
pub mod search;
pub mod service;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod watch;

pub use error::{StorageError, VfsError};
pub use service::FileSystemService;
pub use tree::{FileNode, TreeEntry};
pub use types::{NodeId, NodeKind};
