//! Node records, path utilities, and derived-tree maintenance.

pub mod node;
pub mod path;
pub mod rebuild;

pub use node::{sibling_order, FileNode, TreeEntry};
