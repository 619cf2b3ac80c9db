//! Error taxonomy for the file system service and its backing store.

use thiserror::Error;

/// Backing-store failures: open, read, write, or record codec errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Backing store error: {0}")]
    Backend(#[from] sled::Error),

    #[error("Record codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Service-level failures surfaced to callers.
///
/// CRUD methods fail by signaling the specific condition to the immediate
/// caller; user-facing messaging is the caller's responsibility.
#[derive(Debug, Error)]
pub enum VfsError {
    /// Operation references a path or id with no matching live node.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Import blob failed to parse as the expected archive shape.
    #[error("Malformed import: {0}")]
    MalformedImport(String),

    /// Backing store open/read/write failed. Fatal at initialization.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Create or rename would leave two live nodes sharing a path.
    #[error("Path occupied: {0}")]
    PathOccupied(String),

    /// Search query failed to compile to a matcher.
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VfsError {
    /// Build the canonical not-found error for a path.
    pub fn not_found(path: &str) -> Self {
        VfsError::NotFound(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_carries_path() {
        let err = VfsError::not_found("/src/main.rs");
        assert_eq!(err.to_string(), "Not found: /src/main.rs");
    }

    #[test]
    fn test_storage_error_wraps_into_vfs_error() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err: VfsError = StorageError::from(io).into();
        assert!(matches!(err, VfsError::Storage(_)));
    }
}
