//! Project archive format and first-run bootstrap seed.
//!
//! Export serializes the full node list plus metadata to a single JSON
//! document; import accepts exactly that shape and performs a destructive
//! full-table replace, never a merge.

use crate::error::VfsError;
use crate::tree::FileNode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Archive format version.
pub const ARCHIVE_VERSION: &str = "1.0.0";

/// Portable project archive: flat node list plus metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectArchive {
    pub files: Vec<FileNode>,
    pub metadata: ArchiveMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub name: String,
    pub version: String,
    pub exported_at: DateTime<Utc>,
}

impl ProjectArchive {
    pub fn new(name: &str, files: Vec<FileNode>) -> Self {
        ProjectArchive {
            files,
            metadata: ArchiveMetadata {
                name: name.to_string(),
                version: ARCHIVE_VERSION.to_string(),
                exported_at: Utc::now(),
            },
        }
    }

    /// Serialize to the portable JSON document.
    pub fn to_json(&self) -> Result<String, VfsError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VfsError::MalformedImport(e.to_string()))
    }

    /// Parse an archive document. Fails with `MalformedImport` when the
    /// blob does not match the expected shape.
    pub fn from_json(text: &str) -> Result<Self, VfsError> {
        serde_json::from_str(text).map_err(|e| VfsError::MalformedImport(e.to_string()))
    }
}

/// A file seeded into a fresh workspace.
pub struct SeedFile {
    pub path: &'static str,
    pub content: &'static str,
}

/// Directories of the default project, created before the files.
pub const SEED_DIRECTORIES: &[&str] = &["/"];

/// Files of the default project. Guarantees the service is never observed
/// in an empty, unusable state.
pub const SEED_FILES: &[SeedFile] = &[
    SeedFile {
        path: "/README.md",
        content: "# Welcome\n\nThis workspace was created for you.\n\n\
## Getting started\n\n\
1. Create files from the explorer\n\
2. Edit and save; changes persist locally\n\
3. Export the project at any time to move it elsewhere\n",
    },
    SeedFile {
        path: "/index.js",
        content: "console.log('Hello, World!');\n\n\
function greet(name) {\n  return `Hello, ${name}!`;\n}\n\n\
console.log(greet('Developer'));\n",
    },
    SeedFile {
        path: "/style.css",
        content: "body {\n  font-family: sans-serif;\n  margin: 0;\n  padding: 20px;\n}\n\n\
.container {\n  max-width: 800px;\n  margin: 0 auto;\n}\n",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_json_round_trip() {
        let files = vec![FileNode::file("/a.txt", "alpha".to_string())];
        let archive = ProjectArchive::new("demo", files);
        let text = archive.to_json().unwrap();

        let parsed = ProjectArchive::from_json(&text).unwrap();
        assert_eq!(parsed.metadata.name, "demo");
        assert_eq!(parsed.metadata.version, ARCHIVE_VERSION);
        assert_eq!(parsed.files.len(), 1);
        assert_eq!(parsed.files[0].path, "/a.txt");
        assert_eq!(parsed.files[0].content.as_deref(), Some("alpha"));
    }

    #[test]
    fn test_malformed_archive_is_rejected() {
        let err = ProjectArchive::from_json("{\"files\": 7}").unwrap_err();
        assert!(matches!(err, VfsError::MalformedImport(_)));
    }

    #[test]
    fn test_seed_is_non_empty() {
        assert!(!SEED_DIRECTORIES.is_empty());
        assert!(!SEED_FILES.is_empty());
    }
}
