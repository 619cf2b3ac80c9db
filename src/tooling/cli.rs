//! CLI command definitions and execution.
//!
//! The CLI is the user-facing layer: it owns confirmation prompts and
//! message formatting; the service only raises typed failures.

use crate::config::{ArborConfig, ConfigLoader};
use crate::error::{StorageError, VfsError};
use crate::search::FileSearchOptions;
use crate::service::FileSystemService;
use crate::store::SledSnapshotStore;
use crate::tree::TreeEntry;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "arbor", about = "Virtual workspace file system", version)]
pub struct Cli {
    /// Config file path (default: ./arbor.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backing-store path, overriding configuration
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default config file
    Init {
        #[arg(long, default_value = "arbor.toml")]
        path: PathBuf,
    },
    /// Print the project tree
    Tree,
    /// List a directory
    Ls { path: String },
    /// Print a file's content
    Cat { path: String },
    /// Write content to a file, creating it if absent
    Write { path: String, content: String },
    /// Create a directory
    Mkdir { path: String },
    /// Remove a file, or a directory and its whole subtree
    Rm {
        path: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Rename or move a node
    Mv { from: String, to: String },
    /// Search file contents
    Search {
        query: String,
        #[arg(long)]
        regex: bool,
        #[arg(long)]
        case_sensitive: bool,
        /// Match whole words only
        #[arg(long)]
        word: bool,
        /// Cap on total matches
        #[arg(long)]
        max: Option<usize>,
    },
    /// Export the project archive
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a project archive, replacing the whole workspace
    Import {
        input: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Write the default config file (`init`). Needs no store.
pub fn write_default_config(path: &Path) -> Result<String, VfsError> {
    let text = ConfigLoader::default_toml()?;
    std::fs::write(path, text).map_err(|e| VfsError::Storage(StorageError::Io(e)))?;
    Ok(format!("Wrote {}\n", path.display()))
}

/// CLI context holding the opened service.
pub struct CliContext {
    service: FileSystemService,
}

impl CliContext {
    /// Open the backing store per configuration and initialize the service.
    pub async fn new(config: &ArborConfig, store_override: Option<&Path>) -> Result<Self, VfsError> {
        let store_path = match store_override {
            Some(path) => path.to_path_buf(),
            None => config.storage.resolve_path()?,
        };
        if let Some(parent) = store_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| VfsError::Storage(StorageError::Io(e)))?;
        }
        let store = Arc::new(SledSnapshotStore::open(&store_path)?);
        let service = FileSystemService::initialize(store, &config.project.name).await?;
        Ok(Self { service })
    }

    /// Direct access to the underlying service.
    pub fn service(&mut self) -> &mut FileSystemService {
        &mut self.service
    }

    /// Execute a command and return its textual output.
    pub async fn execute(&mut self, command: &Commands) -> Result<String, VfsError> {
        match command {
            Commands::Init { path } => write_default_config(path),
            Commands::Tree => Ok(self.render_tree()),
            Commands::Ls { path } => self.render_listing(path),
            Commands::Cat { path } => self.service.read_file(path),
            Commands::Write { path, content } => {
                self.service.write_file(path, content).await?;
                Ok(format!("Wrote {} ({} bytes)\n", path, content.len()))
            }
            Commands::Mkdir { path } => {
                let node = self.service.create_directory(path).await?;
                Ok(format!("Created {}\n", node.path))
            }
            Commands::Rm { path, force } => {
                if !force && !confirm_removal(path)? {
                    return Ok("Aborted.\n".to_string());
                }
                self.service.delete_file(path).await?;
                Ok(format!("Removed {}\n", path))
            }
            Commands::Mv { from, to } => {
                self.service.rename_file(from, to).await?;
                Ok(format!("Renamed {} -> {}\n", from, to))
            }
            Commands::Search {
                query,
                regex,
                case_sensitive,
                word,
                max,
            } => {
                let options = FileSearchOptions {
                    query: query.clone(),
                    regex: *regex,
                    case_sensitive: *case_sensitive,
                    whole_word: *word,
                    max_results: *max,
                    ..Default::default()
                };
                Ok(self.render_search(&options)?)
            }
            Commands::Export { output } => {
                let archive = self.service.export_project()?;
                match output {
                    Some(path) => {
                        std::fs::write(path, &archive)
                            .map_err(|e| VfsError::Storage(StorageError::Io(e)))?;
                        Ok(format!("Exported to {}\n", path.display()))
                    }
                    None => Ok(archive),
                }
            }
            Commands::Import { input, force } => {
                let text = std::fs::read_to_string(input)
                    .map_err(|e| VfsError::Storage(StorageError::Io(e)))?;
                if !force && !confirm_import()? {
                    return Ok("Aborted.\n".to_string());
                }
                self.service.import_project(&text).await?;
                Ok(format!(
                    "Imported {} ({} nodes)\n",
                    input.display(),
                    self.service.node_count()
                ))
            }
        }
    }

    fn render_tree(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{}\n\n",
            format_section_heading(self.service.project_name())
        ));
        for entry in self.service.get_file_tree() {
            render_entry(&entry, 0, &mut out);
        }
        out
    }

    fn render_listing(&self, path: &str) -> Result<String, VfsError> {
        let children = self.service.list_directory(path)?;
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Name", "Kind", "Size", "Modified"]);
        for node in &children {
            let kind = if node.is_directory() { "dir" } else { "file" };
            let size = if node.is_directory() {
                "-".to_string()
            } else {
                format!("{} B", node.size)
            };
            table.add_row(vec![
                node.name.clone(),
                kind.to_string(),
                size,
                node.last_modified.format("%Y-%m-%d %H:%M:%S").to_string(),
            ]);
        }
        Ok(format!("{}\nTotal: {} entries.\n", table, children.len()))
    }

    fn render_search(&self, options: &FileSearchOptions) -> Result<String, VfsError> {
        let results = self.service.search_files(options)?;
        let mut out = String::new();
        let mut total = 0;
        for result in &results {
            out.push_str(&format!("{}\n", result.file_path.bold()));
            for m in &result.matches {
                out.push_str(&format!("  {}:{}  {}\n", m.line, m.column, m.preview));
                total += 1;
            }
        }
        out.push_str(&format!(
            "{} matches in {} files.\n",
            total,
            results.len()
        ));
        Ok(out)
    }
}

fn render_entry(entry: &TreeEntry, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    if entry.node.is_directory() {
        out.push_str(&format!("{}{}/\n", indent, entry.node.name));
        for child in &entry.children {
            render_entry(child, depth + 1, out);
        }
    } else {
        out.push_str(&format!(
            "{}{} ({} B)\n",
            indent, entry.node.name, entry.node.size
        ));
    }
}

fn confirm_removal(path: &str) -> Result<bool, VfsError> {
    dialoguer::Confirm::new()
        .with_prompt(format!("Remove {} and everything under it?", path))
        .default(false)
        .interact()
        .map_err(|e| VfsError::Config(format!("Prompt failed: {}", e)))
}

fn confirm_import() -> Result<bool, VfsError> {
    dialoguer::Confirm::new()
        .with_prompt("Importing replaces the entire workspace. Continue?")
        .default(false)
        .interact()
        .map_err(|e| VfsError::Config(format!("Prompt failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    async fn context(dir: &Path) -> CliContext {
        let config = ArborConfig {
            storage: StorageConfig {
                path: Some(dir.join("store")),
            },
            ..Default::default()
        };
        CliContext::new(&config, None).await.unwrap()
    }

    #[tokio::test]
    async fn test_write_then_cat() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = context(dir.path()).await;

        cli.execute(&Commands::Write {
            path: "/hello.txt".to_string(),
            content: "hi there".to_string(),
        })
        .await
        .unwrap();

        let output = cli
            .execute(&Commands::Cat {
                path: "/hello.txt".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(output, "hi there");
    }

    #[tokio::test]
    async fn test_tree_renders_seeded_project() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = context(dir.path()).await;
        let output = cli.execute(&Commands::Tree).await.unwrap();
        assert!(output.contains("README.md"));
    }

    #[tokio::test]
    async fn test_rm_force_removes() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = context(dir.path()).await;
        cli.execute(&Commands::Mkdir {
            path: "/scratch".to_string(),
        })
        .await
        .unwrap();

        cli.execute(&Commands::Rm {
            path: "/scratch".to_string(),
            force: true,
        })
        .await
        .unwrap();
        assert!(cli.service().get_file_by_path("/scratch").is_none());
    }

    #[tokio::test]
    async fn test_export_import_round_trip_via_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut cli = context(dir.path()).await;
        let archive_path = dir.path().join("project.json");

        cli.execute(&Commands::Export {
            output: Some(archive_path.clone()),
        })
        .await
        .unwrap();
        let before = cli.service().node_count();

        let output = cli
            .execute(&Commands::Import {
                input: archive_path,
                force: true,
            })
            .await
            .unwrap();
        assert!(output.starts_with("Imported"));
        assert_eq!(cli.service().node_count(), before);
    }
}
