//! Content search across live file nodes.
//!
//! A linear scan, like path lookup: acceptable for a single small project
//! tree. Matching is line-oriented; results are ordered by file path and
//! capped by `max_results` total matches.

use crate::error::VfsError;
use crate::tree::FileNode;
use crate::types::NodeId;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Search options. `query` is a literal unless `regex` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSearchOptions {
    pub query: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub whole_word: bool,
    #[serde(default)]
    pub regex: bool,
    /// Path patterns to search; empty means all files.
    #[serde(default)]
    pub include_patterns: Vec<String>,
    /// Path patterns to skip.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Cap on total matches across all files; None means unbounded.
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// A single match within a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column of the match start.
    pub column: usize,
    /// The matched text.
    pub text: String,
    /// The full matching line, trimmed.
    pub preview: String,
}

/// All matches within one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub file_id: NodeId,
    pub file_name: String,
    pub file_path: String,
    pub matches: Vec<SearchMatch>,
}

fn build_matcher(options: &FileSearchOptions) -> Result<Regex, VfsError> {
    let mut pattern = if options.regex {
        options.query.clone()
    } else {
        regex::escape(&options.query)
    };
    if options.whole_word {
        pattern = format!(r"\b(?:{})\b", pattern);
    }
    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|e| VfsError::InvalidPattern(e.to_string()))
}

/// Glob-ish path pattern match: `**` spans segments, a single `*` splits
/// the pattern into a prefix/fragment pair. Exact or substring otherwise.
fn matches_pattern(path: &str, pattern: &str) -> bool {
    if let Some((prefix, suffix)) = pattern.split_once("**") {
        if prefix.is_empty() {
            return path.contains(suffix);
        } else if suffix.is_empty() {
            return path.starts_with(prefix);
        }
        return path.starts_with(prefix) && path.contains(suffix);
    }
    if let Some((prefix, fragment)) = pattern.split_once('*') {
        return path.starts_with(prefix) && path.contains(fragment);
    }
    path == pattern || path.contains(pattern)
}

fn path_selected(path: &str, options: &FileSearchOptions) -> bool {
    if options
        .exclude_patterns
        .iter()
        .any(|p| matches_pattern(path, p))
    {
        return false;
    }
    if options.include_patterns.is_empty() {
        return true;
    }
    options
        .include_patterns
        .iter()
        .any(|p| matches_pattern(path, p))
}

/// Search the given nodes. Directories and filtered-out paths are skipped.
pub fn search_nodes<'a>(
    nodes: impl Iterator<Item = &'a FileNode>,
    options: &FileSearchOptions,
) -> Result<Vec<SearchResult>, VfsError> {
    let matcher = build_matcher(options)?;
    let limit = options.max_results.unwrap_or(usize::MAX);

    let mut candidates: Vec<&FileNode> = nodes
        .filter(|n| n.is_file() && path_selected(&n.path, options))
        .collect();
    candidates.sort_by(|a, b| a.path.cmp(&b.path));

    let mut results = Vec::new();
    let mut total = 0usize;
    'files: for node in candidates {
        let Some(content) = node.content.as_deref() else {
            continue;
        };
        let mut matches = Vec::new();
        for (line_idx, line) in content.lines().enumerate() {
            for found in matcher.find_iter(line) {
                matches.push(SearchMatch {
                    line: line_idx + 1,
                    column: found.start() + 1,
                    text: found.as_str().to_string(),
                    preview: line.trim().to_string(),
                });
                total += 1;
                if total >= limit {
                    break;
                }
            }
            if total >= limit {
                break;
            }
        }
        if !matches.is_empty() {
            results.push(SearchResult {
                file_id: node.id,
                file_name: node.name.clone(),
                file_path: node.path.clone(),
                matches,
            });
        }
        if total >= limit {
            break 'files;
        }
    }
    Ok(results)
}
