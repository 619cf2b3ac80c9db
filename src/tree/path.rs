//! Slash-path utilities.
//!
//! Paths are logical, slash-delimited strings rooted at `/`. They are not
//! OS paths: no normalization, no `.`/`..` resolution, no platform separators.

/// Last path segment, used as the node's display name.
///
/// Falls back to `"untitled"` when the final segment is empty (e.g. `/`).
pub fn leaf_name(path: &str) -> String {
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "untitled".to_string(),
    }
}

/// Everything before the last slash. Empty for single-segment paths,
/// which therefore resolve to no parent directory (root-level).
pub fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// File-name extension, lowercased, without the dot. None when absent.
pub fn extension(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    let ext = &name[idx + 1..];
    if ext.is_empty() || idx == 0 {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Editor language id inferred from a file-name extension. Informational only.
pub fn language_from_extension(ext: &str) -> Option<&'static str> {
    let language = match ext {
        "rs" => "rust",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "javascriptreact",
        "ts" => "typescript",
        "tsx" => "typescriptreact",
        "py" => "python",
        "rb" => "ruby",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "cs" => "csharp",
        "md" | "markdown" => "markdown",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "xml" => "xml",
        "sql" => "sql",
        "sh" | "bash" => "shell",
        "txt" => "plaintext",
        _ => return None,
    };
    Some(language)
}

/// Infer the language for a full path or file name.
pub fn language_for(name: &str) -> Option<String> {
    extension(&leaf_name(name))
        .as_deref()
        .and_then(language_from_extension)
        .map(str::to_string)
}

/// Anchored prefix rewrite for rename cascades.
///
/// Returns the rewritten path when `path` equals `old` or lies strictly
/// beneath it (`old` followed by a `/` boundary); returns None otherwise.
/// A path that merely contains `old` as a substring is never rewritten.
pub fn rewrite_prefix(path: &str, old: &str, new: &str) -> Option<String> {
    if path == old {
        return Some(new.to_string());
    }
    let rest = path.strip_prefix(old)?;
    if rest.starts_with('/') {
        Some(format!("{}{}", new, rest))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name_last_segment() {
        assert_eq!(leaf_name("/src/main.rs"), "main.rs");
        assert_eq!(leaf_name("/README.md"), "README.md");
    }

    #[test]
    fn test_leaf_name_empty_segment_falls_back() {
        assert_eq!(leaf_name("/"), "untitled");
        assert_eq!(leaf_name(""), "untitled");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/src/main.rs"), "/src");
        assert_eq!(parent_path("/src"), "");
        assert_eq!(parent_path("/"), "");
    }

    #[test]
    fn test_extension_and_language() {
        assert_eq!(extension("main.rs").as_deref(), Some("rs"));
        assert_eq!(extension("Makefile"), None);
        assert_eq!(extension(".gitignore"), None);
        assert_eq!(language_for("/app/index.ts").as_deref(), Some("typescript"));
        assert_eq!(language_for("/bin/data.bin"), None);
    }

    #[test]
    fn test_rewrite_prefix_is_anchored() {
        assert_eq!(
            rewrite_prefix("/a/x.txt", "/a", "/b").as_deref(),
            Some("/b/x.txt")
        );
        assert_eq!(rewrite_prefix("/a", "/a", "/b").as_deref(), Some("/b"));
        // Sibling that contains the old path as a substring is untouched.
        assert_eq!(rewrite_prefix("/ab/x.txt", "/a", "/b"), None);
        assert_eq!(rewrite_prefix("/z/a/x.txt", "/a", "/b"), None);
    }
}
