//! File discovery
//!
//! Walks the scan root, honouring `.gitignore`, `.codestatignore` and the
//! exclude globs from config and the command line, and turns every file
//! into a [`FileRecord`] with a language label.

pub mod provider;

pub use provider::{FileProvider, SourceFiles};

use crate::models::FileRecord;
use anyhow::{Context, Result};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Component, Path};
use tracing::debug;

/// Label for files whose extension is not in the table.
pub const OTHER_LANGUAGE: &str = "Other";

/// Options controlling which files are returned.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Globs relative to the root; matching files and directories are skipped
    pub exclude: Vec<String>,
    /// Keep only files whose language label contains one of these
    /// (case-insensitive). Empty keeps everything.
    pub languages: Vec<String>,
}

/// Map an extension (with or without the leading dot) to a language label.
pub fn language_for_extension(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_lowercase().as_str() {
        "ts" | "tsx" => "TypeScript",
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "py" => "Python",
        "rb" => "Ruby",
        "java" => "Java",
        "kt" => "Kotlin",
        "go" => "Go",
        "rs" => "Rust",
        "c" => "C",
        "cpp" | "cc" => "C++",
        "h" => "C/C++ Header",
        "hpp" => "C++ Header",
        "cs" => "C#",
        "php" => "PHP",
        "swift" => "Swift",
        "scala" => "Scala",
        "vue" => "Vue",
        "svelte" => "Svelte",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "scss" => "SCSS",
        "sass" => "Sass",
        "less" => "Less",
        "json" => "JSON",
        "yaml" | "yml" => "YAML",
        "xml" => "XML",
        "md" => "Markdown",
        "sql" => "SQL",
        "sh" | "bash" | "zsh" => "Shell",
        "ps1" => "PowerShell",
        "r" => "R",
        "lua" => "Lua",
        "dart" => "Dart",
        "ex" | "exs" => "Elixir",
        "erl" => "Erlang",
        "hs" => "Haskell",
        "clj" => "Clojure",
        "elm" => "Elm",
        "graphql" | "gql" => "GraphQL",
        "proto" => "Protocol Buffers",
        "tf" => "Terraform",
        "dockerfile" => "Dockerfile",
        _ => OTHER_LANGUAGE,
    }
}

/// Language label for a path, looking at the file name before the extension.
fn language_for_path(path: &Path) -> &'static str {
    if path.file_name().and_then(|n| n.to_str()) == Some("Dockerfile") {
        return "Dockerfile";
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    language_for_extension(ext)
}

/// `/`-separated path of `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Collect every file under `root`, sorted by relative path.
pub fn discover(root: &Path, options: &DiscoveryOptions) -> Result<Vec<FileRecord>> {
    let mut overrides = OverrideBuilder::new(root);
    for pattern in &options.exclude {
        overrides
            .add(&format!("!{pattern}"))
            .with_context(|| format!("Invalid exclude pattern '{pattern}'"))?;
        // `**/dir/**` only matches the children; also prune the directory.
        if let Some(dir) = pattern.strip_suffix("/**") {
            overrides
                .add(&format!("!{dir}"))
                .with_context(|| format!("Invalid exclude pattern '{pattern}'"))?;
        }
    }
    let overrides = overrides
        .build()
        .context("Failed to build exclude patterns")?;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(".codestatignore")
        .overrides(overrides);

    let wanted: Vec<String> = options
        .languages
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::new();
    for entry in builder.build().flatten() {
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }

        let language = language_for_path(path);
        if !wanted.is_empty() {
            let lower = language.to_lowercase();
            if !wanted.iter().any(|w| lower.contains(w.as_str())) {
                continue;
            }
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        records.push(FileRecord {
            path: path.to_path_buf(),
            relative_path: relative_path(root, path),
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{e}"))
                .unwrap_or_default(),
            language: language.to_string(),
            size,
        });
    }

    records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!("Discovered {} files under {}", records.len(), root.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, body: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(path, body).expect("write file");
    }

    fn rel_paths(records: &[FileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.relative_path.as_str()).collect()
    }

    #[test]
    fn test_language_table() {
        assert_eq!(language_for_extension(".ts"), "TypeScript");
        assert_eq!(language_for_extension("TSX"), "TypeScript");
        assert_eq!(language_for_extension(".md"), "Markdown");
        assert_eq!(language_for_extension(".yml"), "YAML");
        assert_eq!(language_for_extension(".zsh"), "Shell");
        assert_eq!(language_for_extension(".h"), "C/C++ Header");
        assert_eq!(language_for_extension(".unknown"), OTHER_LANGUAGE);
        assert_eq!(language_for_extension(""), OTHER_LANGUAGE);
        assert_eq!(language_for_path(Path::new("docker/Dockerfile")), "Dockerfile");
    }

    #[test]
    fn test_relative_path_is_slash_separated() {
        let root = Path::new("/repo");
        assert_eq!(relative_path(root, Path::new("/repo/src/a/b.rs")), "src/a/b.rs");
        assert_eq!(relative_path(root, Path::new("/repo/top.rs")), "top.rs");
    }

    #[test]
    fn test_discover_records_and_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "src/main.rs", "fn main() {}\n");
        write(root, "README.md", "# hi\n");
        write(root, "src/util/helpers.py", "x = 1\n");
        write(root, ".hidden/secret.rs", "// no\n");

        let records = discover(root, &DiscoveryOptions::default()).expect("discover");
        assert_eq!(
            rel_paths(&records),
            vec!["README.md", "src/main.rs", "src/util/helpers.py"]
        );

        let main = &records[1];
        assert_eq!(main.extension, ".rs");
        assert_eq!(main.language, "Rust");
        assert_eq!(main.size, 13);
        assert_eq!(main.path, root.join("src/main.rs"));
    }

    #[test]
    fn test_discover_applies_exclude_globs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "src/app.js", "a();\n");
        write(root, "node_modules/pkg/index.js", "b();\n");
        write(root, "web/node_modules/x/y.js", "c();\n");
        write(root, "generated/out.rs", "d();\n");
        write(root, "lib/min.min.js", "e();\n");

        let options = DiscoveryOptions {
            exclude: vec![
                "**/node_modules/**".into(),
                "generated/**".into(),
                "**/*.min.js".into(),
            ],
            ..Default::default()
        };
        let records = discover(root, &options).expect("discover");
        assert_eq!(rel_paths(&records), vec!["src/app.js"]);
    }

    #[test]
    fn test_discover_honours_custom_ignore_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, ".codestatignore", "fixtures/\n");
        write(root, "fixtures/big.json", "{}\n");
        write(root, "main.go", "package main\n");

        let records = discover(root, &DiscoveryOptions::default()).expect("discover");
        assert_eq!(rel_paths(&records), vec!["main.go"]);
    }

    #[test]
    fn test_discover_language_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(root, "a.ts", "let a = 1;\n");
        write(root, "b.js", "let b = 1;\n");
        write(root, "c.py", "c = 1\n");

        let options = DiscoveryOptions {
            languages: vec!["script".into()],
            ..Default::default()
        };
        let records = discover(root, &options).expect("discover");
        assert_eq!(rel_paths(&records), vec!["a.ts", "b.js"]);

        let options = DiscoveryOptions {
            languages: vec![" Python ".into()],
            ..Default::default()
        };
        let records = discover(root, &options).expect("discover");
        assert_eq!(rel_paths(&records), vec!["c.py"]);
    }

    #[test]
    fn test_invalid_exclude_pattern_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let options = DiscoveryOptions {
            exclude: vec!["src/[".into()],
            ..Default::default()
        };
        assert!(discover(dir.path(), &options).is_err());
    }
}
