//! TODO/FIXME marker scanner
//!
//! A marker only counts when it follows a comment opener (`//`, `#`, `/*`
//! or `<!--`) and is itself followed by a colon or whitespace. Each line
//! registers at most one marker: the kinds are tried in [`TodoKind::ALL`]
//! order and the first hit wins.

use super::{effective_top_n, trim_line};
use crate::discovery::FileProvider;
use crate::models::{FileRecord, FileTodoCount, TodoItem, TodoKind, TodoResult};
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::debug;

pub const DEFAULT_TOP_TODO_FILES: usize = 15;

/// Items kept in [`TodoResult::items`]; counts are never capped.
pub const MAX_ITEMS: usize = 100;

fn patterns() -> &'static [(TodoKind, Regex)] {
    static PATTERNS: OnceLock<Vec<(TodoKind, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        TodoKind::ALL
            .iter()
            .filter_map(|&kind| {
                let source = format!(
                    r"(?i)(?://|#|/\*|<!--)\s*{}[:\s](.+?)(?:\*/|-->)?$",
                    kind.as_str()
                );
                // Built from fixed keywords, so this only fails on a typo above.
                Regex::new(&source).ok().map(|re| (kind, re))
            })
            .collect()
    })
}

/// A marker found on one line: kind, text, 1-based line number.
type Hit = (TodoKind, String, usize);

fn scan_line(line: &str) -> Option<(TodoKind, String)> {
    patterns().iter().find_map(|(kind, re)| {
        let caps = re.captures(line)?;
        let text = caps
            .get(1)
            .map(|m| trim_line(m.as_str()))
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| trim_line(line));
        Some((*kind, text.to_string()))
    })
}

fn scan_content(content: &str) -> Vec<Hit> {
    content
        .split('\n')
        .enumerate()
        .filter_map(|(i, line)| scan_line(line).map(|(kind, text)| (kind, text, i + 1)))
        .collect()
}

/// Scan every readable file for markers.
///
/// Items are kept in encounter order (input order, then line order) up to
/// [`MAX_ITEMS`]. `by_file` is ranked by count and truncated to `top_n`
/// (0 means [`DEFAULT_TOP_TODO_FILES`]).
pub fn analyze_todos(
    files: &[FileRecord],
    provider: &dyn FileProvider,
    top_n: usize,
) -> TodoResult {
    let top_n = effective_top_n(top_n, DEFAULT_TOP_TODO_FILES);

    let hits: Vec<Vec<Hit>> = files
        .par_iter()
        .map(|file| {
            provider
                .content(&file.path)
                .map(|c| scan_content(&c))
                .unwrap_or_default()
        })
        .collect();

    let mut items = Vec::new();
    let mut by_type: BTreeMap<TodoKind, usize> = BTreeMap::new();
    let mut by_file: Vec<FileTodoCount> = Vec::new();
    let mut file_index: HashMap<&str, usize> = HashMap::new();
    let mut total = 0;

    for (file, hits) in files.iter().zip(hits) {
        for (kind, text, line) in hits {
            total += 1;
            *by_type.entry(kind).or_insert(0) += 1;

            let path = file.relative_path.as_str();
            match file_index.get(path) {
                Some(&i) => by_file[i].count += 1,
                None => {
                    file_index.insert(path, by_file.len());
                    by_file.push(FileTodoCount {
                        file: path.to_string(),
                        count: 1,
                    });
                }
            }

            if items.len() < MAX_ITEMS {
                items.push(TodoItem {
                    kind,
                    text,
                    file: file.relative_path.clone(),
                    line,
                });
            }
        }
    }

    by_file.sort_by(|a, b| b.count.cmp(&a.count));
    by_file.truncate(top_n);

    debug!("Found {} markers in {} files", total, file_index.len());

    TodoResult {
        items,
        by_type,
        by_file,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::provider::mock::MockFileProvider;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(patterns().len(), TodoKind::ALL.len());
    }

    #[test]
    fn test_scan_line_markers() {
        assert_eq!(
            scan_line("// TODO: refactor this"),
            Some((TodoKind::Todo, "refactor this".to_string()))
        );
        assert_eq!(
            scan_line("    # fixme handle errors"),
            Some((TodoKind::Fixme, "handle errors".to_string()))
        );
        assert_eq!(
            scan_line("/* HACK: temporary */"),
            Some((TodoKind::Hack, "temporary".to_string()))
        );
        assert_eq!(
            scan_line("<!-- NOTE: keep in sync -->"),
            Some((TodoKind::Note, "keep in sync".to_string()))
        );
    }

    #[test]
    fn test_marker_needs_comment_opener_and_separator() {
        assert_eq!(scan_line("let todo = TODO: 1;"), None);
        assert_eq!(scan_line("// TODOS are fine"), None);
        assert_eq!(scan_line("// mastodon: not a marker"), None);
        assert_eq!(scan_line("// TODO"), None);
    }

    #[test]
    fn test_first_kind_wins() {
        // Both markers are present; TODO is tried before FIXME.
        assert_eq!(
            scan_line("// FIXME: x // TODO: y").map(|(k, _)| k),
            Some(TodoKind::Todo)
        );
        assert_eq!(
            scan_line("# BUG: crash, see NOTE below").map(|(k, _)| k),
            Some(TodoKind::Bug)
        );
    }

    #[test]
    fn test_blank_capture_falls_back_to_line() {
        let line = "  // TODO:   ";
        assert_eq!(
            scan_line(line),
            Some((TodoKind::Todo, "// TODO:".to_string()))
        );
    }

    #[test]
    fn test_results_grouped_and_ranked() {
        let provider = MockFileProvider::new(vec![
            ("a.rs", "// TODO: one\nfn a() {}\n// FIXME: two"),
            ("b.py", "# TODO: three\n# XXX: four\n# BUG: five"),
            ("c.js", "const c = 1;"),
        ])
        .unreadable("d.rs", 10);

        let result = analyze_todos(provider.records(), &provider, 0);
        assert_eq!(result.total, 5);
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.items[0].file, "a.rs");
        assert_eq!(result.items[0].line, 1);
        assert_eq!(result.items[1].kind, TodoKind::Fixme);
        assert_eq!(result.items[1].line, 3);
        assert_eq!(result.items[4].text, "five");

        assert_eq!(result.by_type[&TodoKind::Todo], 2);
        assert_eq!(result.by_type[&TodoKind::Xxx], 1);
        assert!(!result.by_type.contains_key(&TodoKind::Note));

        assert_eq!(
            result.by_file,
            vec![
                FileTodoCount { file: "b.py".into(), count: 3 },
                FileTodoCount { file: "a.rs".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_items_capped_but_counts_are_not() {
        let body: String = (0..150).map(|i| format!("// TODO: item {i}\n")).collect();
        let provider = MockFileProvider::new(vec![("many.rs", body.as_str()), ("one.rs", "# NOTE: x")]);

        let result = analyze_todos(provider.records(), &provider, 1);
        assert_eq!(result.items.len(), MAX_ITEMS);
        assert_eq!(result.items[99].text, "item 99");
        assert_eq!(result.total, 151);
        assert_eq!(result.by_type[&TodoKind::Todo], 150);
        assert_eq!(result.by_type[&TodoKind::Note], 1);
        assert_eq!(result.by_file.len(), 1);
        assert_eq!(result.by_file[0].file, "many.rs");
    }

    #[test]
    fn test_crlf_lines_still_match() {
        let provider = MockFileProvider::new(vec![("w.cs", "// TODO: windows\r\nint x;\r\n")]);
        let result = analyze_todos(provider.records(), &provider, 0);
        assert_eq!(result.total, 1);
        assert_eq!(result.items[0].text, "windows");
    }
}
