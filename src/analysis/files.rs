//! Largest files and folder density

use super::{effective_top_n, line_count};
use crate::discovery::FileProvider;
use crate::models::{FileAnalysisResult, FileRecord, FolderStats, LargestFile};
use rayon::prelude::*;
use std::collections::HashMap;

pub const DEFAULT_TOP_FILES: usize = 10;

/// Directory part of a `/`-separated relative path; `""` for root-level files.
fn folder_of(relative_path: &str) -> &str {
    relative_path
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or("")
}

/// Rank files by line count and folders by file count.
///
/// Both lists are truncated to `top_n` (0 means [`DEFAULT_TOP_FILES`]).
/// `total_files` counts every record, `total_size` only the readable ones.
pub fn analyze_files(
    files: &[FileRecord],
    provider: &dyn FileProvider,
    top_n: usize,
) -> FileAnalysisResult {
    let top_n = effective_top_n(top_n, DEFAULT_TOP_FILES);

    let lines: Vec<Option<usize>> = files
        .par_iter()
        .map(|file| provider.content(&file.path).map(|c| line_count(&c)))
        .collect();

    let mut largest_files = Vec::new();
    let mut folder_stats: Vec<FolderStats> = Vec::new();
    let mut folder_index: HashMap<&str, usize> = HashMap::new();
    let mut total_size = 0u64;

    for (file, lines) in files.iter().zip(lines) {
        let Some(lines) = lines else {
            continue;
        };
        total_size += file.size;
        largest_files.push(LargestFile {
            path: file.relative_path.clone(),
            lines,
            size: file.size,
        });

        let folder = folder_of(&file.relative_path);
        match folder_index.get(folder) {
            Some(&i) => {
                folder_stats[i].file_count += 1;
                folder_stats[i].total_lines += lines;
            }
            None => {
                folder_index.insert(folder, folder_stats.len());
                folder_stats.push(FolderStats {
                    path: folder.to_string(),
                    file_count: 1,
                    total_lines: lines,
                });
            }
        }
    }

    largest_files.sort_by(|a, b| b.lines.cmp(&a.lines));
    largest_files.truncate(top_n);
    folder_stats.sort_by(|a, b| b.file_count.cmp(&a.file_count));
    folder_stats.truncate(top_n);

    FileAnalysisResult {
        largest_files,
        folder_stats,
        total_files: files.len(),
        total_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::provider::mock::MockFileProvider;

    fn lines(n: usize) -> String {
        vec!["x"; n].join("\n")
    }

    #[test]
    fn test_folder_of() {
        assert_eq!(folder_of("main.rs"), "");
        assert_eq!(folder_of("src/main.rs"), "src");
        assert_eq!(folder_of("src/a/b/c.rs"), "src/a/b");
    }

    #[test]
    fn test_largest_files_ranked_and_truncated() {
        let (small, mid, big) = (lines(3), lines(20), lines(100));
        let provider = MockFileProvider::new(vec![
            ("a.rs", small.as_str()),
            ("src/b.rs", big.as_str()),
            ("src/c.rs", mid.as_str()),
        ]);

        let result = analyze_files(provider.records(), &provider, 2);
        let ranked: Vec<(&str, usize)> = result
            .largest_files
            .iter()
            .map(|f| (f.path.as_str(), f.lines))
            .collect();
        assert_eq!(ranked, vec![("src/b.rs", 100), ("src/c.rs", 20)]);
        assert_eq!(result.total_files, 3);
    }

    #[test]
    fn test_folder_stats_use_empty_root_key() {
        let provider = MockFileProvider::new(vec![
            ("README.md", "a\nb"),
            ("src/a.rs", "x"),
            ("src/b.rs", "x\ny\nz"),
            ("tests/t.rs", "t"),
        ]);

        let result = analyze_files(provider.records(), &provider, 0);
        let src = &result.folder_stats[0];
        assert_eq!(src.path, "src");
        assert_eq!(src.file_count, 2);
        assert_eq!(src.total_lines, 4);

        // Ties keep encounter order: root before tests.
        assert_eq!(result.folder_stats[1].path, "");
        assert_eq!(result.folder_stats[1].display_path(), ".");
        assert_eq!(result.folder_stats[2].path, "tests");
    }

    #[test]
    fn test_unreadable_files_count_in_total_files_only() {
        let provider = MockFileProvider::new(vec![("ok.py", "x = 1")])
            .unreadable("gone.py", 5_000);

        let result = analyze_files(provider.records(), &provider, 10);
        assert_eq!(result.total_files, 2);
        assert_eq!(result.total_size, 5);
        assert_eq!(result.largest_files.len(), 1);
        assert_eq!(result.folder_stats.len(), 1);
        assert_eq!(result.folder_stats[0].file_count, 1);
    }

    #[test]
    fn test_zero_top_n_uses_default() {
        let bodies: Vec<(String, String)> = (0..15)
            .map(|i| (format!("d{i}/f{i}.rs"), lines(i + 1)))
            .collect();
        let provider = MockFileProvider::new(
            bodies
                .iter()
                .map(|(p, b)| (p.as_str(), b.as_str()))
                .collect(),
        );

        let result = analyze_files(provider.records(), &provider, 0);
        assert_eq!(result.largest_files.len(), DEFAULT_TOP_FILES);
        assert_eq!(result.folder_stats.len(), DEFAULT_TOP_FILES);
        assert_eq!(result.largest_files[0].lines, 15);
    }

    #[test]
    fn test_ranking_stable_under_permutation() {
        let bodies: Vec<(String, String)> = (0..12)
            .map(|i| (format!("f{i}.go"), lines((i * 7) % 5 + 1)))
            .collect();
        let forward: Vec<(&str, &str)> = bodies
            .iter()
            .map(|(p, b)| (p.as_str(), b.as_str()))
            .collect();
        let mut reversed = forward.clone();
        reversed.reverse();

        let a = MockFileProvider::new(forward);
        let b = MockFileProvider::new(reversed);
        let top_a = analyze_files(a.records(), &a, 4).largest_files;
        let top_b = analyze_files(b.records(), &b, 4).largest_files;

        let line_values = |files: &[LargestFile]| files.iter().map(|f| f.lines).collect::<Vec<_>>();
        assert_eq!(line_values(&top_a), line_values(&top_b));
        assert_eq!(line_values(&top_a), vec![5, 5, 4, 4]);
    }

    #[test]
    fn test_line_count_follows_split_semantics() {
        let provider = MockFileProvider::new(vec![("a.txt", "one\ntwo\n"), ("b.txt", "")]);
        let result = analyze_files(provider.records(), &provider, 10);
        assert_eq!(result.largest_files[0].lines, 3);
        assert_eq!(result.largest_files[1].lines, 1);
    }
}
