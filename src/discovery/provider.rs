//! File content provider for the analyzers.
//!
//! Analyzers never touch the filesystem directly; they ask a `FileProvider`
//! for a file's content. This keeps them testable with in-memory files and
//! lets the three concurrent analyzers share a single read of each file.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Supplies file contents to the analyzers.
///
/// Implementations must be `Send + Sync` so they can be shared across
/// rayon's parallel analysis.
pub trait FileProvider: Send + Sync {
    /// Read (or return cached) file content as UTF-8.
    ///
    /// `None` means the file could not be read: it vanished, permissions
    /// were denied, or the bytes are not valid UTF-8. Callers exclude such
    /// files from every count.
    fn content(&self, path: &Path) -> Option<Arc<String>>;
}

/// Disk-backed provider that caches every read, including failed ones.
#[derive(Default)]
pub struct SourceFiles {
    cache: DashMap<PathBuf, Option<Arc<String>>>,
}

impl SourceFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct paths read so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

impl FileProvider for SourceFiles {
    fn content(&self, path: &Path) -> Option<Arc<String>> {
        if let Some(hit) = self.cache.get(path) {
            return hit.value().clone();
        }

        let loaded = match std::fs::read_to_string(path) {
            Ok(content) => Some(Arc::new(content)),
            Err(e) => {
                debug!("Skipping unreadable file {}: {}", path.display(), e);
                None
            }
        };

        self.cache
            .entry(path.to_path_buf())
            .or_insert(loaded)
            .value()
            .clone()
    }
}

// ---------------------------------------------------------------------------
// Test-only mock
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::mock::MockFileProvider;
    use super::*;

    #[test]
    fn test_mock_provider_basics() {
        let provider = MockFileProvider::new(vec![
            ("src/main.rs", "fn main() {}"),
            ("README.md", "# Hello"),
        ])
        .unreadable("secret.rs", 42);

        let records = provider.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].language, "Rust");
        assert_eq!(records[1].language, "Markdown");
        assert_eq!(records[2].size, 42);

        let content = provider
            .content(&records[0].path)
            .expect("content should exist");
        assert_eq!(content.as_str(), "fn main() {}");
        assert!(provider.content(&records[2].path).is_none());
    }

    #[test]
    fn test_source_files_reads_and_caches() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "hello\nworld").expect("write");

        let provider = SourceFiles::new();
        let first = provider.content(&file).expect("readable");
        assert_eq!(first.as_str(), "hello\nworld");

        // Cached: a later change on disk is not observed within a scan.
        std::fs::write(&file, "changed").expect("rewrite");
        let second = provider.content(&file).expect("cached");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.cached_len(), 1);
    }

    #[test]
    fn test_source_files_missing_and_non_utf8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let provider = SourceFiles::new();
        assert!(provider.content(&dir.path().join("nope.rs")).is_none());

        let binary = dir.path().join("blob.bin");
        std::fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).expect("write");
        assert!(provider.content(&binary).is_none());
        assert_eq!(provider.cached_len(), 2);
    }
}
