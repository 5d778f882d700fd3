//! Line statistics over a discovered file list
//!
//! - [`syntax`] - comment markers per language family
//! - [`classifier`] - code/comment/blank classification of one file
//! - [`loc`] - per-language rollups and grand totals
//! - [`files`] - largest files and folder density
//! - [`todos`] - TODO/FIXME/HACK/XXX/BUG/NOTE markers
//!
//! Every analyzer takes the same `&[FileRecord]` plus a [`FileProvider`]
//! and owns its own output, so they can run side by side. Files the
//! provider cannot read are left out of every count.
//!
//! [`FileProvider`]: crate::discovery::FileProvider

pub mod classifier;
pub mod files;
pub mod loc;
pub mod syntax;
pub mod todos;

pub use classifier::classify;
pub use files::{analyze_files, DEFAULT_TOP_FILES};
pub use loc::analyze_loc;
pub use todos::{analyze_todos, DEFAULT_TOP_TODO_FILES};

/// Number of lines as seen by a plain split on `\n`.
pub fn line_count(content: &str) -> usize {
    content.split('\n').count()
}

/// Trim whitespace plus the U+FEFF byte-order mark, which `str::trim`
/// keeps. Editors on Windows often prefix the first line with one.
pub(crate) fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// A top-N of zero means "not set"; fall back to the analyzer default.
pub(crate) fn effective_top_n(top_n: usize, default: usize) -> usize {
    if top_n == 0 {
        default
    } else {
        top_n
    }
}
