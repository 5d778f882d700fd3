//! Git history analysis module
//!
//! Produces the version-control summary used by the report and the
//! activity category of the health score.
//!
//! # Example
//!
//! ```no_run
//! use codestat::git::summarize;
//! use std::path::Path;
//!
//! let summary = summarize(Path::new("/path/to/repo"), 10);
//! println!("{} commits", summary.total_commits);
//! ```

pub mod history;

pub use history::{summarize, ACTIVITY_WINDOW_DAYS};
