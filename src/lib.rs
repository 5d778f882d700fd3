//! codestat - line counts, largest files, TODO markers, git activity,
//! dependency signals and a health score for a source tree.
//!
//! The binary drives everything through [`cli::run`]; the analysis modules
//! are usable on their own:
//!
//! ```no_run
//! use codestat::analysis::analyze_loc;
//! use codestat::discovery::{discover, DiscoveryOptions, SourceFiles};
//! use std::path::Path;
//!
//! let files = discover(Path::new("."), &DiscoveryOptions::default())?;
//! let loc = analyze_loc(&files, &SourceFiles::new());
//! println!("{} lines of code", loc.totals.code);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod deps;
pub mod discovery;
pub mod git;
pub mod models;
pub mod reporters;
pub mod scoring;
