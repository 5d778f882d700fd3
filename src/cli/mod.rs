//! CLI command definitions and handlers

pub(crate) mod analyze;
mod init;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use analyze::AnalyzeOptions;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// Default worker count; a `workers` value in codestat.toml replaces it.
pub const DEFAULT_WORKERS: usize = 8;

/// codestat - quick structural statistics for a source tree
#[derive(Parser, Debug)]
#[command(name = "codestat")]
#[command(
    version,
    about = "Line counts, largest files, TODO markers and a health score for any codebase",
    long_about = "codestat walks a source tree and reports per-language code/comment/blank \
line counts, the largest files and busiest folders, TODO/FIXME markers, git activity, \
dependency signals and a 0-100 health score.\n\n\
Run without a subcommand to analyze the current directory:\n  \
codestat .",
    after_help = "\
Examples:
  codestat .                              Analyze current directory
  codestat analyze . --format json        JSON output for scripting
  codestat analyze . -i 'generated/**'    Skip generated code
  codestat analyze . -l rust,python       Only count Rust and Python
  codestat init                           Write an example codestat.toml"
)]
pub struct Cli {
    /// Path to analyze (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value_t = DEFAULT_WORKERS, value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a codestat.toml config file with example settings
    Init,

    /// Analyze a source tree (the default command)
    #[command(after_help = "\
Examples:
  codestat analyze .                          Analyze current directory
  codestat analyze /path/to/repo              Analyze a specific directory
  codestat analyze . -f json -o stats.json    Write JSON to a file
  codestat analyze . --top 20 --todo-top 5    Longer file list, shorter TODO list
  codestat analyze . --no-git                 Skip git history
  codestat analyze . --check-outdated         Run npm outdated (slow, needs network)")]
    Analyze {
        /// Output format: text, json
        #[arg(long, short = 'f', value_parser = ["text", "json"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Extra glob patterns to exclude (comma-separated)
        #[arg(long, short = 'i', value_delimiter = ',')]
        ignore: Vec<String>,

        /// Only count these languages (comma-separated, case-insensitive)
        #[arg(long, short = 'l', value_delimiter = ',')]
        lang: Vec<String>,

        /// Length of the largest-file, folder and git lists (0 = default of 10)
        #[arg(long, short = 't')]
        top: Option<usize>,

        /// Length of the per-file TODO ranking (0 = default of 15)
        #[arg(long)]
        todo_top: Option<usize>,

        /// Skip git history
        #[arg(long)]
        no_git: bool,

        /// Check npm dependencies for newer versions
        #[arg(long)]
        check_outdated: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Analyze {
            format,
            output,
            ignore,
            lang,
            top,
            todo_top,
            no_git,
            check_outdated,
        }) => analyze::run(
            &cli.path,
            AnalyzeOptions {
                format,
                output,
                ignore,
                languages: lang,
                top,
                todo_top,
                no_git,
                check_outdated,
            },
            cli.workers,
        ),

        None => {
            // Check if the path looks like an unknown subcommand
            check_unknown_subcommand(&cli.path)?;
            analyze::run(&cli.path, AnalyzeOptions::default(), cli.workers)
        }
    }
}

fn check_unknown_subcommand(path: &std::path::Path) -> Result<()> {
    let path_str = path.to_string_lossy();
    let looks_like_command = !path.exists()
        && !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.starts_with('.');
    if !looks_like_command {
        return Ok(());
    }
    let known_commands = ["init", "analyze"];
    if !known_commands.contains(&path_str.as_ref()) {
        anyhow::bail!(
            "Unknown command '{}'. Run 'codestat --help' for available commands.\n\nDid you mean one of: {}?",
            path_str,
            known_commands.join(", ")
        );
    }
    Ok(())
}
