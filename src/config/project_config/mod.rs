//! Project-level configuration support
//!
//! Loads per-project configuration from `codestat.toml` in the scan root.
//!
//! # Configuration Format
//!
//! ```toml
//! # codestat.toml
//!
//! [exclude]
//! paths = ["generated/**", "**/*.min.js"]
//! skip_defaults = false
//!
//! [defaults]
//! format = "text"
//! top = 10
//! todo_top = 15
//! workers = 8
//! no_git = false
//! check_outdated = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the config file looked up in the scan root.
pub const CONFIG_FILE_NAME: &str = "codestat.toml";

/// Built-in exclusion patterns for dependency, build and tooling directories.
/// These are applied automatically unless `skip_defaults = true` in config.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
    "**/.git/**",
    "**/vendor/**",
    "**/__pycache__/**",
    "**/venv/**",
    "**/.venv/**",
    "**/coverage/**",
    "**/.next/**",
    "**/.nuxt/**",
    "**/target/**",
    "**/bin/**",
    "**/obj/**",
];

/// Errors that can occur while loading `codestat.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Project-level configuration loaded from `codestat.toml`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Path exclusion patterns
    #[serde(default)]
    pub exclude: ExcludeConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Path exclusion configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExcludeConfig {
    /// Globs, relative to the scan root, to exclude from analysis
    #[serde(default)]
    pub paths: Vec<String>,

    /// If true, disable built-in default exclusion patterns
    #[serde(default)]
    pub skip_defaults: bool,
}

impl ExcludeConfig {
    /// Returns effective exclusion patterns (defaults + user patterns).
    /// If `skip_defaults` is true, only user patterns are returned.
    pub fn effective_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();

        if !self.skip_defaults {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()));
        }

        for p in &self.paths {
            if !patterns.contains(p) {
                patterns.push(p.clone());
            }
        }

        patterns
    }
}

/// Default CLI flags that can be set in project config.
/// Flags given on the command line always win.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json)
    #[serde(default)]
    pub format: Option<String>,

    /// Default length of the ranked file, folder and git lists
    #[serde(default)]
    pub top: Option<usize>,

    /// Default length of the per-file TODO ranking
    #[serde(default)]
    pub todo_top: Option<usize>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,

    /// Skip git history by default
    #[serde(default)]
    pub no_git: Option<bool>,

    /// Run `npm outdated` by default
    #[serde(default)]
    pub check_outdated: Option<bool>,
}

/// Load project configuration from the scan root.
///
/// Returns default configuration if no config file is found or the file
/// cannot be parsed (a warning is logged in that case).
pub fn load_project_config(root: &Path) -> ProjectConfig {
    let toml_path = root.join(CONFIG_FILE_NAME);
    if !toml_path.exists() {
        debug!("No project config found, using defaults");
        return ProjectConfig::default();
    }

    match load_toml_config(&toml_path) {
        Ok(config) => {
            debug!("Loaded project config from {}", toml_path.display());
            config
        }
        Err(e) => {
            warn!("{}; using defaults", e);
            ProjectConfig::default()
        }
    }
}

/// Load configuration from a TOML file
pub fn load_toml_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
