//! Configuration module for codestat
//!
//! This module handles:
//! - Project-level configuration (codestat.toml)
//! - Built-in and user exclude patterns
//! - CLI defaults

mod project_config;

pub use project_config::{
    load_project_config,
    load_toml_config,
    CliDefaults,
    ConfigError,
    ExcludeConfig,
    ProjectConfig,
    CONFIG_FILE_NAME,
    DEFAULT_EXCLUDE_PATTERNS,
};
