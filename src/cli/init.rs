//! Init command - write an example codestat.toml

use crate::config::{load_toml_config, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# codestat configuration
#
# CLI flags always take precedence over [defaults].

[exclude]
# Extra globs to skip, relative to this directory
paths = []

# Set to true to drop the built-in excludes (node_modules, dist, target, ...)
skip_defaults = false

[defaults]
# Output format (text, json)
format = "text"

# Length of the largest-file, folder and git lists
top = 10

# Length of the per-file TODO ranking
todo_top = 15

# Parallel workers (1-64)
workers = 8

# Skip git history
no_git = false

# Run `npm outdated` for npm projects
check_outdated = false
"#;

/// Run the init command
pub fn run(path: &Path) -> Result<()> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;

    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config_path = repo_path.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        println!(
            "{} {} already exists, leaving it unchanged",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );
    println!(
        "\n{}",
        style("Run 'codestat' to analyze this directory.").dim()
    );

    // Catch template drift against the loader.
    load_toml_config(&config_path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = tempdir().expect("tempdir");
        run(dir.path()).expect("init");

        let config = load_toml_config(&dir.path().join(CONFIG_FILE_NAME)).expect("load");
        assert_eq!(config.defaults.format.as_deref(), Some("text"));
        assert_eq!(config.defaults.top, Some(10));
        assert_eq!(config.defaults.todo_top, Some(15));
        assert_eq!(config.defaults.workers, Some(8));
        assert!(!config.exclude.skip_defaults);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[defaults]\ntop = 3\n").expect("write");

        run(dir.path()).expect("init");
        assert_eq!(
            std::fs::read_to_string(&path).expect("read"),
            "[defaults]\ntop = 3\n"
        );
    }
}
