//! Dependency manifest analysis
//!
//! Reads `package.json` (npm, yarn, pnpm) or `Cargo.toml` from the scan
//! root. A missing or unparsable manifest yields the empty summary.

use crate::models::{Dependency, DependencyCounts, DependencyKind, DepsSummary, PackageManager};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while reading a manifest
#[derive(Error, Debug)]
pub enum DepsError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package.json: {0}")]
    PackageJson(#[from] serde_json::Error),

    #[error("Invalid Cargo.toml: {0}")]
    CargoToml(#[from] toml::de::Error),
}

pub type DepsResult<T> = Result<T, DepsError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    peer_dependencies: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    optional_dependencies: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CargoManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, toml::Value>,
    #[serde(default)]
    dev_dependencies: BTreeMap<String, toml::Value>,
    #[serde(default)]
    build_dependencies: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct OutdatedEntry {
    latest: Option<String>,
}

/// Summarize the dependencies declared in `root`.
///
/// With `check_outdated`, npm projects are checked with `npm outdated`,
/// which needs network access and can be slow.
pub fn analyze_deps(root: &Path, check_outdated: bool) -> DepsSummary {
    match read_manifest(root, check_outdated) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Skipping dependency analysis: {}", e);
            DepsSummary::default()
        }
    }
}

fn read_manifest(root: &Path, check_outdated: bool) -> DepsResult<DepsSummary> {
    let package_json = root.join("package.json");
    if package_json.is_file() {
        return npm_summary(root, &package_json, check_outdated);
    }

    let cargo_toml = root.join("Cargo.toml");
    if cargo_toml.is_file() {
        return cargo_summary(root, &cargo_toml);
    }

    debug!("No dependency manifest in {}", root.display());
    Ok(DepsSummary::default())
}

fn read_to_string(path: &Path) -> DepsResult<String> {
    std::fs::read_to_string(path).map_err(|source| DepsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Package manager implied by the lockfile, in pnpm, yarn, npm order.
fn detect_package_manager(root: &Path) -> (PackageManager, bool) {
    let candidates = [
        ("pnpm-lock.yaml", PackageManager::Pnpm),
        ("yarn.lock", PackageManager::Yarn),
        ("package-lock.json", PackageManager::Npm),
    ];
    candidates
        .into_iter()
        .find(|(lockfile, _)| root.join(lockfile).exists())
        .map(|(_, manager)| (manager, true))
        .unwrap_or((PackageManager::Unknown, false))
}

fn npm_summary(root: &Path, manifest: &Path, check_outdated: bool) -> DepsResult<DepsSummary> {
    let package: PackageJson = serde_json::from_str(&read_to_string(manifest)?)?;
    let (package_manager, has_lockfile) = detect_package_manager(root);

    let outdated = if check_outdated && package_manager == PackageManager::Npm {
        npm_outdated(root)
    } else {
        HashMap::new()
    };

    let json_version = |v: &serde_json::Value| match v {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    let mut dependencies = Vec::new();
    for (kind, table, checked) in [
        (DependencyKind::Prod, &package.dependencies, true),
        (DependencyKind::Dev, &package.dev_dependencies, true),
        (DependencyKind::Peer, &package.peer_dependencies, false),
        (DependencyKind::Optional, &package.optional_dependencies, false),
    ] {
        for (name, version) in table {
            let latest = if checked {
                outdated.get(name).cloned()
            } else {
                None
            };
            dependencies.push(Dependency {
                name: name.clone(),
                version: json_version(version),
                kind,
                outdated: latest.is_some(),
                latest,
            });
        }
    }

    Ok(summarize(package_manager, has_lockfile, dependencies))
}

fn cargo_summary(root: &Path, manifest: &Path) -> DepsResult<DepsSummary> {
    let cargo: CargoManifest = toml::from_str(&read_to_string(manifest)?)?;

    let mut dependencies = Vec::new();
    for (kind, table) in [
        (DependencyKind::Prod, &cargo.dependencies),
        (DependencyKind::Dev, &cargo.dev_dependencies),
        (DependencyKind::Build, &cargo.build_dependencies),
    ] {
        for (name, spec) in table {
            dependencies.push(Dependency {
                name: name.clone(),
                version: cargo_version(spec),
                kind,
                latest: None,
                outdated: false,
            });
        }
    }

    let has_lockfile = root.join("Cargo.lock").exists();
    Ok(summarize(PackageManager::Cargo, has_lockfile, dependencies))
}

/// `"1.0"` or `{ version = "1.0", .. }`; path and workspace deps have no version.
fn cargo_version(spec: &toml::Value) -> String {
    match spec {
        toml::Value::String(v) => v.clone(),
        toml::Value::Table(t) => t
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("*")
            .to_string(),
        _ => "*".to_string(),
    }
}

fn summarize(
    package_manager: PackageManager,
    has_lockfile: bool,
    dependencies: Vec<Dependency>,
) -> DepsSummary {
    let mut summary = DependencyCounts::default();
    for dep in &dependencies {
        match dep.kind {
            DependencyKind::Prod => summary.prod += 1,
            DependencyKind::Dev => summary.dev += 1,
            DependencyKind::Peer => summary.peer += 1,
            DependencyKind::Optional => summary.optional += 1,
            DependencyKind::Build => summary.build += 1,
        }
    }

    DepsSummary {
        package_manager,
        has_lockfile,
        total_deps: dependencies.len(),
        outdated_count: dependencies.iter().filter(|d| d.outdated).count(),
        dependencies,
        summary,
    }
}

/// Upper bound on one `npm outdated` run.
const NPM_OUTDATED_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `npm outdated --json` and map package name to latest version.
fn npm_outdated(root: &Path) -> HashMap<String, String> {
    run_outdated(OsStr::new("npm"), root, NPM_OUTDATED_TIMEOUT)
}

/// Run `<program> outdated --json` in `root`, killing it after `timeout`.
/// Any failure yields the empty map.
fn run_outdated(program: &OsStr, root: &Path, timeout: Duration) -> HashMap<String, String> {
    debug!("Running {:?} outdated in {}", program, root.display());
    let mut child = match Command::new(program)
        .args(["outdated", "--json"])
        .current_dir(root)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            warn!("Could not run npm outdated: {}", e);
            return HashMap::new();
        }
    };

    // Drain stdout on its own thread so a large report cannot fill the pipe.
    let reader = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = out.read_to_string(&mut buf);
            buf
        })
    });

    let start = Instant::now();
    loop {
        match child.try_wait() {
            // Exit status 1 just means something is outdated.
            Ok(Some(_)) => break,
            Ok(None) if start.elapsed() > timeout => {
                let _ = child.kill();
                let _ = child.wait();
                warn!("npm outdated timed out after {}s", timeout.as_secs());
                return HashMap::new();
            }
            Ok(None) => thread::sleep(Duration::from_millis(100)),
            Err(e) => {
                warn!("Failed waiting for npm outdated: {}", e);
                let _ = child.kill();
                return HashMap::new();
            }
        }
    }

    let stdout = reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    parse_outdated(&stdout)
}

fn parse_outdated(stdout: &str) -> HashMap<String, String> {
    let (Some(start), Some(end)) = (stdout.find('{'), stdout.rfind('}')) else {
        return HashMap::new();
    };
    if end < start {
        return HashMap::new();
    }

    match serde_json::from_str::<HashMap<String, OutdatedEntry>>(&stdout[start..=end]) {
        Ok(entries) => entries
            .into_iter()
            .filter_map(|(name, entry)| entry.latest.map(|latest| (name, latest)))
            .collect(),
        Err(e) => {
            debug!("Unparsable npm outdated output: {}", e);
            HashMap::new()
        }
    }
}
