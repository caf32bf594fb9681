//! Configuration discovery and effective settings resolution.
//!
//! helplint reads `helplint.toml|yaml|yml` from the repository root (or the
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `packages_root`: `Packages`
//! - `output`: `human`
//! - `index_name`: `hyperhelp.json`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::store::DEFAULT_INDEX_NAME;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["helplint.toml", "helplint.yaml", "helplint.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `helplint.toml|yaml`.
pub struct HelplintConfig {
    /// Directory holding one folder per package, relative to the repo root.
    pub packages_root: Option<String>,
    pub output: Option<String>,
    /// File name of help indexes inside packages.
    pub index_name: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub packages_root: PathBuf,
    pub output: String,
    pub index_name: String,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `helplint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `HelplintConfig` from `helplint.toml` or `helplint.yaml|yml` if present.
///
/// An unparsable file is reported through `tracing` and treated as absent.
pub fn load_config(root: &Path) -> Option<HelplintConfig> {
    let toml_path = root.join(CONFIG_NAMES[0]);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return toml::from_str(&s)
            .map_err(|e| tracing::warn!(path = %toml_path.display(), error = %e, "ignoring invalid config"))
            .ok();
    }
    for yml in &CONFIG_NAMES[1..] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return serde_yaml::from_str(&s)
                .map_err(|e| tracing::warn!(path = %p.display(), error = %e, "ignoring invalid config"))
                .ok();
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_packages_root: Option<&str>,
    cli_output: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let packages_root = cli_packages_root
        .map(PathBuf::from)
        .or_else(|| cfg.packages_root.map(|p| repo_root.join(p)))
        .unwrap_or_else(|| repo_root.join("Packages"));

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let index_name = cfg
        .index_name
        .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string());

    Effective {
        repo_root,
        packages_root,
        output,
        index_name,
    }
}
