//! Configuration discovery and effective settings resolution.
//!
//! gosort reads `gosort.toml|yaml|yml` from the module root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `entry_point`: `main`
//! - `normalize`: true
//! - `tab_width`: 4
//! - `output`: `human`
//! - `write|diff|check|list`: false
//! - `exclude`: empty
//! - `skip_generated`: false
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::DEFAULT_ENTRY_POINT;

const CONFIG_FILES: [&str; 3] = ["gosort.toml", "gosort.yaml", "gosort.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `gosort.toml|yaml`.
pub struct GosortConfig {
    pub entry_point: Option<String>,
    pub normalize: Option<bool>,
    pub tab_width: Option<usize>,
    pub output: Option<String>,
    pub write: Option<bool>,
    pub diff: Option<bool>,
    pub check: Option<bool>,
    pub list: Option<bool>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub skip_generated: Option<bool>,
}

/// A config file that exists but could not be used.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
/// CLI-provided values; `None` defers to the config file.
pub struct Overrides {
    pub config_root: Option<String>,
    pub entry_point: Option<String>,
    pub normalize: Option<bool>,
    pub tab_width: Option<usize>,
    pub output: Option<String>,
    pub write: Option<bool>,
    pub diff: Option<bool>,
    pub check: Option<bool>,
    pub list: Option<bool>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the run after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    /// Config file that was loaded, if any.
    pub config_path: Option<PathBuf>,
    pub issue: Option<ConfigIssue>,
    pub entry_point: String,
    pub normalize: bool,
    pub tab_width: usize,
    pub output: String,
    pub write: bool,
    pub diff: bool,
    pub check: bool,
    pub list: bool,
    pub exclude: Vec<String>,
    pub skip_generated: bool,
}

/// Walk upward from `start` to detect the module root.
///
/// Stops when a `gosort.toml|yaml|yml`, a `go.mod` or a `.git` entry is
/// found; falls back to `start`.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILES.iter().any(|name| cur.join(name).exists()) {
            return cur.to_path_buf();
        }
        if cur.join("go.mod").exists() || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `GosortConfig` from the first config file present under `root`.
///
/// `Ok(None)` means no config file exists.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, GosortConfig)>, ConfigIssue> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.exists() {
            continue;
        }
        let issue = |message: String| ConfigIssue {
            path: path.clone(),
            message,
        };
        let s = fs::read_to_string(&path).map_err(|e| issue(e.to_string()))?;
        let cfg: GosortConfig = if name.ends_with(".toml") {
            toml::from_str(&s).map_err(|e| issue(e.to_string()))?
        } else {
            serde_yaml::from_str(&s).map_err(|e| issue(e.to_string()))?
        };
        return Ok(Some((path, cfg)));
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides) -> Effective {
    let start = PathBuf::from(cli.config_root.as_deref().unwrap_or("."));
    let root = detect_root(&start);
    let (config_path, cfg, issue) = match load_config(&root) {
        Ok(Some((path, cfg))) => (Some(path), cfg, None),
        Ok(None) => (None, GosortConfig::default(), None),
        Err(issue) => (None, GosortConfig::default(), Some(issue)),
    };

    let entry_point = cli
        .entry_point
        .clone()
        .or(cfg.entry_point)
        .unwrap_or_else(|| DEFAULT_ENTRY_POINT.to_string());
    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let tab_width = cli.tab_width.or(cfg.tab_width).unwrap_or(4).max(1);

    Effective {
        root,
        config_path,
        issue,
        entry_point,
        normalize: cli.normalize.or(cfg.normalize).unwrap_or(true),
        tab_width,
        output,
        write: cli.write.or(cfg.write).unwrap_or(false),
        diff: cli.diff.or(cfg.diff).unwrap_or(false),
        check: cli.check.or(cfg.check).unwrap_or(false),
        list: cli.list.or(cfg.list).unwrap_or(false),
        exclude: cfg.exclude,
        skip_generated: cfg.skip_generated.unwrap_or(false),
    }
}
