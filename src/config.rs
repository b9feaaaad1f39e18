//! Configuration loading for Analytica

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = ".analyticarc.json";

/// Errors surfaced while loading configuration. Everything else in the
/// pipeline degrades instead of erroring; config is the one place a
/// typed failure helps the user fix their setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid ignore pattern {pattern:?}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Project configuration from `.analyticarc.json`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Item type marking composite/random rows (default "Aleatoria")
    #[serde(default)]
    pub random_item_type: Option<String>,
    /// Review gate: exit nonzero when more items than this land in the
    /// review band
    #[serde(default)]
    pub max_review: Option<usize>,
    /// Glob patterns excluded from directory scans
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Config {
    /// CLI flags take precedence over config file values
    pub fn merge_with_cli(
        mut self,
        max_review: Option<usize>,
        random_item_type: Option<&str>,
    ) -> Self {
        if max_review.is_some() {
            self.max_review = max_review;
        }
        if let Some(marker) = random_item_type {
            self.random_item_type = Some(marker.to_string());
        }
        self
    }

    pub fn random_item_type(&self) -> &str {
        self.random_item_type
            .as_deref()
            .unwrap_or(crate::analyzer::DEFAULT_RANDOM_ITEM_TYPE)
    }
}

/// Find and load the config file. Searches the working directory then its
/// parents; a missing file means defaults, but an explicitly named file
/// must exist.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match custom_path {
        Some(p) => {
            let path = if p.is_absolute() {
                p.to_path_buf()
            } else {
                work_dir.join(p)
            };
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            Some(path)
        }
        None => find_config_in_parents(work_dir),
    };

    match path {
        Some(path) => load_config_file(&path),
        None => Ok(Config::default()),
    }
}

fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Walk up from `start_dir` looking for the config file
fn find_config_in_parents(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = Some(start_dir);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

/// Compile ignore patterns into a matcher
pub fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}

/// Check a path against the ignore set
pub fn is_ignored(path: &Path, ignore_set: Option<&GlobSet>) -> bool {
    ignore_set.is_some_and(|set| set.is_match(path))
}

/// Default config contents written by `analytica init`
pub fn default_config_contents(max_review: Option<usize>) -> String {
    let max_review = max_review
        .map(|n| n.to_string())
        .unwrap_or_else(|| "null".to_string());
    format!(
        "{{\n  \"randomItemType\": \"Aleatoria\",\n  \"maxReview\": {},\n  \"ignore\": []\n}}\n",
        max_review
    )
}
