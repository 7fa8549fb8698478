//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.diffpin.toml` in repo root
//! 4. `~/.config/diffpin/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CONTEXT_MARGIN, ENV_ANCHOR_MODE, ENV_CONTEXT_MARGIN, ENV_EXCLUDE_PATTERNS,
    ENV_POSITION_CONVENTION,
};
use crate::diff::filter::split_patterns;
use crate::env::Env;
use crate::models::{AnchorMode, MatchConvention};

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub context: ContextConfig,
    pub position: PositionConfig,
}

/// Which changed files are left out of the review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Glob patterns matched against destination paths.
    pub exclude_patterns: Vec<String>,
}

/// Context excerpt configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Lines kept on each side of a modified range.
    pub margin: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_CONTEXT_MARGIN,
        }
    }
}

/// How comments are mapped onto a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    pub convention: MatchConvention,
    pub anchor_mode: AnchorMode,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, repo-local config, then applies
    /// environment variable overrides. CLI flags are applied by the caller.
    pub fn load(repo_root: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: repo-local config
        if let Some(root) = repo_root {
            let local_path = root.join(crate::constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(crate::constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        if !other.filter.exclude_patterns.is_empty() {
            self.filter.exclude_patterns = other.filter.exclude_patterns;
        }

        if other.context.margin != ContextConfig::default().margin {
            self.context.margin = other.context.margin;
        }

        let default_position = PositionConfig::default();
        if other.position.convention != default_position.convention {
            self.position.convention = other.position.convention;
        }
        if other.position.anchor_mode != default_position.anchor_mode {
            self.position.anchor_mode = other.position.anchor_mode;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        // Set but empty clears the list.
        if let Some(val) = env.var(ENV_EXCLUDE_PATTERNS) {
            self.filter.exclude_patterns = split_patterns(&val);
        }
        if let Some(margin) = env.parsed::<usize>(ENV_CONTEXT_MARGIN) {
            self.context.margin = margin;
        }
        if let Some(convention) = env.parsed::<MatchConvention>(ENV_POSITION_CONVENTION) {
            self.position.convention = convention;
        }
        if let Some(mode) = env.parsed::<AnchorMode>(ENV_ANCHOR_MODE) {
            self.position.anchor_mode = mode;
        }
    }
}
