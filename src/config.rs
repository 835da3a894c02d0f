//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/goaltree/goaltree.toml`
//! 3. Local config: `<dir>/.goaltree.toml`
//! 4. Environment variables: `GOALTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{SortDirection, SortKey, TreeOptions};

/// Unified configuration for goaltree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Column siblings are ordered by (default: name)
    pub sort_key: SortKey,
    /// asc or desc (default: asc)
    pub sort_direction: SortDirection,
    /// Keep closed goals and projects in the tree (default: false)
    pub show_completed: bool,
    /// Data file used when none is given on the command line
    pub data_file: Option<PathBuf>,
}

/// Raw settings for intermediate parsing (`None` means "not specified, inherit").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub sort_key: Option<SortKey>,
    pub sort_direction: Option<SortDirection>,
    pub show_completed: Option<bool>,
    pub data_file: Option<PathBuf>,
}

/// Get the XDG config directory for goaltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "goaltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("goaltree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".goaltree.toml")
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Options for building the goal tree.
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            sort_key: self.sort_key,
            sort_direction: self.sort_direction,
            show_completed: self.show_completed,
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(data_file) = &self.data_file {
            let expanded = expand_path(data_file.to_string_lossy().as_ref());
            self.data_file = Some(PathBuf::from(expanded));
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            sort_key: overlay.sort_key.unwrap_or(self.sort_key),
            sort_direction: overlay.sort_direction.unwrap_or(self.sort_direction),
            show_completed: overlay.show_completed.unwrap_or(self.show_completed),
            data_file: overlay
                .data_file
                .clone()
                .or_else(|| self.data_file.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.goaltree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply GOALTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_env_source(settings, env_source())
    }

    fn apply_env_source(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("sort_key") {
            settings.sort_key = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("GOALTREE_SORT_KEY: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("sort_direction") {
            settings.sort_direction = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("GOALTREE_SORT_DIRECTION: {e}"),
            })?;
        }
        match config.get_bool("show_completed") {
            Ok(val) => settings.show_completed = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => {
                return Err(ApplicationError::Config {
                    message: format!("GOALTREE_SHOW_COMPLETED: {e}"),
                })
            }
        }
        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# goaltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/goaltree/goaltree.toml
#   Local:  ./.goaltree.toml
#   Env:    GOALTREE_* environment variables

# Column to order siblings by:
#   name, timeframe, lastCheckIn, champion, space, progress
# sort_key = "name"

# asc or desc
# sort_direction = "asc"

# Keep closed goals and projects
# show_completed = false

# Data file used when none is given
# data_file = "~/goals.toml"
"#
        .to_string()
    }
}

/// `GOALTREE_SORT_KEY` style variables; `__` separates nested keys.
fn env_source() -> Environment {
    Environment::with_prefix("GOALTREE")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
