//! Application configuration.
//!
//! Loaded from `config.toml` in the data directory. The file is optional and
//! sparse: stock defaults are merged underneath whatever the user sets, then
//! the result is validated.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [story]
//! default_title = "Untitled Story"  # Title given to newly created stories
//! default_author = ""                # Author given to newly created stories
//!
//! [library]
//! collections_dir = "collections"    # Finished stories
//! workspace_dir = "workspace"        # Stories being edited
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::paths::is_plain_segment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Name of the config file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Values stamped into newly scaffolded stories.
    pub story: StoryDefaults,
    /// Shelf folder names under the data directory.
    pub library: LibraryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoryDefaults {
    pub default_title: String,
    pub default_author: String,
}

impl Default for StoryDefaults {
    fn default() -> Self {
        Self {
            default_title: "Untitled Story".to_string(),
            default_author: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Folder for finished stories.
    pub collections_dir: String,
    /// Folder for in-progress stories.
    pub workspace_dir: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            collections_dir: "collections".to_string(),
            workspace_dir: "workspace".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.story.default_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "story.default_title must not be empty".into(),
            ));
        }
        for (key, value) in [
            ("library.collections_dir", &self.library.collections_dir),
            ("library.workspace_dir", &self.library.workspace_dir),
        ] {
            if !is_plain_segment(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single folder name, got {value:?}"
                )));
            }
        }
        if self.library.collections_dir == self.library.workspace_dir {
            return Err(ConfigError::Validation(
                "library.collections_dir and library.workspace_dir must differ".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Loading and merging
// =============================================================================

/// Stock defaults as a TOML table, the layer user overrides land on.
pub fn stock_defaults_table() -> toml::Table {
    match toml::Value::try_from(AppConfig::default()) {
        Ok(toml::Value::Table(table)) => table,
        _ => unreachable!("AppConfig serializes to a table"),
    }
}

/// Layer `overrides` onto `base` in place.
///
/// Nested tables merge key by key; any other value replaces what `base` had.
pub fn apply_overrides(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(nested) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => apply_overrides(existing, nested),
                _ => {
                    base.insert(key, toml::Value::Table(nested));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// The user's `config.toml` in `dir`, `None` when there is no such file.
fn read_overrides(dir: &Path) -> Result<Option<toml::Table>, ConfigError> {
    match fs::read_to_string(dir.join(CONFIG_FILE)) {
        Ok(content) => Ok(Some(toml::from_str(&content)?)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Stock defaults with `overrides` applied, checked by [`AppConfig::validate`].
pub fn resolve_config(overrides: Option<toml::Table>) -> Result<AppConfig, ConfigError> {
    let mut table = stock_defaults_table();
    if let Some(overrides) = overrides {
        apply_overrides(&mut table, overrides);
    }
    let config: AppConfig = toml::Value::Table(table).try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config for the data directory `dir`.
pub fn load_config(dir: &Path) -> Result<AppConfig, ConfigError> {
    resolve_config(read_overrides(dir)?)
}

/// Fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Talebook Configuration
# ======================
# Place this file at <data dir>/config.toml. All settings are optional;
# values shown are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# New stories
# ---------------------------------------------------------------------------
[story]
# Title written into the descriptor of every newly created story.
default_title = "Untitled Story"

# Author written into the descriptor of every newly created story.
default_author = ""

# ---------------------------------------------------------------------------
# Library layout
# ---------------------------------------------------------------------------
[library]
# Folder (under the data directory) holding finished stories.
collections_dir = "collections"

# Folder (under the data directory) holding stories being edited.
workspace_dir = "workspace"
"##
}
