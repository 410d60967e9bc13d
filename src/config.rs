//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/svisuelte/svisuelte.toml`
//! 3. Local config: `<dir>/.svisuelte.toml` (directory given with `-C`, default cwd)
//! 4. Environment variables: `SVISUELTE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{RenderOptions, DEFAULT_ROOT_TAG};

/// Unified configuration for svisuelte.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tag of the root element of a new tree (default: "div")
    pub root_tag: String,
    /// Indentation unit used when rendering (default: one tab)
    pub indent: String,
    /// Verify tree invariants after every edit (default: false)
    pub check: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            indent: RenderOptions::default().indent,
            check: false,
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so that a layer only overrides what it names.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_tag: Option<String>,
    pub indent: Option<String>,
    pub check: Option<bool>,
}

/// Get the XDG config directory for svisuelte.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "svisuelte").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("svisuelte.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".svisuelte.toml")
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
    /// Render settings derived from this configuration.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent: self.indent.clone(),
        }
    }

    /// Overlay wins where it names a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_tag: overlay
                .root_tag
                .clone()
                .unwrap_or_else(|| self.root_tag.clone()),
            indent: overlay.indent.clone().unwrap_or_else(|| self.indent.clone()),
            check: overlay.check.unwrap_or(self.check),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional project directory holding `.svisuelte.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        let local = local_dir
            .map(local_config_path)
            .filter(|path| path.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load settings from explicit config files, then apply env overrides.
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        for path in [global, local].into_iter().flatten() {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Apply SVISUELTE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("SVISUELTE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_tag") {
            settings.root_tag = val;
        }
        if let Ok(val) = config.get_string("indent") {
            settings.indent = val;
        }
        if let Ok(val) = config.get_bool("check") {
            settings.check = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.root_tag.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "root_tag must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# svisuelte configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/svisuelte/svisuelte.toml
#   Local:  <dir>/.svisuelte.toml          (dir from -C, default: cwd)
#   Env:    SVISUELTE_* environment variables (explicit overrides)

# Tag of the root element every script starts from
# root_tag = "div"

# Indentation unit for rendered markup
# indent = "\t"

# Verify tree invariants after every edit command
# check = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
