//! User-facing options for the integration.
//!
//! Settings are never cached: every decision point asks its
//! [`SettingsSource`] for a fresh snapshot so edits made mid-session apply to
//! the very next event.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Workspace-relative location of the settings file.
pub const WORKSPACE_SETTINGS_REL: &str = ".setwise/settings.json";

/// Templates the external tool ships with.
pub const TEMPLATES: [&str; 3] = ["default", "compact", "minimal"];

/// Inclusive bounds on a set count accepted from the user.
pub const MIN_SETS: u32 = 1;
pub const MAX_SETS: u32 = 10;

/// Read-only snapshot of the integration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Settings {
    /// Run validate whenever a questions file is saved.
    pub auto_validate: bool,
    /// Run preview whenever a questions file becomes the active file.
    pub auto_preview: bool,
    /// Template used by preview.
    pub default_template: String,
    /// Set count used by preview.
    pub preview_sets: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_validate: false,
            auto_preview: false,
            default_template: "default".to_string(),
            preview_sets: 1,
        }
    }
}

impl Settings {
    /// Reject values the external tool cannot act on.
    pub fn validate(&self) -> Result<()> {
        if self.default_template.trim().is_empty() {
            return Err(anyhow!("defaultTemplate must be non-empty"));
        }
        if !(MIN_SETS..=MAX_SETS).contains(&self.preview_sets) {
            return Err(anyhow!(
                "previewSets must be between {MIN_SETS} and {MAX_SETS} (got {})",
                self.preview_sets
            ));
        }
        Ok(())
    }
}

/// Accessor for the current settings.
pub trait SettingsSource: Send + Sync {
    fn snapshot(&self) -> Result<Settings>;
}

/// Settings backed by a JSON file that is re-read on every snapshot.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Resolve the settings file: explicit path, then workspace, then user config.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::new(path.to_path_buf()));
        }
        let cwd = std::env::current_dir().context("resolve cwd for settings")?;
        let workspace = cwd.join(WORKSPACE_SETTINGS_REL);
        if workspace.is_file() {
            return Ok(Self::new(workspace));
        }
        let user = dirs::config_dir()
            .map(|dir| dir.join("setwise").join("settings.json"))
            .unwrap_or(workspace);
        Ok(Self::new(user))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSource for FileSettings {
    fn snapshot(&self) -> Result<Settings> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Settings::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("read settings {}", self.path.display()))
            }
        };
        let settings: Settings = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse settings {}", self.path.display()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
