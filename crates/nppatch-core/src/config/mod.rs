mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::NppatchError;
use defaults::*;

/// Top-level NPPatch configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub nppatch: NppatchConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
    #[serde(default)]
    pub permission_set: PermissionSetConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NppatchConfig {
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for NppatchConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Label catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelsConfig {
    /// Override catalog layered over the bundled labels. Empty = bundled only.
    #[serde(default)]
    pub path: String,
}

impl LabelsConfig {
    /// Expanded override path, or `None` when no override is configured.
    pub fn override_path(&self) -> Option<String> {
        let trimmed = self.path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(shellexpand(trimmed))
        }
    }
}

/// Permission set generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionSetConfig {
    /// Directory holding one subdirectory per object, each with `fields/*.field-meta.xml`.
    #[serde(default = "default_objects_dir")]
    pub objects_dir: String,
    /// Where the generated `.permissionset-meta.xml` is written.
    #[serde(default = "default_permission_set_output")]
    pub output: String,
}

impl Default for PermissionSetConfig {
    fn default() -> Self {
        Self {
            objects_dir: default_objects_dir(),
            output: default_permission_set_output(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, NppatchError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| NppatchError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| NppatchError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
