use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Directory under the vault root holding Quire's own files.
pub const CONFIG_DIR: &str = ".quire";
pub const CONFIG_FILE: &str = "config.yaml";

/// Top-level configuration for Quire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuireConfig {
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vault-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_vault_name")]
    pub name: String,
    /// Directory names skipped while scanning
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Length of IDs generated for notes whose title has no usable characters
    #[serde(default = "default_id_length")]
    pub generated_id_length: usize,
}

/// External mirror settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub skip_private: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to report snapshot statistics on startup
    #[serde(default = "default_true")]
    pub show_indexing_stats: bool,
}

fn default_vault_name() -> String {
    "Quire Vault".to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    vec![
        ".git".to_string(),
        CONFIG_DIR.to_string(),
        "node_modules".to_string(),
    ]
}

fn default_id_length() -> usize {
    12
}

fn default_true() -> bool {
    true
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            name: default_vault_name(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            generated_id_length: default_id_length(),
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            skip_private: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_indexing_stats: true,
        }
    }
}

impl QuireConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn path_in(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load `<root>/.quire/config.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path_in(root);
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }
}
