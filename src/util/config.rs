//! Configuration file support for Umbrella.
//!
//! Umbrella supports two configuration file locations:
//! - Global: `~/.umbrella/config.toml` - User-wide defaults
//! - Project: `.umbrella/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::sandbox::DEFAULT_SANDBOX_DIR;

/// Umbrella configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Integration defaults
    pub integration: IntegrationConfig,

    /// Output settings
    pub output: OutputConfig,
}

/// Defaults applied to every plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Sandbox directory name relative to the client root
    pub sandbox_dir: Option<String>,

    /// Generate bridge-support files for every definition
    pub generate_bridge_support: Option<bool>,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (text, json)
    pub format: Option<OutputFormat>,
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.integration.sandbox_dir.is_some() {
            self.integration.sandbox_dir = other.integration.sandbox_dir;
        }
        if other.integration.generate_bridge_support.is_some() {
            self.integration.generate_bridge_support = other.integration.generate_bridge_support;
        }

        if other.output.format.is_some() {
            self.output.format = other.output.format;
        }
    }

    /// Sandbox directory name, `Pods` unless configured.
    pub fn sandbox_dir(&self) -> &str {
        self.integration
            .sandbox_dir
            .as_deref()
            .unwrap_or(DEFAULT_SANDBOX_DIR)
    }

    /// Whether every definition gets a bridge-support file, off unless
    /// configured.
    pub fn generate_bridge_support(&self) -> bool {
        self.integration.generate_bridge_support.unwrap_or(false)
    }

    /// Configured output format, text unless configured.
    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.umbrella/config.toml)
/// 2. Global config (~/.umbrella/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path.filter(|p| p.exists()) {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global umbrella config directory (~/.umbrella).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".umbrella"))
}

/// Get the global config path (~/.umbrella/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.umbrella/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".umbrella").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.sandbox_dir(), "Pods");
        assert!(!config.generate_bridge_support());
        assert_eq!(config.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[integration]
sandbox_dir = "Vendor"
generate_bridge_support = true

[output]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.sandbox_dir(), "Vendor");
        assert!(config.generate_bridge_support());
        assert_eq!(config.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[output]\nformat = \"yaml\"\n").unwrap();

        assert!(Config::load(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert_eq!(config.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[integration]
sandbox_dir = "Shared"

[output]
format = "json"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[output]
format = "text"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);

        // Global sandbox dir should be preserved
        assert_eq!(config.sandbox_dir(), "Shared");
        // Project format should override global
        assert_eq!(config.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_project_config_can_disable_bridge_support() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(&global_path, "[integration]\ngenerate_bridge_support = true\n").unwrap();
        std::fs::write(&project_path, "[integration]\ngenerate_bridge_support = false\n")
            .unwrap();

        assert!(load_config(Some(&global_path), &tmp.path().join("none.toml"))
            .generate_bridge_support());
        assert!(!load_config(Some(&global_path), &project_path).generate_bridge_support());
    }

    #[test]
    fn test_missing_files_yield_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("missing.toml"));
        assert_eq!(config.sandbox_dir(), "Pods");
    }
}
