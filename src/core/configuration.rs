//! Build configurations - named variants (Debug, Release, ...) of a build.
//!
//! Each configuration maps to a build type that decides the defaults it
//! inherits. Host projects routinely add their own names such as `Beta` or
//! `App Store`, so configurations are keyed by name rather than by type.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of build a configuration produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildType {
    Debug,
    Release,
}

impl BuildType {
    /// Whether this build type produces an optimized build.
    pub fn is_release(&self) -> bool {
        matches!(self, BuildType::Release)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildType::Debug => write!(f, "debug"),
            BuildType::Release => write!(f, "release"),
        }
    }
}

/// Mapping of configuration name to build type.
pub type BuildConfigurations = BTreeMap<String, BuildType>;

/// The configurations every host project starts with.
pub fn default_build_configurations() -> BuildConfigurations {
    let mut configurations = BuildConfigurations::new();
    configurations.insert("Debug".to_string(), BuildType::Debug);
    configurations.insert("Release".to_string(), BuildType::Release);
    configurations
}

/// Turn a configuration name into the form used in generated file names.
///
/// `Release/Staging` becomes `release-staging`.
pub fn file_variant(configuration: &str) -> String {
    configuration.replace('/', "-").to_lowercase()
}
