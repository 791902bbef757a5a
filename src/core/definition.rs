//! Target definitions - the declarations an umbrella target is built from.
//!
//! A definition names the host target it integrates with, the platform, and
//! the configurations the host project knows about. Abstract definitions only
//! exist to be inherited from and never produce an umbrella target.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::configuration::{default_build_configurations, BuildConfigurations};
use crate::core::platform::Platform;

/// Label prefix shared by every umbrella target.
pub const LABEL_PREFIX: &str = "Pods";

/// A target definition as declared by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Definition name, usually the host target's name
    pub name: String,

    /// Whether this is the implicit root definition
    #[serde(default)]
    pub root: bool,

    /// Abstract definitions are inherited from but never integrated
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    pub platform: Platform,

    /// File the definition was declared in, absent for synthesized ones
    #[serde(default)]
    pub defined_in_file: Option<PathBuf>,

    #[serde(default = "default_build_configurations")]
    pub build_configurations: BuildConfigurations,

    /// Build dependencies as dynamic frameworks instead of static libraries
    #[serde(default)]
    pub uses_frameworks: bool,

    /// Generate a bridge-support file for the umbrella target
    #[serde(default)]
    pub generate_bridge_support: bool,
}

impl TargetDefinition {
    /// Create a concrete definition with the default configurations.
    pub fn new(name: impl Into<String>, platform: Platform) -> Self {
        TargetDefinition {
            name: name.into(),
            root: false,
            is_abstract: false,
            platform,
            defined_in_file: None,
            build_configurations: default_build_configurations(),
            uses_frameworks: false,
            generate_bridge_support: false,
        }
    }

    /// Mark this definition as abstract.
    pub fn abstract_definition(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Set the file this definition was declared in.
    pub fn with_defined_in_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.defined_in_file = Some(path.into());
        self
    }

    /// Replace the known build configurations.
    pub fn with_build_configurations(mut self, configurations: BuildConfigurations) -> Self {
        self.build_configurations = configurations;
        self
    }

    /// Build dependencies as frameworks.
    pub fn with_frameworks(mut self) -> Self {
        self.uses_frameworks = true;
        self
    }

    /// Enable bridge-support generation.
    pub fn with_bridge_support(mut self) -> Self {
        self.generate_bridge_support = true;
        self
    }

    /// The label used to name every generated artifact.
    ///
    /// The root definition is `Pods`; others are `Pods-<name>`.
    pub fn label(&self) -> String {
        if self.root {
            LABEL_PREFIX.to_string()
        } else {
            format!("{}-{}", LABEL_PREFIX, self.name)
        }
    }

    /// Get the declaration file, if any.
    pub fn defined_in_file(&self) -> Option<&Path> {
        self.defined_in_file.as_deref()
    }
}
