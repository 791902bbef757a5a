//! Specs - the package descriptions contained in a dependency target.
//!
//! A spec declares base attributes plus per-platform additions. Binding a
//! spec to a platform yields a [`Consumer`], which is what settings
//! derivation reads. Public attributes propagate to the umbrella target;
//! nothing here is evaluated until a platform is known.

use std::collections::BTreeMap;
use std::fmt;

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::platform::{Platform, PlatformName};

/// Whether a spec ships library code or tests for another spec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    #[default]
    Library,
    Test,
}

/// Attributes a spec exports to whoever links it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecAttributes {
    /// System frameworks to link (`-framework Name`)
    pub frameworks: Vec<String>,

    /// System frameworks to weak-link (`-weak_framework Name`)
    pub weak_frameworks: Vec<String>,

    /// System libraries to link (`-lname`)
    pub libraries: Vec<String>,

    /// Flags passed to the compiler of the dependency itself
    pub compiler_flags: Vec<String>,

    /// Build settings merged into the host target's configuration
    pub user_target_xcconfig: BTreeMap<String, String>,
}

impl SpecAttributes {
    /// Merge another set of attributes into this one.
    ///
    /// List entries are appended; settings from `other` replace existing keys.
    pub fn merge(&mut self, other: &SpecAttributes) {
        self.frameworks.extend(other.frameworks.iter().cloned());
        self.weak_frameworks
            .extend(other.weak_frameworks.iter().cloned());
        self.libraries.extend(other.libraries.iter().cloned());
        self.compiler_flags.extend(other.compiler_flags.iter().cloned());
        for (key, value) in &other.user_target_xcconfig {
            self.user_target_xcconfig.insert(key.clone(), value.clone());
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
            && self.weak_frameworks.is_empty()
            && self.libraries.is_empty()
            && self.compiler_flags.is_empty()
            && self.user_target_xcconfig.is_empty()
    }
}

/// A package specification (or subspec).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spec {
    /// Full name, `Root` or `Root/Subspec`
    pub name: String,

    pub version: Version,

    #[serde(default)]
    pub kind: SpecKind,

    #[serde(flatten)]
    pub attributes: SpecAttributes,

    /// Platform-specific additions, keyed by platform
    #[serde(default, rename = "platform")]
    pub platform_attributes: BTreeMap<PlatformName, SpecAttributes>,
}

impl Spec {
    /// Create a library spec with no attributes.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Spec {
            name: name.into(),
            version,
            kind: SpecKind::Library,
            attributes: SpecAttributes::default(),
            platform_attributes: BTreeMap::new(),
        }
    }

    /// Mark this spec as a test spec.
    pub fn test(mut self) -> Self {
        self.kind = SpecKind::Test;
        self
    }

    /// Get the root spec name (`Root` for `Root/Subspec`).
    pub fn root_name(&self) -> &str {
        self.name.split('/').next().unwrap_or(&self.name)
    }

    /// Check if this is a library spec.
    pub fn is_library(&self) -> bool {
        self.kind == SpecKind::Library
    }

    /// Bind this spec to a platform.
    pub fn consumer(&self, platform: &Platform) -> Consumer {
        let mut attributes = self.attributes.clone();
        if let Some(extra) = self.platform_attributes.get(&platform.name) {
            attributes.merge(extra);
        }

        Consumer {
            spec_name: self.name.clone(),
            platform: platform.clone(),
            attributes,
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.version)
    }
}

/// A spec bound to a platform, with platform-specific attributes applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    pub spec_name: String,
    pub platform: Platform,
    attributes: SpecAttributes,
}

impl Consumer {
    pub fn frameworks(&self) -> &[String] {
        &self.attributes.frameworks
    }

    pub fn weak_frameworks(&self) -> &[String] {
        &self.attributes.weak_frameworks
    }

    pub fn libraries(&self) -> &[String] {
        &self.attributes.libraries
    }

    pub fn compiler_flags(&self) -> &[String] {
        &self.attributes.compiler_flags
    }

    pub fn user_target_xcconfig(&self) -> &BTreeMap<String, String> {
        &self.attributes.user_target_xcconfig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_with_ios_extras() -> Spec {
        let mut spec = Spec::new("Networking/Core", Version::new(2, 1, 0));
        spec.attributes.frameworks.push("Foundation".to_string());
        spec.platform_attributes.insert(
            PlatformName::Ios,
            SpecAttributes {
                frameworks: vec!["UIKit".to_string()],
                ..Default::default()
            },
        );
        spec
    }

    #[test]
    fn test_root_name() {
        let spec = spec_with_ios_extras();
        assert_eq!(spec.root_name(), "Networking");
        assert_eq!(Spec::new("Solo", Version::new(1, 0, 0)).root_name(), "Solo");
    }

    #[test]
    fn test_consumer_applies_matching_platform() {
        let spec = spec_with_ios_extras();

        let ios = spec.consumer(&Platform::new(PlatformName::Ios));
        assert_eq!(ios.frameworks(), ["Foundation", "UIKit"]);

        let osx = spec.consumer(&Platform::new(PlatformName::Osx));
        assert_eq!(osx.frameworks(), ["Foundation"]);
    }

    #[test]
    fn test_merge_overrides_settings() {
        let mut base = SpecAttributes::default();
        base.user_target_xcconfig
            .insert("OTHER_SWIFT_FLAGS".to_string(), "-DBASE".to_string());

        let mut extra = SpecAttributes::default();
        extra
            .user_target_xcconfig
            .insert("OTHER_SWIFT_FLAGS".to_string(), "-DIOS".to_string());

        base.merge(&extra);
        assert_eq!(base.user_target_xcconfig["OTHER_SWIFT_FLAGS"], "-DIOS");
    }

    #[test]
    fn test_deserialize_spec() {
        let spec: Spec = toml::from_str(
            r#"
name = "Analytics"
version = "3.2.1"
libraries = ["z"]

[platform.ios]
frameworks = ["CoreTelephony"]
"#,
        )
        .unwrap();

        assert_eq!(spec.version, Version::new(3, 2, 1));
        assert_eq!(spec.attributes.libraries, vec!["z"]);
        assert!(spec.is_library());
        assert_eq!(
            spec.platform_attributes[&PlatformName::Ios].frameworks,
            vec!["CoreTelephony"]
        );
    }
}
