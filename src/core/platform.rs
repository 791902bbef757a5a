//! Platform information used to bind specs to a concrete target.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The operating systems an umbrella target can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformName {
    #[serde(alias = "iphoneos")]
    Ios,
    #[serde(alias = "macos")]
    Osx,
    Tvos,
    Watchos,
}

impl PlatformName {
    /// Get the lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformName::Ios => "ios",
            PlatformName::Osx => "osx",
            PlatformName::Tvos => "tvos",
            PlatformName::Watchos => "watchos",
        }
    }

    /// Get the name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformName::Ios => "iOS",
            PlatformName::Osx => "macOS",
            PlatformName::Tvos => "tvOS",
            PlatformName::Watchos => "watchOS",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown platform `{0}`; expected one of: ios, osx, tvos, watchos")]
pub struct UnknownPlatform(pub String);

impl FromStr for PlatformName {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" | "iphoneos" => Ok(PlatformName::Ios),
            "osx" | "macos" => Ok(PlatformName::Osx),
            "tvos" => Ok(PlatformName::Tvos),
            "watchos" => Ok(PlatformName::Watchos),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for PlatformName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform with an optional minimum deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    pub name: PlatformName,

    #[serde(default)]
    pub deployment_target: Option<String>,
}

impl Platform {
    /// Create a platform with no deployment target.
    pub fn new(name: PlatformName) -> Self {
        Platform {
            name,
            deployment_target: None,
        }
    }

    /// Set the deployment target.
    pub fn with_deployment_target(mut self, version: impl Into<String>) -> Self {
        self.deployment_target = Some(version.into());
        self
    }

    /// The build setting that carries this platform's deployment target.
    pub fn deployment_target_setting(&self) -> &'static str {
        match self.name {
            PlatformName::Ios => "IPHONEOS_DEPLOYMENT_TARGET",
            PlatformName::Osx => "MACOSX_DEPLOYMENT_TARGET",
            PlatformName::Tvos => "TVOS_DEPLOYMENT_TARGET",
            PlatformName::Watchos => "WATCHOS_DEPLOYMENT_TARGET",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.deployment_target {
            Some(ref version) => write!(f, "{} {}", self.name.display_name(), version),
            None => write!(f, "{}", self.name.display_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_aliases() {
        assert_eq!("iOS".parse::<PlatformName>().unwrap(), PlatformName::Ios);
        assert_eq!("macos".parse::<PlatformName>().unwrap(), PlatformName::Osx);
        assert!("android".parse::<PlatformName>().is_err());
    }

    #[test]
    fn test_platform_display() {
        let platform = Platform::new(PlatformName::Ios).with_deployment_target("12.0");
        assert_eq!(platform.to_string(), "iOS 12.0");
        assert_eq!(Platform::new(PlatformName::Tvos).to_string(), "tvOS");
    }
}
