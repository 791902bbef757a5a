//! Native product types - what a host target produces.
//!
//! The set is closed: host projects identify product types with reverse-DNS
//! identifiers, and anything outside this list is rejected at parse time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const IDENTIFIER_PREFIX: &str = "com.apple.product-type.";

/// The kind of product a native host target builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductType {
    Application,
    Framework,
    DynamicLibrary,
    StaticLibrary,
    Bundle,
    UnitTestBundle,
    UiTestBundle,
    AppExtension,
    CommandLineTool,
    WatchApp,
    Watch2App,
    WatchExtension,
    Watch2Extension,
    TvExtension,
    MessagesApplication,
    MessagesExtension,
    StickerPack,
    XpcService,
}

/// Every product type, in declaration order.
pub const ALL_PRODUCT_TYPES: [ProductType; 18] = [
    ProductType::Application,
    ProductType::Framework,
    ProductType::DynamicLibrary,
    ProductType::StaticLibrary,
    ProductType::Bundle,
    ProductType::UnitTestBundle,
    ProductType::UiTestBundle,
    ProductType::AppExtension,
    ProductType::CommandLineTool,
    ProductType::WatchApp,
    ProductType::Watch2App,
    ProductType::WatchExtension,
    ProductType::Watch2Extension,
    ProductType::TvExtension,
    ProductType::MessagesApplication,
    ProductType::MessagesExtension,
    ProductType::StickerPack,
    ProductType::XpcService,
];

impl ProductType {
    /// The snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            ProductType::Application => "application",
            ProductType::Framework => "framework",
            ProductType::DynamicLibrary => "dynamic_library",
            ProductType::StaticLibrary => "static_library",
            ProductType::Bundle => "bundle",
            ProductType::UnitTestBundle => "unit_test_bundle",
            ProductType::UiTestBundle => "ui_test_bundle",
            ProductType::AppExtension => "app_extension",
            ProductType::CommandLineTool => "command_line_tool",
            ProductType::WatchApp => "watch_app",
            ProductType::Watch2App => "watch2_app",
            ProductType::WatchExtension => "watch_extension",
            ProductType::Watch2Extension => "watch2_extension",
            ProductType::TvExtension => "tv_extension",
            ProductType::MessagesApplication => "messages_application",
            ProductType::MessagesExtension => "messages_extension",
            ProductType::StickerPack => "sticker_pack",
            ProductType::XpcService => "xpc_service",
        }
    }

    /// The host build tool's product-type identifier.
    pub fn identifier(&self) -> String {
        let suffix = match self {
            ProductType::Application => "application",
            ProductType::Framework => "framework",
            ProductType::DynamicLibrary => "library.dynamic",
            ProductType::StaticLibrary => "library.static",
            ProductType::Bundle => "bundle",
            ProductType::UnitTestBundle => "bundle.unit-test",
            ProductType::UiTestBundle => "bundle.ui-testing",
            ProductType::AppExtension => "app-extension",
            ProductType::CommandLineTool => "tool",
            ProductType::WatchApp => "application.watchapp",
            ProductType::Watch2App => "application.watchapp2",
            ProductType::WatchExtension => "watchkit-extension",
            ProductType::Watch2Extension => "watchkit2-extension",
            ProductType::TvExtension => "tv-app-extension",
            ProductType::MessagesApplication => "application.messages",
            ProductType::MessagesExtension => "app-extension.messages",
            ProductType::StickerPack => "app-extension.messages-sticker-pack",
            ProductType::XpcService => "xpc-service",
        };
        format!("{}{}", IDENTIFIER_PREFIX, suffix)
    }

    /// Check if this product is a library the umbrella target is linked into.
    pub fn is_library(&self) -> bool {
        matches!(
            self,
            ProductType::Framework | ProductType::DynamicLibrary | ProductType::StaticLibrary
        )
    }

    /// Check if this product is embedded into some other host target.
    ///
    /// Frameworks and resources for such products are installed by the
    /// host application, not by the product itself.
    pub fn requires_host_target(&self) -> bool {
        matches!(
            self,
            ProductType::AppExtension
                | ProductType::Framework
                | ProductType::StaticLibrary
                | ProductType::MessagesExtension
                | ProductType::WatchExtension
                | ProductType::XpcService
        )
    }
}

#[derive(Debug, Error)]
#[error("unknown product type `{0}`")]
pub struct UnknownProductType(pub String);

impl FromStr for ProductType {
    type Err = UnknownProductType;

    /// Accepts either the snake_case name or the full identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PRODUCT_TYPES
            .iter()
            .copied()
            .find(|ty| ty.name() == s || ty.identifier() == s)
            .ok_or_else(|| UnknownProductType(s.to_string()))
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ProductType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ProductType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_name_and_identifier() {
        assert_eq!(
            "framework".parse::<ProductType>().unwrap(),
            ProductType::Framework
        );
        assert_eq!(
            "com.apple.product-type.library.static"
                .parse::<ProductType>()
                .unwrap(),
            ProductType::StaticLibrary
        );
        assert!("com.apple.product-type.kernel".parse::<ProductType>().is_err());
    }

    #[test]
    fn test_library_kinds() {
        let libraries: Vec<_> = ALL_PRODUCT_TYPES
            .iter()
            .filter(|ty| ty.is_library())
            .collect();
        assert_eq!(
            libraries,
            vec![
                &ProductType::Framework,
                &ProductType::DynamicLibrary,
                &ProductType::StaticLibrary
            ]
        );
    }

    #[test]
    fn test_requires_host_target_kinds() {
        assert!(ProductType::AppExtension.requires_host_target());
        assert!(ProductType::XpcService.requires_host_target());
        assert!(!ProductType::DynamicLibrary.requires_host_target());
        assert!(!ProductType::Application.requires_host_target());
        assert!(!ProductType::Watch2Extension.requires_host_target());
    }

    #[test]
    fn test_identifiers_are_unique() {
        let mut identifiers: Vec<_> = ALL_PRODUCT_TYPES.iter().map(|t| t.identifier()).collect();
        identifiers.sort();
        identifiers.dedup();
        assert_eq!(identifiers.len(), ALL_PRODUCT_TYPES.len());
    }
}
