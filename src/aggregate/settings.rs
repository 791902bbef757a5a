//! Build settings resolver.
//!
//! Settings are derived per configuration from that configuration's
//! dependency targets and rendered as xcconfig text. The cache holds one slot
//! per recognized configuration; a slot is filled on first access and never
//! recomputed or evicted.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use crate::aggregate::error::AggregateError;
use crate::core::configuration::{BuildConfigurations, BuildType};
use crate::core::dependency_target::{DependencyTargetRef, PODS_ROOT_VAR};
use crate::core::platform::Platform;

pub const INHERITED: &str = "$(inherited)";

/// Flags whose value is the following argument.
const PAIRED_FLAGS: [&str; 3] = ["-framework", "-weak_framework", "-isystem"];

/// Everything settings derivation reads for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct SettingsInput<'a> {
    pub configuration: &'a str,
    pub build_type: BuildType,
    pub platform: &'a Platform,
    /// `${SRCROOT}`-anchored sandbox root
    pub pods_root: &'a str,
    /// Targets linked for this configuration
    pub targets: &'a [DependencyTargetRef],
    /// Targets importable but not linked
    pub search_only_targets: &'a [DependencyTargetRef],
}

/// Merged build settings for one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    configuration: String,
    build_type: BuildType,
    values: BTreeMap<String, Vec<String>>,
}

impl BuildSettings {
    /// Derive the settings for one configuration.
    pub fn for_configuration(input: SettingsInput<'_>) -> Self {
        let mut settings = BuildSettings {
            configuration: input.configuration.to_string(),
            build_type: input.build_type,
            values: BTreeMap::new(),
        };

        settings.set("PODS_ROOT", input.pods_root);
        settings.set("PODS_BUILD_DIR", "${BUILD_DIR}");
        settings.set(
            "PODS_CONFIGURATION_BUILD_DIR",
            "${PODS_BUILD_DIR}/$(CONFIGURATION)$(EFFECTIVE_PLATFORM_NAME)",
        );
        settings.append("GCC_PREPROCESSOR_DEFINITIONS", [INHERITED, "COCOAPODS=1"]);

        for key in [
            "HEADER_SEARCH_PATHS",
            "FRAMEWORK_SEARCH_PATHS",
            "LIBRARY_SEARCH_PATHS",
            "OTHER_LDFLAGS",
            "OTHER_CFLAGS",
        ] {
            settings.append(key, [INHERITED]);
        }

        let linked = input.targets.iter().map(|t| (t, true));
        let search_only = input.search_only_targets.iter().map(|t| (t, false));
        for (target, link) in linked.chain(search_only) {
            settings.add_search_paths(target);
            if link {
                settings.add_link_flags(target, input.platform);
            }
        }

        let embeds_frameworks = input
            .targets
            .iter()
            .any(|t| t.builds_dynamic_framework() || t.uses_swift());
        if embeds_frameworks {
            settings.append(
                "LD_RUNPATH_SEARCH_PATHS",
                [
                    INHERITED,
                    "'@executable_path/Frameworks'",
                    "'@loader_path/Frameworks'",
                ],
            );
        }

        for target in input.targets {
            for consumer in target.spec_consumers() {
                if consumer.platform.name != input.platform.name {
                    continue;
                }
                for (key, value) in consumer.user_target_xcconfig() {
                    settings.append(key, value.split_whitespace());
                }
            }
        }

        tracing::trace!(
            "derived {} settings for configuration `{}`",
            settings.values.len(),
            settings.configuration
        );

        settings
    }

    fn add_search_paths(&mut self, target: &DependencyTargetRef) {
        if target.should_build() && target.requires_frameworks() {
            self.append(
                "FRAMEWORK_SEARCH_PATHS",
                [quote(&target.configuration_build_dir())],
            );
        } else if target.should_build() {
            let headers = format!("{}/Headers/Public/{}", PODS_ROOT_VAR, target.name());
            self.append("HEADER_SEARCH_PATHS", [quote(&headers)]);
            self.append_flags("OTHER_CFLAGS", vec!["-isystem".to_string(), quote(&headers)]);
            self.append(
                "LIBRARY_SEARCH_PATHS",
                [quote(&target.configuration_build_dir())],
            );
        }

        let vendored: Vec<String> = target
            .vendored_framework_search_paths()
            .iter()
            .map(|dir| quote(dir))
            .collect();
        self.append("FRAMEWORK_SEARCH_PATHS", vendored);
    }

    fn add_link_flags(&mut self, target: &DependencyTargetRef, platform: &Platform) {
        let mut flags = Vec::new();

        if target.should_build() {
            if target.requires_frameworks() {
                flags.push("-framework".to_string());
                flags.push(quote(target.name()));
            } else {
                flags.push(format!("-l{}", quote(target.name())));
            }
        }

        let consumers = target
            .specs()
            .iter()
            .filter(|spec| spec.is_library())
            .map(|spec| spec.consumer(platform));
        for consumer in consumers {
            for library in consumer.libraries() {
                flags.push(format!("-l{}", quote(library)));
            }
            for framework in consumer.frameworks() {
                flags.push("-framework".to_string());
                flags.push(quote(framework));
            }
            for framework in consumer.weak_frameworks() {
                flags.push("-weak_framework".to_string());
                flags.push(quote(framework));
            }
        }

        self.append_flags("OTHER_LDFLAGS", flags);
    }

    fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), vec![value.into()]);
    }

    /// Append values to a setting, skipping ones already present.
    fn append<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.values.entry(key.to_string()).or_default();
        for value in values {
            let value = value.into();
            if !entry.contains(&value) {
                entry.push(value);
            }
        }
    }

    /// Append flags, deduplicating `-framework X` style pairs as a unit.
    fn append_flags(&mut self, key: &str, flags: Vec<String>) {
        let entry = self.values.entry(key.to_string()).or_default();
        let mut iter = flags.into_iter();
        while let Some(flag) = iter.next() {
            if PAIRED_FLAGS.contains(&flag.as_str()) {
                let Some(name) = iter.next() else { break };
                let present = entry
                    .windows(2)
                    .any(|pair| pair[0] == flag && pair[1] == name);
                if !present {
                    entry.push(flag);
                    entry.push(name);
                }
            } else if !entry.contains(&flag) {
                entry.push(flag);
            }
        }
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn build_type(&self) -> BuildType {
        self.build_type
    }

    /// Get a setting's values.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Get a setting joined the way it is written to an xcconfig.
    pub fn value(&self, key: &str) -> Option<String> {
        self.get(key).map(|values| values.join(" "))
    }

    /// All settings, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> {
        self.values
            .iter()
            .map(|(key, values)| (key.as_str(), values.join(" ")))
    }

    /// Render as xcconfig text.
    pub fn to_xcconfig(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            let _ = writeln!(out, "{} = {}", key, value);
        }
        out
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

/// Lazily-populated settings, one slot per recognized configuration.
#[derive(Debug, Default)]
pub struct SettingsCache {
    slots: BTreeMap<String, (BuildType, OnceLock<BuildSettings>)>,
}

impl SettingsCache {
    /// Create empty slots for every recognized configuration.
    pub fn new(configurations: &BuildConfigurations) -> Self {
        SettingsCache {
            slots: configurations
                .iter()
                .map(|(name, build_type)| (name.clone(), (*build_type, OnceLock::new())))
                .collect(),
        }
    }

    /// Recognized configuration names.
    pub fn names(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }

    /// Whether the slot for `name` has been filled.
    pub fn is_populated(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .is_some_and(|(_, slot)| slot.get().is_some())
    }

    /// Get the settings for `name`, deriving them on first access.
    pub fn get_or_init<F>(
        &self,
        label: &str,
        name: &str,
        init: F,
    ) -> Result<&BuildSettings, AggregateError>
    where
        F: FnOnce(&str, BuildType) -> BuildSettings,
    {
        let (build_type, slot) = self.slots.get(name).ok_or_else(|| {
            AggregateError::ConfigurationNotFound {
                label: label.to_string(),
                name: name.to_string(),
                available: self.names(),
            }
        })?;

        Ok(slot.get_or_init(|| {
            tracing::debug!("computing build settings for `{}` ({})", label, name);
            init(name, *build_type)
        }))
    }

    /// Get the settings of the first configuration.
    pub fn first_or_init<F>(&self, label: &str, init: F) -> Result<&BuildSettings, AggregateError>
    where
        F: FnOnce(&str, BuildType) -> BuildSettings,
    {
        let name = self
            .slots
            .keys()
            .next()
            .ok_or_else(|| AggregateError::NoSettings {
                label: label.to_string(),
            })?;
        self.get_or_init(label, name, init)
    }
}
