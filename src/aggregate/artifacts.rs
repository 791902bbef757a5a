//! Artifact aggregator - frameworks to embed and resources to copy.
//!
//! Both views are computed for every configuration at once.

use std::collections::{BTreeMap, HashSet};

use crate::aggregate::index::DependencyIndex;
use crate::core::dependency_target::{
    same_target, DependencyTargetRef, FrameworkPaths, PathScope,
};

pub type FrameworkPathsByConfiguration = BTreeMap<String, Vec<FrameworkPaths>>;
pub type ResourcePathsByConfiguration = BTreeMap<String, Vec<String>>;

/// Frameworks to embed for each configuration, in dependency order.
pub fn framework_paths_by_configuration<'a>(
    index: &DependencyIndex,
    configurations: impl IntoIterator<Item = &'a str>,
) -> FrameworkPathsByConfiguration {
    configurations
        .into_iter()
        .map(|configuration| {
            let paths: Vec<_> = index
                .for_configuration(configuration)
                .iter()
                .flat_map(|target| target.framework_paths(PathScope::Library))
                .collect();
            (configuration.to_string(), paths)
        })
        .collect()
}

/// Dependency targets whose resources the umbrella target copies.
///
/// A target that builds its own dynamic framework already carries its
/// resources inside that framework.
pub fn resource_relevant_targets(index: &DependencyIndex) -> Vec<DependencyTargetRef> {
    index
        .targets()
        .iter()
        .filter(|target| {
            let excluded = target.builds_dynamic_framework();
            if excluded {
                tracing::trace!(
                    "`{}` embeds its own resources; not copying them",
                    target.name()
                );
            }
            !excluded
        })
        .cloned()
        .collect()
}

/// Resources to copy for each configuration, deduplicated in first-seen order.
///
/// `bridge_support` is appended to every configuration when present.
pub fn resource_paths_by_configuration<'a>(
    index: &DependencyIndex,
    configurations: impl IntoIterator<Item = &'a str>,
    bridge_support: Option<&str>,
) -> ResourcePathsByConfiguration {
    let relevant = resource_relevant_targets(index);

    configurations
        .into_iter()
        .map(|configuration| {
            let targets = index
                .for_configuration(configuration)
                .iter()
                .filter(|target| relevant.iter().any(|r| same_target(r, target)));

            let mut seen = HashSet::new();
            let paths: Vec<_> = targets
                .flat_map(|target| target.resource_paths(PathScope::Library))
                .chain(bridge_support.map(str::to_string))
                .filter(|path| seen.insert(path.clone()))
                .collect();
            (configuration.to_string(), paths)
        })
        .collect()
}
