//! Dependency index - dependency targets partitioned by build configuration.
//!
//! Deduplication is by identity of the shared handle. Two distinct targets
//! that happen to share a name (for example, the same package built for two
//! platforms) are kept apart.

use std::collections::BTreeMap;

use crate::core::dependency_target::{same_target, DependencyTargetRef};
use crate::core::platform::Platform;
use crate::core::spec::{Consumer, Spec};

/// Dependency targets keyed by configuration name.
pub type TargetsByConfiguration = BTreeMap<String, Vec<DependencyTargetRef>>;

/// An index of dependency targets.
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    by_configuration: TargetsByConfiguration,
    flattened: Vec<DependencyTargetRef>,
}

impl DependencyIndex {
    /// Build an index, deduplicating each configuration's list and the
    /// flattened view while keeping first-seen order.
    pub fn new(by_configuration: TargetsByConfiguration) -> Self {
        let by_configuration: TargetsByConfiguration = by_configuration
            .into_iter()
            .map(|(name, targets)| (name, dedup_targets(targets)))
            .collect();

        let flattened = dedup_targets(by_configuration.values().flatten().cloned());

        DependencyIndex {
            by_configuration,
            flattened,
        }
    }

    /// All dependency targets across every configuration.
    pub fn targets(&self) -> &[DependencyTargetRef] {
        &self.flattened
    }

    /// Dependency targets for one configuration; empty if the name is unknown.
    pub fn for_configuration(&self, name: &str) -> &[DependencyTargetRef] {
        self.by_configuration
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check whether `target` is indexed under any configuration.
    pub fn contains(&self, target: &DependencyTargetRef) -> bool {
        self.flattened.iter().any(|t| same_target(t, target))
    }

    /// Every spec of every dependency target.
    pub fn specs(&self) -> Vec<&Spec> {
        self.flattened.iter().flat_map(|t| t.specs()).collect()
    }

    /// Specs for each configuration.
    pub fn specs_by_configuration(&self) -> BTreeMap<&str, Vec<&Spec>> {
        self.by_configuration
            .iter()
            .map(|(name, targets)| {
                let specs = targets.iter().flat_map(|t| t.specs()).collect();
                (name.as_str(), specs)
            })
            .collect()
    }

    /// Every spec bound to `platform`.
    pub fn spec_consumers(&self, platform: &Platform) -> Vec<Consumer> {
        self.specs()
            .into_iter()
            .map(|spec| spec.consumer(platform))
            .collect()
    }
}

fn dedup_targets(
    targets: impl IntoIterator<Item = DependencyTargetRef>,
) -> Vec<DependencyTargetRef> {
    let mut unique: Vec<DependencyTargetRef> = Vec::new();
    for target in targets {
        if !unique.iter().any(|t| same_target(t, &target)) {
            unique.push(target);
        }
    }
    unique
}
