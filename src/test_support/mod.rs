//! Builders for unit tests.
//!
//! Every fixture lives under a fake client root at `/work/app` with the
//! sandbox at `/work/app/Pods`; nothing touches the filesystem.

pub mod fixtures;

use std::sync::Arc;

use crate::aggregate::{AggregateTarget, TargetsByConfiguration};
use crate::core::definition::TargetDefinition;
use crate::core::dependency_target::{DependencyTargetRef, PodTarget};
use crate::core::platform::{Platform, PlatformName};
use crate::core::sandbox::Sandbox;
use crate::core::spec::Spec;

pub use fixtures::*;

pub const CLIENT_ROOT: &str = "/work/app";
pub const SANDBOX_ROOT: &str = "/work/app/Pods";

/// The platform every fixture targets.
pub fn ios() -> Platform {
    Platform::new(PlatformName::Ios).with_deployment_target("12.0")
}

/// A library spec at version 1.0.0.
pub fn spec(name: &str) -> Spec {
    Spec::new(name, semver::Version::new(1, 0, 0))
}

/// A buildable static-library target with one spec of the same name.
///
/// `configure` runs before the target is shared.
pub fn pod_target(name: &str, configure: impl FnOnce(&mut PodTarget)) -> DependencyTargetRef {
    let mut target = PodTarget::new(name, ios(), vec![spec(name)]);
    configure(&mut target);
    Arc::new(target)
}

/// A concrete definition with the default configurations.
pub fn definition(name: &str) -> TargetDefinition {
    TargetDefinition::new(name, ios())
}

/// An umbrella target for the `App` definition.
pub fn aggregate(dependency_targets: TargetsByConfiguration) -> AggregateTarget {
    AggregateTarget::new(
        Sandbox::new(SANDBOX_ROOT),
        CLIENT_ROOT,
        Some(Arc::new(definition("App"))),
        dependency_targets,
    )
    .unwrap()
}
