//! Umbrella - consolidated build targets for dependency integration
//!
//! This crate computes everything a host project needs to link the
//! dependencies installed for one of its targets: merged build settings per
//! configuration, framework and resource lists, generated-file paths and
//! host classification facts.

pub mod aggregate;
pub mod core;
pub mod ops;
pub mod util;

/// Builders and plan fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use aggregate::{AggregateError, AggregateTarget, BuildSettings, ProductClassification};
pub use crate::core::{
    definition::TargetDefinition, dependency_target::DependencyTarget,
    host_project::HostProject, platform::Platform, sandbox::Sandbox,
};
pub use util::config::Config;
