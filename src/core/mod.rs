//! Core data structures for Umbrella.
//!
//! These are the collaborators an umbrella target reads from:
//! - Sandbox and platform descriptions
//! - Build configurations and target definitions
//! - Specs and the dependency targets that contain them
//! - The host project and its native targets

pub mod configuration;
pub mod definition;
pub mod dependency_target;
pub mod host_project;
pub mod platform;
pub mod product_type;
pub mod sandbox;
pub mod spec;

pub use configuration::{BuildConfigurations, BuildType};
pub use definition::TargetDefinition;
pub use dependency_target::{DependencyTarget, DependencyTargetRef, PodTarget};
pub use host_project::{HostProject, NativeTarget, TargetUuid, UserProject};
pub use platform::{Platform, PlatformName};
pub use product_type::ProductType;
pub use sandbox::Sandbox;
pub use spec::{Consumer, Spec};
