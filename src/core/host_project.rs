//! Host projects - the external project an umbrella target integrates with.
//!
//! The host project is owned by the integrator. Other collaborators may edit
//! its targets between queries, so anything derived from it is recomputed
//! on every read.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::core::product_type::ProductType;

/// Opaque identifier of a native target inside a host project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetUuid(String);

impl TargetUuid {
    pub fn new(id: impl Into<String>) -> Self {
        TargetUuid(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetUuid {
    fn from(s: &str) -> Self {
        TargetUuid::new(s)
    }
}

/// A native build target inside the host project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeTarget {
    pub uuid: TargetUuid,
    pub name: String,
    pub product_type: ProductType,
}

impl NativeTarget {
    pub fn new(
        uuid: impl Into<TargetUuid>,
        name: impl Into<String>,
        product_type: ProductType,
    ) -> Self {
        NativeTarget {
            uuid: uuid.into(),
            name: name.into(),
            product_type,
        }
    }
}

/// Read access to a host project.
pub trait HostProject: fmt::Debug + Send + Sync {
    /// Absolute path of the project file.
    fn path(&self) -> &Path;

    /// Look up a native target by identifier.
    fn native_target(&self, uuid: &TargetUuid) -> Option<NativeTarget>;
}

/// An in-memory host project.
///
/// Targets sit behind a lock so the integrator can edit them while umbrella
/// targets hold references to the project.
#[derive(Debug)]
pub struct UserProject {
    path: PathBuf,
    targets: RwLock<BTreeMap<TargetUuid, NativeTarget>>,
}

impl UserProject {
    /// Create an empty project at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        UserProject {
            path: path.into(),
            targets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a project from a list of targets.
    pub fn with_targets(
        path: impl Into<PathBuf>,
        targets: impl IntoIterator<Item = NativeTarget>,
    ) -> Self {
        let project = UserProject::new(path);
        for target in targets {
            project.add_target(target);
        }
        project
    }

    /// Add or replace a native target.
    pub fn add_target(&self, target: NativeTarget) {
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        targets.insert(target.uuid.clone(), target);
    }

    /// Remove a native target, returning it if it existed.
    pub fn remove_target(&self, uuid: &TargetUuid) -> Option<NativeTarget> {
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        targets.remove(uuid)
    }

    /// Change the product type of an existing target.
    ///
    /// Returns false if no target has that identifier.
    pub fn set_product_type(&self, uuid: &TargetUuid, product_type: ProductType) -> bool {
        let mut targets = self.targets.write().unwrap_or_else(PoisonError::into_inner);
        match targets.get_mut(uuid) {
            Some(target) => {
                target.product_type = product_type;
                true
            }
            None => false,
        }
    }

    /// Get all targets, ordered by identifier.
    pub fn targets(&self) -> Vec<NativeTarget> {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        targets.values().cloned().collect()
    }
}

impl HostProject for UserProject {
    fn path(&self) -> &Path {
        &self.path
    }

    fn native_target(&self, uuid: &TargetUuid) -> Option<NativeTarget> {
        let targets = self.targets.read().unwrap_or_else(PoisonError::into_inner);
        targets.get(uuid).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_edit() {
        let project = UserProject::with_targets(
            "/work/App.xcodeproj",
            [NativeTarget::new("A1", "App", ProductType::Application)],
        );

        let uuid = TargetUuid::new("A1");
        assert_eq!(
            project.native_target(&uuid).map(|t| t.product_type),
            Some(ProductType::Application)
        );

        assert!(project.set_product_type(&uuid, ProductType::Framework));
        assert_eq!(
            project.native_target(&uuid).map(|t| t.product_type),
            Some(ProductType::Framework)
        );

        assert!(!project.set_product_type(&TargetUuid::new("missing"), ProductType::Bundle));
        assert!(project.remove_target(&uuid).is_some());
        assert!(project.native_target(&uuid).is_none());
    }
}
