//! Dependency targets - the per-package build units an umbrella target
//! consolidates.
//!
//! Dependency targets are produced and owned by the installer. The umbrella
//! target only holds shared handles to them and reads their state; it never
//! mutates them.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::platform::Platform;
use crate::core::spec::{Consumer, Spec};

/// Build variable the host build tool expands to the sandbox root.
pub const PODS_ROOT_VAR: &str = "${PODS_ROOT}";

/// Build variable for the per-configuration build products directory.
pub const CONFIGURATION_BUILD_DIR_VAR: &str = "${PODS_CONFIGURATION_BUILD_DIR}";

/// Destination of embedded frameworks inside the host product.
const FRAMEWORKS_DESTINATION: &str = "${TARGET_BUILD_DIR}/${FRAMEWORKS_FOLDER_PATH}";

/// Which specs of a dependency target contribute paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathScope {
    /// Library specs only
    Library,
    /// Library and test specs
    All,
}

/// Input and output location of a framework copied into the host product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameworkPaths {
    /// Framework bundle name, e.g. `Alamofire.framework`
    pub name: String,
    pub input_path: String,
    pub output_path: String,
}

impl FrameworkPaths {
    /// Paths for a framework found at `input_path`.
    pub fn embedded(input_path: impl Into<String>) -> Self {
        let input_path = input_path.into();
        let name = Path::new(&input_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_path.clone());
        let output_path = format!("{}/{}", FRAMEWORKS_DESTINATION, name);
        FrameworkPaths {
            name,
            input_path,
            output_path,
        }
    }
}

/// The interface the umbrella target needs from a dependency target.
pub trait DependencyTarget: fmt::Debug + Send + Sync {
    /// Target name, unique per platform variant.
    fn name(&self) -> &str;

    /// The platform this target was built for.
    fn platform(&self) -> &Platform;

    /// All specs this target contains.
    fn specs(&self) -> &[Spec];

    /// Frameworks that must be embedded into the host product.
    fn framework_paths(&self, scope: PathScope) -> Vec<FrameworkPaths>;

    /// Resources that must be copied into the host product.
    fn resource_paths(&self, scope: PathScope) -> Vec<String>;

    /// Whether any source of this target is Swift.
    fn uses_swift(&self) -> bool;

    /// Whether this target has sources to compile.
    fn should_build(&self) -> bool;

    /// Whether this target is packaged as a framework.
    fn requires_frameworks(&self) -> bool;

    /// Whether this target is packaged as a static framework.
    fn static_framework(&self) -> bool;

    /// Name of the built product (`libName.a` or `Name.framework`).
    fn product_name(&self) -> String {
        if self.requires_frameworks() {
            format!("{}.framework", self.name())
        } else {
            format!("lib{}.a", self.name())
        }
    }

    /// Build-variable anchored directory holding the built product.
    fn configuration_build_dir(&self) -> String {
        format!("{}/{}", CONFIGURATION_BUILD_DIR_VAR, self.name())
    }

    /// Directories containing vendored frameworks, anchored at `${PODS_ROOT}`.
    fn vendored_framework_search_paths(&self) -> Vec<String> {
        Vec::new()
    }

    /// Bind every spec to this target's platform.
    fn spec_consumers(&self) -> Vec<Consumer> {
        self.specs()
            .iter()
            .map(|spec| spec.consumer(self.platform()))
            .collect()
    }

    /// Whether this target builds a dynamic framework of its own.
    fn builds_dynamic_framework(&self) -> bool {
        self.should_build() && self.requires_frameworks() && !self.static_framework()
    }
}

/// Shared handle to a dependency target.
pub type DependencyTargetRef = Arc<dyn DependencyTarget>;

/// Check whether two handles point at the same dependency target.
pub fn same_target(a: &DependencyTargetRef, b: &DependencyTargetRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// A vendored binary shipped inside a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendoredArtifact {
    /// Path relative to the sandbox root
    pub path: String,

    /// Dynamic artifacts need embedding; static ones are linked in
    #[serde(default)]
    pub dynamic: bool,
}

/// The standard dependency target produced by the installer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodTarget {
    pub name: String,
    pub platform: Platform,
    pub specs: Vec<Spec>,

    #[serde(default = "default_true")]
    pub should_build: bool,

    #[serde(default)]
    pub requires_frameworks: bool,

    #[serde(default)]
    pub static_framework: bool,

    #[serde(default)]
    pub uses_swift: bool,

    /// Vendored frameworks, keyed by spec name
    #[serde(default)]
    pub vendored_frameworks: BTreeMap<String, Vec<VendoredArtifact>>,

    /// Plain resources relative to the sandbox root, keyed by spec name
    #[serde(default)]
    pub resources: BTreeMap<String, Vec<String>>,

    /// Resource bundle names, keyed by spec name
    #[serde(default)]
    pub resource_bundles: BTreeMap<String, Vec<String>>,
}

fn default_true() -> bool {
    true
}

impl PodTarget {
    /// Create a buildable static-library target.
    pub fn new(name: impl Into<String>, platform: Platform, specs: Vec<Spec>) -> Self {
        PodTarget {
            name: name.into(),
            platform,
            specs,
            should_build: true,
            requires_frameworks: false,
            static_framework: false,
            uses_swift: false,
            vendored_frameworks: BTreeMap::new(),
            resources: BTreeMap::new(),
            resource_bundles: BTreeMap::new(),
        }
    }

    fn spec_names_in(&self, scope: PathScope) -> impl Iterator<Item = &str> {
        self.specs
            .iter()
            .filter(move |spec| scope == PathScope::All || spec.is_library())
            .map(|spec| spec.name.as_str())
    }
}

impl DependencyTarget for PodTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn platform(&self) -> &Platform {
        &self.platform
    }

    fn specs(&self) -> &[Spec] {
        &self.specs
    }

    fn framework_paths(&self, scope: PathScope) -> Vec<FrameworkPaths> {
        let mut paths = Vec::new();

        if self.builds_dynamic_framework() {
            let product = self.product_name();
            paths.push(FrameworkPaths {
                input_path: format!("${{BUILT_PRODUCTS_DIR}}/{}/{}", self.name, product),
                output_path: format!("{}/{}", FRAMEWORKS_DESTINATION, product),
                name: product,
            });
        }

        for spec_name in self.spec_names_in(scope) {
            let Some(artifacts) = self.vendored_frameworks.get(spec_name) else {
                continue;
            };
            for artifact in artifacts.iter().filter(|a| a.dynamic) {
                let embedded =
                    FrameworkPaths::embedded(format!("{}/{}", PODS_ROOT_VAR, artifact.path));
                if !paths.contains(&embedded) {
                    paths.push(embedded);
                }
            }
        }

        paths
    }

    fn resource_paths(&self, scope: PathScope) -> Vec<String> {
        let mut paths = Vec::new();

        for spec_name in self.spec_names_in(scope) {
            if let Some(resources) = self.resources.get(spec_name) {
                paths.extend(
                    resources
                        .iter()
                        .map(|resource| format!("{}/{}", PODS_ROOT_VAR, resource)),
                );
            }
            if let Some(bundles) = self.resource_bundles.get(spec_name) {
                paths.extend(bundles.iter().map(|bundle| {
                    format!("{}/{}.bundle", self.configuration_build_dir(), bundle)
                }));
            }
        }

        paths
    }

    fn uses_swift(&self) -> bool {
        self.uses_swift
    }

    fn should_build(&self) -> bool {
        self.should_build
    }

    fn requires_frameworks(&self) -> bool {
        self.requires_frameworks
    }

    fn static_framework(&self) -> bool {
        self.static_framework
    }

    fn vendored_framework_search_paths(&self) -> Vec<String> {
        let mut dirs: Vec<String> = Vec::new();
        for artifact in self.vendored_frameworks.values().flatten() {
            let parent = Path::new(&artifact.path)
                .parent()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let dir = if parent.is_empty() {
                PODS_ROOT_VAR.to_string()
            } else {
                format!("{}/{}", PODS_ROOT_VAR, parent)
            };
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }
}
