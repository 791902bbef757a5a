//! Integration plans - a TOML description of an installation.
//!
//! A plan names the client root, the sandbox, the host project's native
//! targets, the dependency targets the installer produced, and one entry per
//! target definition saying which dependency targets are active in each
//! configuration. Loading a plan builds the umbrella targets.
//!
//! ```toml
//! client_root = "."
//!
//! [project]
//! path = "App.xcodeproj"
//! targets = [{ uuid = "A1", name = "App", product_type = "application" }]
//!
//! [[pod_targets]]
//! name = "Alamofire"
//! platform = { name = "ios", deployment_target = "12.0" }
//! specs = [{ name = "Alamofire", version = "5.8.0" }]
//!
//! [[targets]]
//! name = "App"
//! platform = { name = "ios", deployment_target = "12.0" }
//! host_targets = ["A1"]
//! dependencies = { Debug = ["Alamofire"], Release = ["Alamofire"] }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use serde::Deserialize;
use thiserror::Error;

use crate::aggregate::paths::normalize_lexically;
use crate::aggregate::{AggregateError, AggregateTarget, TargetsByConfiguration};
use crate::core::definition::TargetDefinition;
use crate::core::dependency_target::{DependencyTargetRef, PodTarget};
use crate::core::host_project::{HostProject, NativeTarget, TargetUuid, UserProject};
use crate::core::sandbox::Sandbox;
use crate::util::config::Config;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Default plan file name.
pub const PLAN_FILE_NAME: &str = "Umbrella.toml";

/// Error while loading an integration plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan file `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("dependency target `{name}` is declared more than once")]
    DuplicatePodTarget { name: String },

    #[error("target `{label}` is declared more than once")]
    DuplicateTarget { label: String },

    #[error("`{target}` depends on unknown dependency target `{name}`")]
    UnknownPodTarget { target: String, name: String },

    #[error("`{target}` integrates with unknown host target `{uuid}`")]
    UnknownHostTarget { target: String, uuid: TargetUuid },

    #[error("`{target}` lists host targets but the plan has no project")]
    MissingProject { target: String },

    #[error("`{target}` imports headers from `{name}`, which is not declared before it")]
    UnknownSearchPathsTarget { target: String, name: String },

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl PlanError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PlanError::Read { path, source } => Diagnostic::error(self.to_string())
                .with_context(source.to_string())
                .with_location(path)
                .with_suggestion(suggestions::PLAN_UNREADABLE),

            PlanError::Parse { path, source } => Diagnostic::error(self.to_string())
                .with_context(source.message().to_string())
                .with_location(path),

            PlanError::UnknownPodTarget { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("Declare it in a `[[pod_targets]]` table"),

            PlanError::UnknownHostTarget { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("Add the native target to `[project] targets`"),

            PlanError::UnknownSearchPathsTarget { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("Move the referenced target above the one that imports it"),

            PlanError::Aggregate(err) => err.to_diagnostic(),

            _ => Diagnostic::error(self.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlanFile {
    #[serde(default)]
    client_root: Option<PathBuf>,

    #[serde(default)]
    sandbox_root: Option<PathBuf>,

    #[serde(default)]
    project: Option<ProjectEntry>,

    #[serde(default)]
    pod_targets: Vec<PodTarget>,

    #[serde(default)]
    targets: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectEntry {
    path: PathBuf,

    #[serde(default)]
    targets: Vec<NativeTarget>,
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    #[serde(flatten)]
    definition: TargetDefinition,

    /// Native targets of the host project to integrate with
    #[serde(default)]
    host_targets: Vec<TargetUuid>,

    #[serde(default)]
    archs: Vec<String>,

    /// Targets (by definition name) whose headers are importable
    #[serde(default)]
    search_paths: Vec<String>,

    /// Dependency target names, keyed by configuration
    #[serde(default)]
    dependencies: BTreeMap<String, Vec<String>>,
}

/// A loaded plan: the host project and the umbrella targets built from it.
///
/// The plan owns the host project; umbrella targets only hold a weak
/// reference to it.
#[derive(Debug)]
pub struct IntegrationPlan {
    path: PathBuf,
    client_root: PathBuf,
    project: Option<Arc<UserProject>>,
    targets: Vec<Arc<AggregateTarget>>,
}

impl IntegrationPlan {
    /// Path of the plan file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn client_root(&self) -> &Path {
        &self.client_root
    }

    pub fn project(&self) -> Option<&Arc<UserProject>> {
        self.project.as_ref()
    }

    /// Umbrella targets in declaration order.
    pub fn targets(&self) -> &[Arc<AggregateTarget>] {
        &self.targets
    }

    /// Find an umbrella target by label or definition name.
    pub fn target(&self, name: &str) -> Option<&Arc<AggregateTarget>> {
        self.targets
            .iter()
            .find(|t| t.label() == name || t.definition().name == name)
    }

    /// Labels of every umbrella target.
    pub fn labels(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.label()).collect()
    }
}

/// Load a plan file and build its umbrella targets.
///
/// Relative paths in the plan are resolved against the directory holding
/// the plan file.
pub fn load_plan(path: &Path, config: &Config) -> Result<IntegrationPlan, PlanError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PlanError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_plan(&contents, path, config)
}

/// Build a plan from its TOML text; `path` anchors relative paths.
pub fn parse_plan(
    contents: &str,
    path: &Path,
    config: &Config,
) -> Result<IntegrationPlan, PlanError> {
    let file: PlanFile = toml::from_str(contents).map_err(|source| PlanError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let client_root = normalize_lexically(&base.join(file.client_root.unwrap_or_default()));
    let sandbox_root = match file.sandbox_root {
        Some(root) => normalize_lexically(&client_root.join(root)),
        None => client_root.join(config.sandbox_dir()),
    };
    tracing::debug!(
        "loading plan `{}` (client root {}, sandbox {})",
        path.display(),
        client_root.display(),
        sandbox_root.display()
    );

    let project = file.project.map(|project| {
        Arc::new(UserProject::with_targets(
            client_root.join(project.path),
            project.targets,
        ))
    });

    let mut pod_targets: BTreeMap<String, DependencyTargetRef> = BTreeMap::new();
    for target in file.pod_targets {
        if pod_targets.contains_key(&target.name) {
            return Err(PlanError::DuplicatePodTarget { name: target.name });
        }
        pod_targets.insert(target.name.clone(), Arc::new(target));
    }

    let mut targets: Vec<Arc<AggregateTarget>> = Vec::new();
    for entry in file.targets {
        let target = build_target(
            entry,
            config,
            &client_root,
            &sandbox_root,
            project.as_ref(),
            &pod_targets,
            &targets,
        )?;
        if targets.iter().any(|t| t.label() == target.label()) {
            return Err(PlanError::DuplicateTarget {
                label: target.label().to_string(),
            });
        }
        targets.push(Arc::new(target));
    }

    Ok(IntegrationPlan {
        path: path.to_path_buf(),
        client_root,
        project,
        targets,
    })
}

fn build_target(
    entry: TargetEntry,
    config: &Config,
    client_root: &Path,
    sandbox_root: &Path,
    project: Option<&Arc<UserProject>>,
    pod_targets: &BTreeMap<String, DependencyTargetRef>,
    earlier: &[Arc<AggregateTarget>],
) -> Result<AggregateTarget, PlanError> {
    let mut definition = entry.definition;
    let name = definition.name.clone();
    definition.generate_bridge_support |= config.generate_bridge_support();
    if let Some(file) = definition.defined_in_file.take() {
        definition.defined_in_file = Some(normalize_lexically(&client_root.join(file)));
    }

    let mut by_configuration = TargetsByConfiguration::new();
    for (configuration, names) in entry.dependencies {
        let resolved = names
            .into_iter()
            .map(|dependency| {
                pod_targets
                    .get(&dependency)
                    .cloned()
                    .ok_or_else(|| PlanError::UnknownPodTarget {
                        target: name.clone(),
                        name: dependency,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        by_configuration.insert(configuration, resolved);
    }

    let search_paths_targets = entry
        .search_paths
        .into_iter()
        .map(|other| {
            earlier
                .iter()
                .find(|t| t.definition().name == other || t.label() == other)
                .cloned()
                .ok_or_else(|| PlanError::UnknownSearchPathsTarget {
                    target: name.clone(),
                    name: other,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut target = AggregateTarget::new(
        Sandbox::new(sandbox_root),
        client_root,
        Some(Arc::new(definition)),
        by_configuration,
    )?
    .with_archs(entry.archs)
    .with_search_paths_targets(search_paths_targets);

    match project {
        Some(project) => {
            if let Some(uuid) = entry
                .host_targets
                .iter()
                .find(|uuid| project.native_target(uuid).is_none())
            {
                return Err(PlanError::UnknownHostTarget {
                    target: name,
                    uuid: uuid.clone(),
                });
            }
            let weak: Weak<UserProject> = Arc::downgrade(project);
            target = target.with_host_project(weak, entry.host_targets);
        }
        None if !entry.host_targets.is_empty() => {
            return Err(PlanError::MissingProject { target: name });
        }
        None => {}
    }

    Ok(target)
}
