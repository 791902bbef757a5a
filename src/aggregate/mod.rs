//! Umbrella targets - many dependency targets consolidated into the single
//! unit a host project links against.
//!
//! An umbrella target is a read-only view over collaborators it does not own:
//! the dependency targets are shared with the installer and the host project
//! is held weakly. Results derived from the dependency targets (settings,
//! framework lists, resource lists) are computed once and cached for the
//! target's lifetime. Facts about the host project are recomputed on every
//! call because the integrator may edit the project in between.
//!
//! Queries are synchronous. Concurrent callers must serialize access
//! themselves; the caches only guarantee that each entry is computed once.

pub mod artifacts;
pub mod classify;
pub mod error;
pub mod index;
pub mod paths;
pub mod settings;
mod support_files;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, Weak};

use crate::core::configuration::{BuildConfigurations, BuildType};
use crate::core::definition::TargetDefinition;
use crate::core::dependency_target::DependencyTargetRef;
use crate::core::host_project::{HostProject, TargetUuid};
use crate::core::platform::Platform;
use crate::core::sandbox::Sandbox;
use crate::core::spec::{Consumer, Spec};

pub use artifacts::{FrameworkPathsByConfiguration, ResourcePathsByConfiguration};
pub use classify::ProductClassification;
pub use error::AggregateError;
pub use index::{DependencyIndex, TargetsByConfiguration};
pub use paths::{BuildVariable, BuildVariablePath, PathTranslator};
pub use settings::{BuildSettings, SettingsCache, SettingsInput};

/// A configuration file generated for one configuration by the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedXcconfig {
    pub path: PathBuf,
    pub contents: String,
}

/// The consolidated target standing in for every dependency target of one
/// target definition.
#[derive(Debug)]
pub struct AggregateTarget {
    label: String,
    definition: Arc<TargetDefinition>,
    sandbox: Sandbox,
    paths: PathTranslator,
    archs: Vec<String>,
    host_project: Option<Weak<dyn HostProject>>,
    host_target_uuids: Vec<TargetUuid>,
    index: DependencyIndex,
    search_paths_targets: Vec<Arc<AggregateTarget>>,
    settings: SettingsCache,
    framework_paths: OnceLock<FrameworkPathsByConfiguration>,
    resource_paths: OnceLock<ResourcePathsByConfiguration>,
    xcconfigs: RwLock<BTreeMap<String, GeneratedXcconfig>>,
}

impl AggregateTarget {
    /// Create an umbrella target for a concrete target definition.
    ///
    /// Every configuration in `dependency_targets` must be one the definition
    /// knows about.
    pub fn new(
        sandbox: Sandbox,
        client_root: impl Into<PathBuf>,
        definition: Option<Arc<TargetDefinition>>,
        dependency_targets: TargetsByConfiguration,
    ) -> Result<Self, AggregateError> {
        let definition = definition.ok_or(AggregateError::MissingDefinition)?;
        if definition.is_abstract {
            return Err(AggregateError::AbstractDefinition {
                name: definition.name.clone(),
            });
        }

        let label = definition.label();
        let configurations = &definition.build_configurations;
        if let Some(unknown) = dependency_targets
            .keys()
            .find(|name| !configurations.contains_key(*name))
        {
            return Err(AggregateError::ConfigurationNotFound {
                label,
                name: unknown.clone(),
                available: configurations.keys().cloned().collect(),
            });
        }

        let paths = PathTranslator::new(
            sandbox.root(),
            client_root,
            definition.defined_in_file.clone(),
        );
        let index = DependencyIndex::new(dependency_targets);
        let settings = SettingsCache::new(configurations);

        tracing::debug!(
            "created umbrella target `{}` over {} dependency targets",
            label,
            index.targets().len()
        );

        Ok(AggregateTarget {
            label,
            definition,
            sandbox,
            paths,
            archs: Vec::new(),
            host_project: None,
            host_target_uuids: Vec::new(),
            index,
            search_paths_targets: Vec::new(),
            settings,
            framework_paths: OnceLock::new(),
            resource_paths: OnceLock::new(),
            xcconfigs: RwLock::new(BTreeMap::new()),
        })
    }

    /// Attach the host project and the native targets to integrate with.
    pub fn with_host_project(
        mut self,
        project: Weak<dyn HostProject>,
        uuids: impl IntoIterator<Item = TargetUuid>,
    ) -> Self {
        self.host_project = Some(project);
        self.host_target_uuids = uuids.into_iter().collect();
        self
    }

    /// Set the architectures to build for.
    pub fn with_archs(mut self, archs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.archs = archs.into_iter().map(Into::into).collect();
        self
    }

    /// Set the umbrella targets whose headers are importable but not linked.
    pub fn with_search_paths_targets(mut self, targets: Vec<Arc<AggregateTarget>>) -> Self {
        self.search_paths_targets = targets;
        self
    }

    // ------------------------------------------------------------------
    // Identity
    // ------------------------------------------------------------------

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn definition(&self) -> &TargetDefinition {
        &self.definition
    }

    pub fn platform(&self) -> &Platform {
        &self.definition.platform
    }

    pub fn archs(&self) -> &[String] {
        &self.archs
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn client_root(&self) -> &Path {
        self.paths.client_root()
    }

    /// Path translation anchored at this target's roots.
    pub fn paths(&self) -> &PathTranslator {
        &self.paths
    }

    /// Recognized configuration names and their build types.
    pub fn user_build_configurations(&self) -> &BuildConfigurations {
        &self.definition.build_configurations
    }

    fn configuration_names(&self) -> impl Iterator<Item = &str> {
        self.definition.build_configurations.keys().map(String::as_str)
    }

    /// Whether dependencies are packaged as frameworks.
    pub fn requires_frameworks(&self) -> bool {
        self.definition.uses_frameworks
    }

    pub fn host_target_uuids(&self) -> &[TargetUuid] {
        &self.host_target_uuids
    }

    pub fn search_paths_targets(&self) -> &[Arc<AggregateTarget>] {
        &self.search_paths_targets
    }

    // ------------------------------------------------------------------
    // Dependency index
    // ------------------------------------------------------------------

    /// Every dependency target, deduplicated across configurations.
    pub fn dependency_targets(&self) -> &[DependencyTargetRef] {
        self.index.targets()
    }

    /// Dependency targets of one configuration; empty for unknown names.
    pub fn dependency_targets_for_configuration(
        &self,
        configuration: &str,
    ) -> &[DependencyTargetRef] {
        self.index.for_configuration(configuration)
    }

    /// Dependency targets that produce something to link.
    pub fn pod_targets_to_link(&self) -> Vec<DependencyTargetRef> {
        self.index
            .targets()
            .iter()
            .filter(|target| target.should_build())
            .cloned()
            .collect()
    }

    pub fn specs(&self) -> Vec<&Spec> {
        self.index.specs()
    }

    pub fn specs_by_configuration(&self) -> BTreeMap<&str, Vec<&Spec>> {
        self.index.specs_by_configuration()
    }

    /// Every spec bound to this target's platform.
    pub fn spec_consumers(&self) -> Vec<Consumer> {
        self.index.spec_consumers(self.platform())
    }

    /// Whether any dependency target uses Swift.
    pub fn uses_swift(&self) -> bool {
        self.index.targets().iter().any(|target| target.uses_swift())
    }

    // ------------------------------------------------------------------
    // Host classification
    // ------------------------------------------------------------------

    /// The host project, if one is attached.
    pub fn host_project(&self) -> Result<Option<Arc<dyn HostProject>>, AggregateError> {
        match self.host_project {
            None => Ok(None),
            Some(ref weak) => weak
                .upgrade()
                .map(Some)
                .ok_or_else(|| AggregateError::HostProjectReleased {
                    label: self.label.clone(),
                }),
        }
    }

    /// Inspect the host targets; recomputed on every call.
    pub fn product_classification(&self) -> Result<ProductClassification, AggregateError> {
        let project = self.host_project()?;
        ProductClassification::inspect(&self.label, project.as_deref(), &self.host_target_uuids)
    }

    /// Whether the host targets are libraries.
    pub fn library(&self) -> Result<bool, AggregateError> {
        self.product_classification()?.is_library(&self.label)
    }

    /// Whether the host targets are embedded into some other target.
    pub fn requires_host_target(&self) -> Result<bool, AggregateError> {
        self.product_classification()?
            .requires_host_target(&self.label)
    }

    // ------------------------------------------------------------------
    // Build settings
    // ------------------------------------------------------------------

    /// Build settings for a configuration, derived on first access.
    pub fn settings(&self, configuration: &str) -> Result<&BuildSettings, AggregateError> {
        self.settings
            .get_or_init(&self.label, configuration, |name, build_type| {
                self.derive_settings(name, build_type)
            })
    }

    /// Build settings of the first configuration, for callers that only need
    /// a representative value.
    pub fn default_settings(&self) -> Result<&BuildSettings, AggregateError> {
        self.settings
            .first_or_init(&self.label, |name, build_type| {
                self.derive_settings(name, build_type)
            })
    }

    fn derive_settings(&self, configuration: &str, build_type: BuildType) -> BuildSettings {
        let pods_root = self.paths.pods_root_relative().to_string();
        let search_only_targets: Vec<DependencyTargetRef> = self
            .search_paths_targets
            .iter()
            .flat_map(|target| target.dependency_targets_for_configuration(configuration))
            .cloned()
            .collect();

        BuildSettings::for_configuration(SettingsInput {
            configuration,
            build_type,
            platform: self.platform(),
            pods_root: &pods_root,
            targets: self.index.for_configuration(configuration),
            search_only_targets: &search_only_targets,
        })
    }

    /// Configuration file generated for `configuration`, once the installer
    /// has attached it.
    pub fn xcconfig(&self, configuration: &str) -> Option<GeneratedXcconfig> {
        let xcconfigs = self.xcconfigs.read().unwrap_or_else(PoisonError::into_inner);
        xcconfigs.get(configuration).cloned()
    }

    /// Attach a generated configuration file, replacing any earlier one.
    pub fn set_xcconfig(
        &self,
        configuration: &str,
        xcconfig: GeneratedXcconfig,
    ) -> Result<(), AggregateError> {
        if !self.definition.build_configurations.contains_key(configuration) {
            return Err(AggregateError::ConfigurationNotFound {
                label: self.label.clone(),
                name: configuration.to_string(),
                available: self.settings.names(),
            });
        }
        let mut xcconfigs = self.xcconfigs.write().unwrap_or_else(PoisonError::into_inner);
        xcconfigs.insert(configuration.to_string(), xcconfig);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Artifacts
    // ------------------------------------------------------------------

    /// Frameworks to embed, per configuration.
    pub fn framework_paths_by_configuration(&self) -> &FrameworkPathsByConfiguration {
        self.framework_paths.get_or_init(|| {
            tracing::debug!("collecting framework paths for `{}`", self.label);
            artifacts::framework_paths_by_configuration(&self.index, self.configuration_names())
        })
    }

    /// Resources to copy, per configuration.
    ///
    /// Entries are build-phase paths under `${PODS_ROOT}`, so the bridge-support
    /// file appears as `${PODS_ROOT}/` joined with [`Self::bridge_support_file`].
    pub fn resource_paths_by_configuration(&self) -> &ResourcePathsByConfiguration {
        self.resource_paths.get_or_init(|| {
            tracing::debug!("collecting resource paths for `{}`", self.label);
            let bridge_support = self
                .bridge_support_path()
                .map(|path| self.paths.relative_from_pods_root_variable(&path).to_string());
            artifacts::resource_paths_by_configuration(
                &self.index,
                self.configuration_names(),
                bridge_support.as_deref(),
            )
        })
    }

    pub fn includes_frameworks(&self) -> bool {
        self.framework_paths_by_configuration()
            .values()
            .any(|paths| !paths.is_empty())
    }

    pub fn includes_resources(&self) -> bool {
        self.resource_paths_by_configuration()
            .values()
            .any(|paths| !paths.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::configuration::default_build_configurations;
    use crate::core::host_project::{NativeTarget, UserProject};
    use crate::core::product_type::ProductType;
    use crate::test_support::{aggregate, definition, pod_target, CLIENT_ROOT, SANDBOX_ROOT};

    fn by_configuration(
        entries: &[(&str, Vec<DependencyTargetRef>)],
    ) -> TargetsByConfiguration {
        entries
            .iter()
            .map(|(name, targets)| (name.to_string(), targets.clone()))
            .collect()
    }

    fn host(kinds: &[ProductType]) -> Arc<UserProject> {
        Arc::new(UserProject::with_targets(
            format!("{}/App.xcodeproj", CLIENT_ROOT),
            kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| NativeTarget::new(format!("T{}", i).as_str(), "App", *kind)),
        ))
    }

    fn integrated(kinds: &[ProductType], project: &Arc<UserProject>) -> AggregateTarget {
        let uuids = (0..kinds.len()).map(|i| TargetUuid::new(format!("T{}", i)));
        let weak: Weak<UserProject> = Arc::downgrade(project);
        aggregate(by_configuration(&[])).with_host_project(weak, uuids)
    }

    #[test]
    fn test_missing_definition_is_rejected() {
        let err = AggregateTarget::new(
            Sandbox::new(SANDBOX_ROOT),
            CLIENT_ROOT,
            None,
            TargetsByConfiguration::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AggregateError::MissingDefinition));
    }

    #[test]
    fn test_abstract_definition_is_rejected() {
        let err = AggregateTarget::new(
            Sandbox::new(SANDBOX_ROOT),
            CLIENT_ROOT,
            Some(Arc::new(definition("Base").abstract_definition())),
            TargetsByConfiguration::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AggregateError::AbstractDefinition { ref name } if name == "Base"));
    }

    #[test]
    fn test_unrecognized_index_configuration_is_rejected() {
        let err = AggregateTarget::new(
            Sandbox::new(SANDBOX_ROOT),
            CLIENT_ROOT,
            Some(Arc::new(definition("App"))),
            by_configuration(&[("Beta", Vec::new())]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::ConfigurationNotFound { ref name, .. } if name == "Beta"
        ));
    }

    #[test]
    fn test_settings_lookup() {
        let target = aggregate(by_configuration(&[("Debug", vec![pod_target("A", |_| {})])]));

        let debug = target.settings("Debug").unwrap();
        assert_eq!(debug.configuration(), "Debug");
        assert_eq!(debug.build_type(), BuildType::Debug);
        assert!(debug.value("OTHER_LDFLAGS").unwrap().contains("-l\"A\""));

        let release = target.settings("Release").unwrap();
        assert_eq!(release.value("OTHER_LDFLAGS").unwrap(), "$(inherited)");

        match target.settings("Beta") {
            Err(AggregateError::ConfigurationNotFound { available, .. }) => {
                assert_eq!(available, vec!["Debug", "Release"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_settings_are_memoized() {
        let target = aggregate(by_configuration(&[]));
        let first = target.settings("Debug").unwrap() as *const BuildSettings;
        let second = target.settings("Debug").unwrap() as *const BuildSettings;
        assert_eq!(first, second);

        let default = target.default_settings().unwrap() as *const BuildSettings;
        assert_eq!(default, first);
    }

    #[test]
    fn test_default_settings_without_configurations() {
        let definition = definition("App").with_build_configurations(BuildConfigurations::new());
        let target = AggregateTarget::new(
            Sandbox::new(SANDBOX_ROOT),
            CLIENT_ROOT,
            Some(Arc::new(definition)),
            TargetsByConfiguration::new(),
        )
        .unwrap();
        assert!(matches!(
            target.default_settings(),
            Err(AggregateError::NoSettings { .. })
        ));
    }

    #[test]
    fn test_pods_root_in_settings() {
        let target = aggregate(by_configuration(&[]));
        assert_eq!(
            target.settings("Release").unwrap().value("PODS_ROOT").unwrap(),
            "${SRCROOT}/Pods"
        );
    }

    #[test]
    fn test_classification_without_host_project() {
        let target = aggregate(by_configuration(&[]));
        assert!(!target.library().unwrap());
        assert!(!target.requires_host_target().unwrap());
    }

    #[test]
    fn test_classification_by_product_type() {
        let cases = [
            (ProductType::Framework, true, true),
            (ProductType::DynamicLibrary, true, false),
            (ProductType::AppExtension, false, true),
            (ProductType::Application, false, false),
        ];
        for (kind, library, requires_host) in cases {
            let project = host(&[kind, kind]);
            let target = integrated(&[kind, kind], &project);
            assert_eq!(target.library().unwrap(), library, "{}", kind);
            assert_eq!(target.requires_host_target().unwrap(), requires_host, "{}", kind);
        }
    }

    #[test]
    fn test_mixed_host_targets_are_ambiguous() {
        let kinds = [ProductType::Framework, ProductType::AppExtension];
        let project = host(&kinds);
        let target = integrated(&kinds, &project);

        assert!(matches!(
            target.library(),
            Err(AggregateError::AmbiguousProductType { .. })
        ));
        assert!(matches!(
            target.requires_host_target(),
            Err(AggregateError::AmbiguousProductType { .. })
        ));
    }

    #[test]
    fn test_classification_tracks_project_edits() {
        let project = host(&[ProductType::Application]);
        let target = integrated(&[ProductType::Application], &project);
        assert!(!target.library().unwrap());

        project.set_product_type(&TargetUuid::new("T0"), ProductType::StaticLibrary);
        assert!(target.library().unwrap());
    }

    #[test]
    fn test_unresolved_host_target_is_broken_integration() {
        let project = host(&[ProductType::Application]);
        let target = integrated(&[ProductType::Application], &project);
        project.remove_target(&TargetUuid::new("T0"));

        let err = target.library().unwrap_err();
        assert!(err.is_internal());
        assert!(matches!(err, AggregateError::BrokenIntegration { .. }));
    }

    #[test]
    fn test_released_host_project() {
        let project = host(&[ProductType::Application]);
        let target = integrated(&[ProductType::Application], &project);
        drop(project);

        assert!(matches!(
            target.library(),
            Err(AggregateError::HostProjectReleased { .. })
        ));
    }

    #[test]
    fn test_uses_swift_reads_any_target() {
        let objc = pod_target("ObjC", |_| {});
        let swift = pod_target("Swifty", |t| t.uses_swift = true);

        let target = aggregate(by_configuration(&[("Debug", vec![objc.clone()])]));
        assert!(!target.uses_swift());

        let target = aggregate(by_configuration(&[
            ("Debug", vec![objc]),
            ("Release", vec![swift]),
        ]));
        assert!(target.uses_swift());
    }

    #[test]
    fn test_resource_and_framework_views() {
        let dynamic = pod_target("Dyn", |t| {
            t.requires_frameworks = true;
            t.resources
                .insert("Dyn".to_string(), vec!["Dyn/a.png".to_string()]);
        });
        let plain = pod_target("Plain", |t| {
            t.resources
                .insert("Plain".to_string(), vec!["Plain/b.png".to_string()]);
        });
        let target = aggregate(by_configuration(&[
            ("Debug", vec![dynamic.clone(), plain.clone()]),
            ("Release", vec![plain]),
        ]));

        let resources = target.resource_paths_by_configuration();
        assert_eq!(resources["Debug"], vec!["${PODS_ROOT}/Plain/b.png"]);
        assert_eq!(resources["Release"], vec!["${PODS_ROOT}/Plain/b.png"]);

        let frameworks = target.framework_paths_by_configuration();
        assert_eq!(frameworks["Debug"].len(), 1);
        assert!(frameworks["Release"].is_empty());

        assert!(target.includes_frameworks());
        assert!(target.includes_resources());
        assert!(std::ptr::eq(resources, target.resource_paths_by_configuration()));
    }

    #[test]
    fn test_bridge_support_in_resources() {
        let definition = definition("App").with_bridge_support();
        let target = AggregateTarget::new(
            Sandbox::new(SANDBOX_ROOT),
            CLIENT_ROOT,
            Some(Arc::new(definition)),
            TargetsByConfiguration::new(),
        )
        .unwrap();

        let expected = "${PODS_ROOT}/Target Support Files/Pods-App/Pods-App.bridgesupport";
        let file = target.bridge_support_file().unwrap();
        assert_eq!(format!("${{PODS_ROOT}}/{}", file.display()), expected);
        for configuration in ["Debug", "Release"] {
            assert_eq!(
                target.resource_paths_by_configuration()[configuration],
                vec![expected]
            );
        }
    }

    #[test]
    fn test_set_xcconfig() {
        let target = aggregate(by_configuration(&[]));
        let xcconfig = GeneratedXcconfig {
            path: target.xcconfig_path("Debug"),
            contents: target.settings("Debug").unwrap().to_xcconfig(),
        };

        target.set_xcconfig("Debug", xcconfig.clone()).unwrap();
        assert_eq!(target.xcconfig("Debug"), Some(xcconfig.clone()));
        assert!(target.xcconfig("Release").is_none());
        assert!(target.set_xcconfig("Beta", xcconfig).is_err());
    }

    #[test]
    fn test_search_paths_targets_are_not_linked() {
        let shared = Arc::new(aggregate(by_configuration(&[(
            "Debug",
            vec![pod_target("Shared", |_| {})],
        )])));
        let target = aggregate(by_configuration(&[])).with_search_paths_targets(vec![shared]);

        let debug = target.settings("Debug").unwrap();
        assert!(debug
            .value("HEADER_SEARCH_PATHS")
            .unwrap()
            .contains("Headers/Public/Shared"));
        assert!(!debug.value("OTHER_LDFLAGS").unwrap().contains("Shared"));
    }

    #[test]
    fn test_pod_targets_to_link() {
        let built = pod_target("Built", |_| {});
        let vendored = pod_target("Vendored", |t| t.should_build = false);
        let target = aggregate(by_configuration(&[("Debug", vec![built, vendored])]));

        let names: Vec<_> = target
            .pod_targets_to_link()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["Built"]);
        assert_eq!(target.user_build_configurations(), &default_build_configurations());
    }
}
