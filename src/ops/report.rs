//! Reports - everything an umbrella target computes, in one serializable
//! value.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::aggregate::{AggregateError, AggregateTarget, BuildVariablePath, ProductClassification};
use crate::core::configuration::BuildType;
use crate::core::dependency_target::FrameworkPaths;
use crate::core::product_type::ProductType;
use crate::util::diagnostic::Diagnostic;

/// Report for every umbrella target of a plan.
#[derive(Debug, Serialize)]
pub struct Report {
    pub targets: Vec<TargetReport>,
}

/// Report for one umbrella target.
#[derive(Debug, Serialize)]
pub struct TargetReport {
    pub label: String,
    pub platform: String,
    pub product_module_name: String,
    pub product_name: String,
    pub requires_frameworks: bool,
    pub uses_swift: bool,
    pub host: HostReport,
    pub dependency_targets: Vec<String>,
    pub paths: PathsReport,
    pub configurations: BTreeMap<String, ConfigurationReport>,
}

/// How the umbrella target is embedded into its host.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HostReport {
    Unintegrated,
    Uniform {
        product_type: ProductType,
        library: bool,
        requires_host_target: bool,
    },
    Ambiguous {
        found: Vec<ProductType>,
    },
}

impl From<ProductClassification> for HostReport {
    fn from(classification: ProductClassification) -> Self {
        match classification {
            ProductClassification::Unintegrated => HostReport::Unintegrated,
            ProductClassification::Uniform(kind) => HostReport::Uniform {
                product_type: kind,
                library: kind.is_library(),
                requires_host_target: kind.requires_host_target(),
            },
            ProductClassification::Ambiguous(found) => HostReport::Ambiguous { found },
        }
    }
}

/// Generated-artifact locations.
#[derive(Debug, Serialize)]
pub struct PathsReport {
    pub support_files_dir: PathBuf,
    pub pods_root: BuildVariablePath,
    pub podfile_dir: BuildVariablePath,
    pub copy_resources_script: BuildVariablePath,
    pub embed_frameworks_script: BuildVariablePath,
    pub check_manifest_lock_output: BuildVariablePath,
    pub acknowledgements_basepath: PathBuf,
    pub umbrella_header: PathBuf,
    pub module_map: PathBuf,
    pub info_plist: PathBuf,
    pub dummy_source: PathBuf,
    pub bridge_support_file: Option<PathBuf>,
}

impl PathsReport {
    pub fn new(target: &AggregateTarget) -> Self {
        PathsReport {
            support_files_dir: target.support_files_dir(),
            pods_root: target.relative_pods_root(),
            podfile_dir: target.podfile_dir_relative_path(),
            copy_resources_script: target.copy_resources_script_relative_path(),
            embed_frameworks_script: target.embed_frameworks_script_relative_path(),
            check_manifest_lock_output: target.check_manifest_lock_script_output_file_path(),
            acknowledgements_basepath: target.acknowledgements_basepath(),
            umbrella_header: target.umbrella_header_path(),
            module_map: target.module_map_path(),
            info_plist: target.info_plist_path(),
            dummy_source: target.dummy_source_path(),
            bridge_support_file: target.bridge_support_file(),
        }
    }
}

/// Settings and artifacts of one configuration.
#[derive(Debug, Serialize)]
pub struct ConfigurationReport {
    pub build_type: BuildType,
    pub xcconfig_path: PathBuf,
    pub settings: BTreeMap<String, String>,
    pub frameworks: Vec<FrameworkPaths>,
    pub resources: Vec<String>,
}

/// Build the report for one umbrella target.
///
/// Ambiguous host targets are reported, not raised. A broken integration
/// still fails.
pub fn build_report(target: &AggregateTarget) -> Result<TargetReport, AggregateError> {
    let host = HostReport::from(target.product_classification()?);
    let frameworks = target.framework_paths_by_configuration();
    let resources = target.resource_paths_by_configuration();

    let mut configurations = BTreeMap::new();
    for (name, build_type) in target.user_build_configurations() {
        let settings = target.settings(name)?;
        configurations.insert(
            name.clone(),
            ConfigurationReport {
                build_type: *build_type,
                xcconfig_path: target.xcconfig_relative_path(name),
                settings: settings
                    .iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect(),
                frameworks: frameworks.get(name).cloned().unwrap_or_default(),
                resources: resources.get(name).cloned().unwrap_or_default(),
            },
        );
    }

    Ok(TargetReport {
        label: target.label().to_string(),
        platform: target.platform().to_string(),
        product_module_name: target.product_module_name(),
        product_name: target.product_name(),
        requires_frameworks: target.requires_frameworks(),
        uses_swift: target.uses_swift(),
        host,
        dependency_targets: target
            .dependency_targets()
            .iter()
            .map(|t| t.name().to_string())
            .collect(),
        paths: PathsReport::new(target),
        configurations,
    })
}

/// Render any report as pretty JSON.
pub fn render_json<T: Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize report")
}

/// Render a target report as human-readable text.
pub fn render_text(report: &TargetReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", report.label, report.platform);
    let _ = writeln!(out, "  product:      {}", report.product_name);
    let _ = writeln!(out, "  module:       {}", report.product_module_name);
    let _ = writeln!(out, "  host:         {}", host_summary(&report.host));
    let _ = writeln!(out, "  uses swift:   {}", report.uses_swift);
    if report.dependency_targets.is_empty() {
        let _ = writeln!(out, "  dependencies: (none)");
    } else {
        let _ = writeln!(out, "  dependencies: {}", report.dependency_targets.join(", "));
    }

    for (name, configuration) in &report.configurations {
        let _ = writeln!(out);
        let _ = writeln!(out, "  [{}] ({})", name, configuration.build_type);
        let _ = writeln!(out, "    xcconfig:   {}", configuration.xcconfig_path.display());
        let _ = writeln!(out, "    frameworks: {}", configuration.frameworks.len());
        for framework in &configuration.frameworks {
            let _ = writeln!(out, "      {}", framework.input_path);
        }
        let _ = writeln!(out, "    resources:  {}", configuration.resources.len());
        for resource in &configuration.resources {
            let _ = writeln!(out, "      {}", resource);
        }
    }

    out
}

/// Warning for a target whose host targets disagree on a product type.
pub fn host_warning(report: &TargetReport) -> Option<Diagnostic> {
    let HostReport::Ambiguous { found } = &report.host else {
        return None;
    };
    let diag = Diagnostic::warning(format!(
        "host targets of `{}` have no single product type",
        report.label
    ));
    let diag = if found.is_empty() {
        diag.with_context("no host targets are declared")
    } else {
        found.iter().fold(diag, |diag, kind| {
            diag.with_context(format!("found {} ({})", kind, kind.identifier()))
        })
    };
    Some(diag.with_suggestion("Integrate each kind of host target with its own target definition"))
}

pub(crate) fn host_summary(host: &HostReport) -> String {
    match host {
        HostReport::Unintegrated => "not integrated".to_string(),
        HostReport::Uniform {
            product_type,
            library,
            requires_host_target,
        } => format!(
            "{} (library: {}, requires host: {})",
            product_type, library, requires_host_target
        ),
        HostReport::Ambiguous { found } => {
            let kinds: Vec<&str> = found.iter().map(|k| k.name()).collect();
            format!("ambiguous ({})", kinds.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::ops::plan::parse_plan;
    use crate::test_support::fixtures::BASIC_PLAN;
    use crate::util::config::Config;

    fn app_report() -> TargetReport {
        let plan =
            parse_plan(BASIC_PLAN, Path::new("/work/app/Umbrella.toml"), &Config::default())
                .unwrap();
        build_report(plan.target("App").unwrap()).unwrap()
    }

    #[test]
    fn test_report_contents() {
        let report = app_report();
        assert_eq!(report.label, "Pods-App");
        assert_eq!(report.platform, "iOS 12.0");
        assert_eq!(report.dependency_targets, vec!["Alamofire", "Debugger"]);
        assert!(report.uses_swift);
        assert!(matches!(
            report.host,
            HostReport::Uniform {
                product_type: ProductType::Application,
                library: false,
                requires_host_target: false,
            }
        ));

        let debug = &report.configurations["Debug"];
        assert_eq!(debug.build_type, BuildType::Debug);
        assert!(debug.settings["OTHER_LDFLAGS"].contains("-l\"Debugger\""));
        assert!(!report.configurations["Release"].settings["OTHER_LDFLAGS"]
            .contains("Debugger"));
        assert_eq!(
            debug.resources,
            vec!["${PODS_ROOT}/Alamofire/PrivacyInfo.xcprivacy"]
        );
        assert_eq!(report.paths.podfile_dir.to_string(), "${SRCROOT}");
    }

    #[test]
    fn test_json_rendering() {
        let json = render_json(&app_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["host"]["status"], "uniform");
        assert_eq!(value["host"]["product_type"], "application");
        assert_eq!(
            value["paths"]["embed_frameworks_script"],
            "${PODS_ROOT}/Target Support Files/Pods-App/Pods-App-frameworks.sh"
        );
        assert_eq!(value["configurations"]["Release"]["build_type"], "release");
    }

    #[test]
    fn test_text_rendering() {
        let text = render_text(&app_report());
        assert!(text.starts_with("Pods-App (iOS 12.0)"));
        assert!(text.contains("host:         application (library: false, requires host: false)"));
        assert!(text.contains("[Release] (release)"));
    }

    #[test]
    fn test_host_warning() {
        let mut report = app_report();
        assert!(host_warning(&report).is_none());

        report.host = HostReport::Ambiguous { found: Vec::new() };
        let output = host_warning(&report).unwrap().format(false);
        assert!(output.starts_with("warning: host targets of `Pods-App`"));
        assert!(output.contains("= no host targets are declared"));
    }

    #[test]
    fn test_ambiguous_host_is_reported() {
        let host = HostReport::from(ProductClassification::Ambiguous(vec![
            ProductType::Framework,
            ProductType::AppExtension,
        ]));
        assert_eq!(host_summary(&host), "ambiguous (framework, app_extension)");
    }
}
