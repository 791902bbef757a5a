//! Errors raised by umbrella targets.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::host_project::TargetUuid;
use crate::core::product_type::ProductType;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error while constructing or querying an umbrella target.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum AggregateError {
    #[error("cannot create an umbrella target without a target definition")]
    #[diagnostic(code(umbrella::aggregate::missing_definition))]
    MissingDefinition,

    #[error("cannot create an umbrella target from abstract target definition `{name}`")]
    #[diagnostic(code(umbrella::aggregate::abstract_definition))]
    AbstractDefinition { name: String },

    #[error(
        "no build configuration named `{name}` for `{label}` (available: {})",
        format_names(.available)
    )]
    #[diagnostic(code(umbrella::aggregate::configuration_not_found))]
    ConfigurationNotFound {
        label: String,
        name: String,
        available: Vec<String>,
    },

    #[error("no build settings present for `{label}`")]
    #[diagnostic(code(umbrella::aggregate::no_settings))]
    NoSettings { label: String },

    #[error("expected one product type for the host targets of `{label}`, found {}", format_kinds(.found))]
    #[diagnostic(
        code(umbrella::aggregate::ambiguous_product_type),
        help("Integrate each kind of host target with its own target definition")
    )]
    AmbiguousProductType {
        label: String,
        found: Vec<ProductType>,
    },

    #[error("unable to find host target `{uuid}` for `{label}`")]
    #[diagnostic(
        code(umbrella::aggregate::broken_integration),
        help("This is a bug in the integration step; please report it")
    )]
    BrokenIntegration { label: String, uuid: TargetUuid },

    #[error("the host project of `{label}` was released while still referenced")]
    #[diagnostic(
        code(umbrella::aggregate::host_project_released),
        help("This is a bug in the integration step; please report it")
    )]
    HostProjectReleased { label: String },
}

fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    names.join(", ")
}

fn format_kinds(kinds: &[ProductType]) -> String {
    if kinds.is_empty() {
        return "none".to_string();
    }
    kinds
        .iter()
        .map(|k| format!("`{}`", k))
        .collect::<Vec<_>>()
        .join(", ")
}

impl AggregateError {
    /// Whether this error indicates a bug in the surrounding system rather
    /// than caller misuse.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AggregateError::BrokenIntegration { .. } | AggregateError::HostProjectReleased { .. }
        )
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            AggregateError::MissingDefinition => Diagnostic::error(self.to_string())
                .with_suggestion("Pass the concrete target definition the target was planned from"),

            AggregateError::AbstractDefinition { name } => Diagnostic::error(self.to_string())
                .with_context(format!("`{}` is declared abstract", name))
                .with_suggestion("Integrate one of the concrete definitions that inherit from it"),

            AggregateError::ConfigurationNotFound {
                label, available, ..
            } => {
                let diag = Diagnostic::error(self.to_string());
                let diag = if available.is_empty() {
                    diag.with_context(format!("`{}` has no build configurations", label))
                } else {
                    diag.with_context(format!("available configurations: {}", available.join(", ")))
                };
                diag.with_suggestion(suggestions::LIST_CONFIGURATIONS)
            }

            AggregateError::NoSettings { label } => Diagnostic::error(self.to_string())
                .with_context(format!("`{}` has no build configurations", label))
                .with_suggestion(suggestions::LIST_CONFIGURATIONS),

            AggregateError::AmbiguousProductType { found, .. } => {
                let mut diag = Diagnostic::error(self.to_string());
                for kind in found {
                    diag = diag.with_context(format!("found {} ({})", kind, kind.identifier()));
                }
                diag.with_suggestion(
                    "Integrate each kind of host target with its own target definition",
                )
            }

            AggregateError::BrokenIntegration { uuid, .. } => Diagnostic::error(self.to_string())
                .with_context(format!("no native target with identifier `{}`", uuid))
                .with_suggestion(suggestions::REPORT_BUG),

            AggregateError::HostProjectReleased { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::REPORT_BUG)
            }
        }
    }
}
