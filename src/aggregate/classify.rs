//! Product classifier - how the umbrella target is embedded into its host.
//!
//! The host targets an umbrella target integrates with must all build the
//! same kind of product. Mixed kinds are reported, never resolved by picking
//! one.

use std::collections::BTreeSet;

use crate::aggregate::error::AggregateError;
use crate::core::host_project::{HostProject, TargetUuid};
use crate::core::product_type::ProductType;

/// Outcome of inspecting the host targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductClassification {
    /// No host project is attached; nothing is known about the host.
    Unintegrated,
    /// Every host target builds this product type.
    Uniform(ProductType),
    /// The host targets disagree (or there are none); the kinds found.
    Ambiguous(Vec<ProductType>),
}

impl ProductClassification {
    /// Resolve every host target and collect their product types.
    ///
    /// A host target identifier that does not resolve is a broken
    /// integration: identifiers are validated when they are recorded.
    pub fn inspect(
        label: &str,
        project: Option<&dyn HostProject>,
        uuids: &[TargetUuid],
    ) -> Result<Self, AggregateError> {
        let Some(project) = project else {
            return Ok(ProductClassification::Unintegrated);
        };

        let mut kinds = BTreeSet::new();
        for uuid in uuids {
            let target = project
                .native_target(uuid)
                .ok_or_else(|| AggregateError::BrokenIntegration {
                    label: label.to_string(),
                    uuid: uuid.clone(),
                })?;
            kinds.insert(target.product_type);
        }

        let mut kinds: Vec<ProductType> = kinds.into_iter().collect();
        if kinds.len() == 1 {
            Ok(ProductClassification::Uniform(kinds.remove(0)))
        } else {
            Ok(ProductClassification::Ambiguous(kinds))
        }
    }

    /// The single product type, failing when the host targets disagree.
    ///
    /// Returns `None` when no host project is attached.
    pub fn product_type(&self, label: &str) -> Result<Option<ProductType>, AggregateError> {
        match self {
            ProductClassification::Unintegrated => Ok(None),
            ProductClassification::Uniform(kind) => Ok(Some(*kind)),
            ProductClassification::Ambiguous(found) => {
                tracing::debug!(
                    "host targets of `{}` disagree on product type: {:?}",
                    label,
                    found
                );
                Err(AggregateError::AmbiguousProductType {
                    label: label.to_string(),
                    found: found.clone(),
                })
            }
        }
    }

    /// Whether the host is a library the umbrella target is linked into.
    pub fn is_library(&self, label: &str) -> Result<bool, AggregateError> {
        Ok(self
            .product_type(label)?
            .is_some_and(|kind| kind.is_library()))
    }

    /// Whether the host is itself embedded into another target.
    pub fn requires_host_target(&self, label: &str) -> Result<bool, AggregateError> {
        Ok(self
            .product_type(label)?
            .is_some_and(|kind| kind.requires_host_target()))
    }
}
