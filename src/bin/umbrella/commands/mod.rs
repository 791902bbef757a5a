//! Command implementations

pub mod artifacts;
pub mod classify;
pub mod completions;
pub mod paths;
pub mod report;
pub mod settings;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use umbrella::ops::{load_plan, IntegrationPlan};
use umbrella::util::config::{global_config_path, load_config, project_config_path, OutputFormat};
use umbrella::util::diagnostic::suggestions;
use umbrella::util::Config;
use umbrella::AggregateTarget;

/// A loaded plan with the configuration it was loaded under.
pub struct PlanContext {
    pub plan: IntegrationPlan,
    pub config: Config,
    json: bool,
}

impl PlanContext {
    /// Load the plan named on the command line.
    ///
    /// The project config is looked up next to the plan file.
    pub fn load(args: &PlanArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let path = cwd.join(&args.plan);
        let project_root = path.parent().unwrap_or(Path::new("."));

        let global = global_config_path();
        let config = load_config(global.as_deref(), &project_config_path(project_root));
        let plan = load_plan(&path, &config)?;

        tracing::debug!(
            "loaded {} umbrella targets from {}",
            plan.targets().len(),
            plan.path().display()
        );

        Ok(PlanContext {
            plan,
            config,
            json: args.json,
        })
    }

    /// Output format: `--json` wins over the configured default.
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.config.output_format()
        }
    }

    /// Pick a target by name, or the only target when no name is given.
    pub fn select(&self, name: Option<&str>) -> Result<&Arc<AggregateTarget>> {
        let labels = self.plan.labels().join(", ");
        match name {
            Some(name) => self.plan.target(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "target `{}` not found in {}\n  = available targets: {}\n{}",
                    name,
                    self.plan.path().display(),
                    labels,
                    suggestions::TARGET_NOT_FOUND
                )
            }),
            None => match self.plan.targets() {
                [only] => Ok(only),
                [] => anyhow::bail!("{} declares no targets", self.plan.path().display()),
                _ => anyhow::bail!(
                    "{} declares several targets; pass one with `--target`\n  = available targets: {}",
                    self.plan.path().display(),
                    labels
                ),
            },
        }
    }
}
