//! `umbrella artifacts` command

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::cli::ArtifactsArgs;
use crate::commands::PlanContext;
use umbrella::core::dependency_target::FrameworkPaths;
use umbrella::ops::render_json;
use umbrella::util::config::OutputFormat;
use umbrella::AggregateError;

#[derive(Serialize)]
struct ConfigurationArtifacts<'a> {
    frameworks: &'a [FrameworkPaths],
    resources: &'a [String],
}

pub fn execute(args: ArtifactsArgs) -> Result<()> {
    let ctx = PlanContext::load(&args.target.plan)?;
    let target = ctx.select(args.target.target.as_deref())?;

    let configurations: Vec<&str> = match args.configuration {
        Some(ref name) => {
            if !target.user_build_configurations().contains_key(name) {
                return Err(AggregateError::ConfigurationNotFound {
                    label: target.label().to_string(),
                    name: name.clone(),
                    available: target.user_build_configurations().keys().cloned().collect(),
                }
                .into());
            }
            vec![name.as_str()]
        }
        None => target
            .user_build_configurations()
            .keys()
            .map(String::as_str)
            .collect(),
    };

    let frameworks = target.framework_paths_by_configuration();
    let resources = target.resource_paths_by_configuration();
    let artifacts: BTreeMap<&str, ConfigurationArtifacts<'_>> = configurations
        .into_iter()
        .map(|name| {
            (
                name,
                ConfigurationArtifacts {
                    frameworks: frameworks.get(name).map(Vec::as_slice).unwrap_or_default(),
                    resources: resources.get(name).map(Vec::as_slice).unwrap_or_default(),
                },
            )
        })
        .collect();

    if ctx.format() == OutputFormat::Json {
        println!("{}", render_json(&artifacts)?);
        return Ok(());
    }

    for (name, artifacts) in &artifacts {
        println!("[{}]", name);
        println!("  frameworks:");
        if artifacts.frameworks.is_empty() {
            println!("    (none)");
        }
        for framework in artifacts.frameworks {
            println!("    {} -> {}", framework.input_path, framework.output_path);
        }
        println!("  resources:");
        if artifacts.resources.is_empty() {
            println!("    (none)");
        }
        for resource in artifacts.resources {
            println!("    {}", resource);
        }
    }

    Ok(())
}
