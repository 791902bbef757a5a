//! `umbrella settings` command

use std::collections::BTreeMap;

use anyhow::Result;

use crate::cli::SettingsArgs;
use crate::commands::PlanContext;
use umbrella::ops::render_json;
use umbrella::util::config::OutputFormat;

pub fn execute(args: SettingsArgs) -> Result<()> {
    let ctx = PlanContext::load(&args.target.plan)?;
    let target = ctx.select(args.target.target.as_deref())?;

    let settings = match args.configuration {
        Some(ref name) => target.settings(name)?,
        None => target.default_settings()?,
    };

    match ctx.format() {
        OutputFormat::Json => {
            let values: BTreeMap<&str, String> = settings.iter().collect();
            println!("{}", render_json(&values)?);
        }
        OutputFormat::Text => {
            println!(
                "// {} ({}, {})",
                target.xcconfig_relative_path(settings.configuration()).display(),
                settings.configuration(),
                settings.build_type()
            );
            print!("{}", settings.to_xcconfig());
        }
    }

    Ok(())
}
