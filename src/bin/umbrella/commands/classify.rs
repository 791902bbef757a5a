//! `umbrella classify` command

use anyhow::Result;
use serde::Serialize;

use crate::cli::ClassifyArgs;
use crate::commands::PlanContext;
use umbrella::ops::render_json;
use umbrella::util::config::OutputFormat;

#[derive(Serialize)]
struct Classification<'a> {
    label: &'a str,
    library: bool,
    requires_host_target: bool,
}

pub fn execute(args: ClassifyArgs) -> Result<()> {
    let ctx = PlanContext::load(&args.target.plan)?;
    let target = ctx.select(args.target.target.as_deref())?;

    let classification = Classification {
        label: target.label(),
        library: target.library()?,
        requires_host_target: target.requires_host_target()?,
    };

    match ctx.format() {
        OutputFormat::Json => println!("{}", render_json(&classification)?),
        OutputFormat::Text => {
            println!("{}", classification.label);
            println!("  library:              {}", classification.library);
            println!("  requires host target: {}", classification.requires_host_target);
        }
    }

    Ok(())
}
