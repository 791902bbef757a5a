//! `umbrella report` command

use anyhow::Result;

use crate::cli::ReportArgs;
use crate::commands::PlanContext;
use umbrella::ops::{build_report, host_warning, render_json, render_text, Report};
use umbrella::util::config::OutputFormat;
use umbrella::util::diagnostic;

pub fn execute(args: ReportArgs, color: bool) -> Result<()> {
    let ctx = PlanContext::load(&args.plan)?;

    let mut targets = Vec::new();
    if args.target.is_empty() {
        targets.extend(ctx.plan.targets().iter());
    } else {
        for name in &args.target {
            targets.push(ctx.select(Some(name))?);
        }
    }

    let report = Report {
        targets: targets
            .into_iter()
            .map(|target| build_report(target))
            .collect::<Result<_, _>>()?,
    };

    match ctx.format() {
        OutputFormat::Json => println!("{}", render_json(&report)?),
        OutputFormat::Text => {
            let sections: Vec<String> = report.targets.iter().map(render_text).collect();
            print!("{}", sections.join("\n"));
        }
    }

    for warning in report.targets.iter().filter_map(host_warning) {
        diagnostic::emit(&warning, color);
    }

    Ok(())
}
