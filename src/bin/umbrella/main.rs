//! Umbrella CLI - inspect the umbrella targets of an integration plan

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use umbrella::ops::PlanError;
use umbrella::util::diagnostic;
use umbrella::AggregateError;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("umbrella=debug")
    } else {
        EnvFilter::new("umbrella=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color;
    if let Err(e) = run(cli) {
        report_error(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let color = !cli.no_color;
    match cli.command {
        Commands::Settings(args) => commands::settings::execute(args),
        Commands::Paths(args) => commands::paths::execute(args),
        Commands::Artifacts(args) => commands::artifacts::execute(args),
        Commands::Classify(args) => commands::classify::execute(args),
        Commands::Report(args) => commands::report::execute(args, color),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print engine errors as diagnostics; anything else as a plain chain.
fn report_error(err: &anyhow::Error, color: bool) {
    if let Some(e) = err.downcast_ref::<AggregateError>() {
        diagnostic::emit(&e.to_diagnostic(), color);
    } else if let Some(e) = err.downcast_ref::<PlanError>() {
        diagnostic::emit(&e.to_diagnostic(), color);
    } else {
        eprintln!("error: {:#}", err);
    }
}
