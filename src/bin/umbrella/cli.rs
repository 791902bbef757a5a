//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use umbrella::ops::PLAN_FILE_NAME;

/// Umbrella - consolidated build settings and artifacts for integrated targets
#[derive(Parser)]
#[command(name = "umbrella")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the build settings of a configuration as xcconfig text
    Settings(SettingsArgs),

    /// Print the paths of the generated support files
    Paths(PathsArgs),

    /// List the frameworks to embed and resources to copy
    Artifacts(ArtifactsArgs),

    /// Show how the host targets embed the umbrella target
    Classify(ClassifyArgs),

    /// Print a full report for every umbrella target
    Report(ReportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the integration plan
    #[arg(long, env = "UMBRELLA_PLAN", default_value = PLAN_FILE_NAME)]
    pub plan: PathBuf,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct TargetArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Umbrella target label or definition name (defaults to the only target)
    #[arg(short, long)]
    pub target: Option<String>,
}

#[derive(Args)]
pub struct SettingsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Build configuration (defaults to the first one)
    #[arg(short, long)]
    pub configuration: Option<String>,
}

#[derive(Args)]
pub struct PathsArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct ArtifactsArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Only show one build configuration
    #[arg(short, long)]
    pub configuration: Option<String>,
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    /// Only report these targets
    #[arg(short, long)]
    pub target: Vec<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
