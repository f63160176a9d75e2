//! CLI definitions using clap.

use std::str::FromStr;

use clap::Parser;

use meshbuild::Target;

/// Build orchestrator for the MeshExchange native services
#[derive(Parser)]
#[command(name = "meshbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Build target: daemon, client, server, mongo, tests, all, clean
    /// (defaults to all)
    #[arg(value_parser = Target::from_str)]
    pub target: Option<Target>,

    /// Report commands without executing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Emit the build plan as JSON instead of building
    #[arg(long, conflicts_with = "dry_run")]
    pub plan: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
