//! Meshbuild CLI - build orchestrator for the MeshExchange native services

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::Cli;

use meshbuild::ops;
use meshbuild::ops::build::BuildOptions;
use meshbuild::util::process::{DryRunner, ExecRunner, Runner};
use meshbuild::Target;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("meshbuild=debug")
    } else {
        EnvFilter::new("meshbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execution mode is fixed once here and threaded through; nothing
    // below reads it from ambient state.
    let runner: Box<dyn Runner> = if cli.dry_run {
        Box::new(DryRunner)
    } else {
        Box::new(ExecRunner)
    };

    // No target means build everything.
    let target = cli.target.unwrap_or(Target::All);

    match target {
        Target::Clean => ops::clean::clean(runner.as_ref()),
        _ => ops::build::build(
            target,
            runner.as_ref(),
            BuildOptions {
                emit_plan: cli.plan,
            },
        ),
    }
}
