//! Top-level build operation: probe once, plan, execute.

use anyhow::Result;

use crate::builder::orchestrator::Orchestrator;
use crate::builder::plan::BuildPlan;
use crate::builder::toolchain::Toolchain;
use crate::core::target::Target;
use crate::ops::probe::CapabilityProbe;
use crate::util::process::Runner;

/// Options for the build operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Serialize the plan as JSON instead of executing it.
    pub emit_plan: bool,
}

/// Build one target: capability probe, plan construction, ordered step
/// execution, completion notice.
pub fn build(target: Target, runner: &dyn Runner, options: BuildOptions) -> Result<()> {
    let probe = CapabilityProbe::new(runner);
    let caps = probe.detect()?;

    tracing::debug!("using compiler {}", caps.compiler.display());

    let plan = BuildPlan::for_target(target, &caps);

    if options.emit_plan {
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    let toolchain = Toolchain::new(&caps.compiler);
    Orchestrator::new(toolchain, runner).execute(&plan)?;

    eprintln!("Build finished.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingRunner;

    // These tests exercise the full probe -> plan -> execute path; the
    // compiler lookup hits the real PATH, so they assume a host with cc.

    #[test]
    fn test_daemon_build_records_one_link_command() {
        let runner = RecordingRunner::new();

        build(Target::Daemon, &runner, BuildOptions::default()).unwrap();

        let commands = runner.commands.borrow();
        let links: Vec<_> = commands
            .iter()
            .filter(|c| c.contains("-o exchange-daemon"))
            .collect();
        assert_eq!(links.len(), 1);
        assert!(links[0].contains("src/main.c"));
    }

    #[test]
    fn test_client_build_orders_compiles_before_link() {
        let runner = RecordingRunner::new();

        build(Target::Client, &runner, BuildOptions::default()).unwrap();

        let commands = runner.commands.borrow();
        let link_pos = commands
            .iter()
            .position(|c| c.contains("-o client "))
            .expect("link command present");
        let last_compile = commands
            .iter()
            .rposition(|c| c.contains(" -c "))
            .expect("compile commands present");
        assert!(last_compile < link_pos);
    }

    #[test]
    fn test_emit_plan_runs_nothing() {
        let runner = RecordingRunner::new();

        build(Target::Client, &runner, BuildOptions { emit_plan: true }).unwrap();

        // Only the probe's pkg-config queries were issued.
        let commands = runner.commands.borrow();
        assert!(commands.iter().all(|c| c.starts_with("pkg-config")));
    }
}
