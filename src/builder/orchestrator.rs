//! Sequential step execution.
//!
//! Steps run strictly in declared order, fully awaited, one at a time; the
//! first non-success aborts everything that follows. There is no timeout
//! and no cleanup of partial objects.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use crate::builder::plan::{BuildPlan, BuildStep};
use crate::builder::toolchain::Toolchain;
use crate::util::process::Runner;

/// Executes a build plan through the process-execution port.
pub struct Orchestrator<'a> {
    toolchain: Toolchain,
    runner: &'a dyn Runner,
}

impl<'a> Orchestrator<'a> {
    /// Create a new orchestrator.
    pub fn new(toolchain: Toolchain, runner: &'a dyn Runner) -> Self {
        Orchestrator { toolchain, runner }
    }

    /// Execute every step of the plan in order, halting on first failure.
    pub fn execute(&self, plan: &BuildPlan) -> Result<()> {
        let total = plan.steps.len();

        let pb = if !self.runner.is_dry() && total > 1 {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        for step in &plan.steps {
            let spec = match step {
                BuildStep::Compile(c) => {
                    tracing::debug!(
                        "compiling {} -> {}",
                        c.source.display(),
                        c.output.display()
                    );
                    if let Some(ref pb) = pb {
                        pb.set_message(c.output.display().to_string());
                    }
                    self.toolchain.compile_command(c)
                }
                BuildStep::Link(l) => {
                    tracing::debug!("linking {}", l.output.display());
                    if let Some(ref pb) = pb {
                        pb.set_message(l.output.display().to_string());
                    }
                    self.toolchain.link_command(l)
                }
                BuildStep::Custom(c) => {
                    tracing::debug!("running {}", c.program);
                    self.toolchain.custom_command(c)
                }
            };

            self.runner.run(&spec)?;

            if let Some(ref pb) = pb {
                pb.inc(1);
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }

        Ok(())
    }
}
