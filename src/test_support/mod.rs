//! Test fakes for orchestration.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::error::BuildError;
use crate::util::process::{Captured, CommandSpec, Runner};

/// Runner that records invocations instead of spawning processes.
#[derive(Default)]
pub struct RecordingRunner {
    /// Every command line passed to `run` or `capture`, in order.
    pub commands: RefCell<Vec<String>>,
    /// Every path passed to `remove_file`, in order.
    pub removed: RefCell<Vec<PathBuf>>,
    /// Canned reply for `capture`; `None` behaves like a missing binary.
    pub capture_reply: Option<Captured>,
    /// Zero-based index of the `run` call that fails, if any.
    pub fail_at: Option<usize>,
}

impl RecordingRunner {
    /// A runner where every step succeeds and probes find no tools.
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// A runner whose probes succeed with the given stdout.
    pub fn with_capture(stdout: &str) -> Self {
        RecordingRunner {
            capture_reply: Some(Captured {
                success: true,
                stdout: stdout.to_string(),
            }),
            ..Default::default()
        }
    }

    /// A runner whose probes run but exit non-zero.
    pub fn failing_capture() -> Self {
        RecordingRunner {
            capture_reply: Some(Captured {
                success: false,
                stdout: String::new(),
            }),
            ..Default::default()
        }
    }

    /// A runner whose n-th `run` call (zero-based) exits non-zero.
    pub fn failing_at(index: usize) -> Self {
        RecordingRunner {
            fail_at: Some(index),
            ..Default::default()
        }
    }
}

impl Runner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        let index = {
            let mut commands = self.commands.borrow_mut();
            commands.push(spec.to_string());
            commands.len() - 1
        };

        if self.fail_at == Some(index) {
            return Err(BuildError::StepFailed {
                command: spec.to_string(),
                code: Some(1),
            }
            .into());
        }

        Ok(())
    }

    fn capture(&self, spec: &CommandSpec) -> Result<Captured> {
        self.commands.borrow_mut().push(spec.to_string());

        match &self.capture_reply {
            Some(reply) => Ok(reply.clone()),
            None => bail!("failed to spawn `{}`", spec.get_program().display()),
        }
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.removed.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn is_dry(&self) -> bool {
        true
    }
}
