//! Subprocess execution utilities.
//!
//! All external commands go through the [`Runner`] port so orchestration
//! code never touches `std::process` directly. The two production runners
//! differ only in side effects: [`ExecRunner`] spawns processes, while
//! [`DryRunner`] reports the command lines it would have spawned.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::error::BuildError;
use crate::util::fs::remove_file_if_exists;

/// A fully formed external command: program plus argument list.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec for the given program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a quiet probe invocation.
#[derive(Debug, Clone)]
pub struct Captured {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Collected standard output.
    pub stdout: String,
}

/// Process-execution port.
///
/// Tests substitute a recording fake; production code picks [`ExecRunner`]
/// or [`DryRunner`] once per invocation, so execution mode is never read
/// from ambient state.
pub trait Runner {
    /// Execute with inherited standard streams, failing on non-zero exit.
    fn run(&self, spec: &CommandSpec) -> Result<()>;

    /// Execute quietly, capturing standard output.
    ///
    /// Used for toolchain probes; probes are read-only and run for real
    /// even in dry-run mode.
    fn capture(&self, spec: &CommandSpec) -> Result<Captured>;

    /// Remove a file-system artifact (or report the removal in dry-run).
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Whether this runner spawns real processes.
    fn is_dry(&self) -> bool {
        false
    }
}

/// Runner that spawns real processes.
pub struct ExecRunner;

impl Runner for ExecRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        tracing::info!("running `{}`", spec);

        let status = Command::new(spec.get_program())
            .args(spec.get_args())
            .status()
            .with_context(|| format!("failed to spawn `{}`", spec.get_program().display()))?;

        if !status.success() {
            return Err(BuildError::StepFailed {
                command: spec.to_string(),
                code: status.code(),
            }
            .into());
        }

        Ok(())
    }

    fn capture(&self, spec: &CommandSpec) -> Result<Captured> {
        let output = Command::new(spec.get_program())
            .args(spec.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .with_context(|| format!("failed to spawn `{}`", spec.get_program().display()))?;

        Ok(Captured {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        remove_file_if_exists(path)
    }
}

/// Runner that reports commands without executing them.
///
/// Prints exactly one line per would-be invocation and succeeds
/// unconditionally; no process is spawned and no file is touched.
pub struct DryRunner;

impl Runner for DryRunner {
    fn run(&self, spec: &CommandSpec) -> Result<()> {
        println!("[dry-run] {}", spec);
        Ok(())
    }

    fn capture(&self, spec: &CommandSpec) -> Result<Captured> {
        ExecRunner.capture(spec)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        println!("[dry-run] rm -f {}", path.display());
        Ok(())
    }

    fn is_dry(&self) -> bool {
        true
    }
}
