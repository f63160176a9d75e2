//! Compiler command generation.
//!
//! Turns the declarative plan steps into concrete GCC-style command lines.
//! Argument order mirrors what the steps declare: inputs and outputs first,
//! then include paths, warnings, defines, extension flags, resolved library
//! flags.

use std::path::{Path, PathBuf};

use crate::builder::plan::{CompileStep, CustomStep, LinkStep};
use crate::util::process::CommandSpec;

/// GCC-style toolchain driver.
#[derive(Debug, Clone)]
pub struct Toolchain {
    cc: PathBuf,
}

impl Toolchain {
    /// Create a toolchain around the probed C compiler.
    pub fn new(cc: impl Into<PathBuf>) -> Self {
        Toolchain { cc: cc.into() }
    }

    /// Get the C compiler path.
    pub fn compiler_path(&self) -> &Path {
        &self.cc
    }

    /// Generate the command for one source-to-object compilation.
    pub fn compile_command(&self, step: &CompileStep) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cc);

        cmd = cmd.arg("-c");
        cmd = cmd.arg(step.source.display().to_string());
        cmd = cmd.arg("-o");
        cmd = cmd.arg(step.output.display().to_string());

        for dir in &step.include_dirs {
            cmd = cmd.arg(format!("-I{}", dir.display()));
        }

        cmd = cmd.args(step.warnings.iter().cloned());

        for define in &step.defines {
            cmd = cmd.arg(format!("-D{}", define));
        }

        cmd = cmd.args(step.isa_flags.iter().cloned());
        cmd = cmd.args(step.lib_cflags.iter().cloned());

        cmd
    }

    /// Generate the command linking inputs into a binary.
    pub fn link_command(&self, step: &LinkStep) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cc);

        cmd = cmd.arg("-o");
        cmd = cmd.arg(step.output.display().to_string());

        for input in &step.inputs {
            cmd = cmd.arg(input.display().to_string());
        }

        cmd = cmd.args(step.lib_flags.iter().cloned());

        for lib in &step.libs {
            cmd = cmd.arg(format!("-l{}", lib));
        }

        cmd
    }

    /// Generate the command for an external-collaborator step.
    pub fn custom_command(&self, step: &CustomStep) -> CommandSpec {
        CommandSpec::new(&step.program).args(step.args.iter().cloned())
    }
}
