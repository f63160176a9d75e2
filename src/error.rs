//! Error types for orchestration failures.

use thiserror::Error;

/// Failures raised below the CLI boundary.
///
/// Everything here bubbles up as a single `anyhow::Error` caught once in
/// `main`. Soft-dependency failures (a missing flag resolver) never reach
/// this type; they degrade to empty flag sets inside the probe.
#[derive(Debug, Error)]
pub enum BuildError {
    /// No usable C compiler on PATH.
    #[error("no C compiler found in PATH (tried $CC, gcc, cc, clang)")]
    CompilerNotFound,

    /// An external compile/link/test step exited non-zero.
    ///
    /// The tool's own diagnostics are already visible on the inherited
    /// streams, so only the command line and exit code are carried here.
    #[error("`{command}` failed with exit code {code:?}")]
    StepFailed {
        command: String,
        code: Option<i32>,
    },
}
