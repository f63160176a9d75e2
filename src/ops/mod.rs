//! High-level operations driven by the CLI.

pub mod build;
pub mod clean;
pub mod probe;
