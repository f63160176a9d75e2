//! Meshbuild - build orchestrator for the MeshExchange native services
//!
//! This crate provides the core library functionality for Meshbuild,
//! including toolchain probing, build plan construction, and step execution.

pub mod builder;
pub mod core;
pub mod error;
pub mod ops;
pub mod util;

/// Test fakes for Meshbuild unit tests.
///
/// This module is only available when running tests. It provides a
/// recording runner that stands in for real process execution.
#[cfg(test)]
pub mod test_support;

pub use crate::core::target::Target;
pub use crate::error::BuildError;
