//! Build plan construction and execution.

pub mod orchestrator;
pub mod plan;
pub mod toolchain;
