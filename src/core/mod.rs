//! Core domain types.

pub mod target;
