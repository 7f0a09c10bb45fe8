//! CLI command implementations.

pub mod build;
pub mod hash;
pub mod serve;
