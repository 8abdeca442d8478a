//! CLI command implementations.

pub mod migrate;
pub mod plans;
pub mod roles;
pub mod token;
