//! CLI command implementations

pub mod simulate;
pub mod tables;
pub mod validate;
