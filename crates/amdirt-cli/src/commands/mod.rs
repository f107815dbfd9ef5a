//! CLI command implementations.

pub mod diff;
pub mod merge;
pub mod validate;
