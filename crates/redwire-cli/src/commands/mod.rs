//! CLI command implementations.

pub mod cells;
pub mod common;
pub mod compile;
pub mod simulate;
pub mod version;
