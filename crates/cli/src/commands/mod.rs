//! CLI command implementations.

pub mod migrate;
pub mod order;
pub mod seed;
