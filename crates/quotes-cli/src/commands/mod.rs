//! CLI command implementations

pub mod blocks;
pub mod resolve;
pub mod vault;
