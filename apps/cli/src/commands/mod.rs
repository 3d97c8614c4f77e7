//! Command implementations for the aquarium training CLI.

pub mod device;
pub mod plan;
pub mod train;
