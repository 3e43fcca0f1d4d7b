//! CLI subcommand implementations.

pub mod events;
pub mod input;
pub mod report;
pub mod zones;
