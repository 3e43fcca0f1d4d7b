//! Residency day calculator CLI library.
//!
//! This crate provides the CLI interface for the day calculator.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, InputArgs};
pub use config::Config;
