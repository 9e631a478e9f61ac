//! CLI argument parsing and command dispatch.

pub mod args;
pub mod config;
pub mod search;

pub use args::{Cli, Commands, ConfigCommand, OutputFormat, SearchArgs};
