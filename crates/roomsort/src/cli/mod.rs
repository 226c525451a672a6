//! Subcommand implementations.

pub mod categories;
pub mod categorize;
pub mod config;
