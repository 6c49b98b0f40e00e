//! Reactions report CLI library.
//!
//! This crate provides the command-line interface wiring: argument parsing,
//! configuration, the terminal spinner, and report rendering.

mod cli;
mod config;
pub mod progress;
pub mod report;

pub use cli::Cli;
pub use config::Config;
