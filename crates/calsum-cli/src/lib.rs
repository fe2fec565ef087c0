//! Calendar summary CLI library.
//!
//! This crate provides the CLI interface and the `.ics` calendar source.

mod cli;
pub mod commands;
mod config;
pub mod ics;

pub use cli::{Cli, Commands, FilterArgs};
pub use config::Config;
