//! CLI module
//!
//! Command-line interface over a JSON file of request records.
//!
//! # Commands
//!
//! - `list` - List one page of records matching a filter
//! - `filters` - Print the pageable filter shapes

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
