//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginated request listing CLI
#[derive(Parser, Debug)]
#[command(name = "record-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Request records file (JSON array)
    #[arg(short, long, global = true)]
    pub records: Option<PathBuf>,

    /// Pager configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one page of records matching a filter
    List {
        /// Filter expression, e.g. "(requeststate=complete)"
        #[arg(long)]
        filter: String,

        /// Cursor target for pageable filters; negative values select the first page
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        start: i64,

        /// Page size for pageable filters
        #[arg(long)]
        page_size: Option<usize>,

        /// Result cap for non-pageable filters (0 = unbounded)
        #[arg(long)]
        max_results: Option<usize>,

        /// Time budget in milliseconds for non-pageable filters (0 = unbounded)
        #[arg(long)]
        max_time_ms: Option<u64>,

        /// Request URI that links are derived from
        #[arg(long, default_value = "http://localhost/requests")]
        base_uri: String,
    },

    /// Print the pageable filter shapes
    Filters,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
