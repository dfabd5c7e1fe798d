//! CLI runner - executes commands

use crate::assembler::{ListRequest, PaginatedResultAssembler};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PagerConfig;
use crate::error::{Error, Result};
use crate::filter::PageableFilter;
use crate::links::UriContext;
use crate::store::InMemoryStore;
use crate::views::RequestInfoMapper;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let output = self.execute().await?;
        self.output_message(&output)
    }

    /// Run the CLI command and return its output document
    pub async fn execute(&self) -> Result<Value> {
        match &self.cli.command {
            Commands::List {
                filter,
                start,
                page_size,
                max_results,
                max_time_ms,
                base_uri,
            } => {
                let mut request = ListRequest::new(filter.as_str()).with_start(*start);
                if let Some(size) = page_size {
                    request = request.with_page_size(*size);
                }
                if let Some(limit) = max_results {
                    request = request.with_max_results(*limit);
                }
                if let Some(ms) = max_time_ms {
                    request = request.with_max_time(Duration::from_millis(*ms));
                }
                self.list(&request, base_uri).await
            }
            Commands::Filters => Ok(Self::filters()),
        }
    }

    /// Load pager configuration, falling back to defaults
    fn load_config(&self) -> Result<PagerConfig> {
        match &self.cli.config {
            Some(path) => {
                debug!("Loading pager config from {}", path.display());
                PagerConfig::from_file(path)
            }
            None => Ok(PagerConfig::default()),
        }
    }

    /// Load the records file into an in-memory store
    fn load_store(&self) -> Result<InMemoryStore> {
        let path = self
            .cli
            .records
            .as_ref()
            .ok_or_else(|| Error::config("Records file not specified (use -r flag)"))?;
        InMemoryStore::from_json_file(path)
    }

    /// List one page
    async fn list(&self, request: &ListRequest, base_uri: &str) -> Result<Value> {
        let config = self.load_config()?;
        let store = self.load_store()?;
        let context = UriContext::parse(base_uri)?;

        let assembler = PaginatedResultAssembler::with_config(store, config);
        let page = assembler
            .list(request, &context, &RequestInfoMapper)
            .await?;

        Ok(serde_json::to_value(page)?)
    }

    /// Describe the pageable filter shapes
    fn filters() -> Value {
        let shapes: Vec<Value> = PageableFilter::ALL
            .iter()
            .map(|shape| {
                json!({
                    "filter": shape.expression(),
                    "requestState": shape.state(),
                    "requestType": shape.request_type(),
                })
            })
            .collect();
        Value::Array(shapes)
    }

    /// Output a message
    fn output_message(&self, msg: &Value) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        println!("{rendered}");
        Ok(())
    }
}
