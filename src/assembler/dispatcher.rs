//! Listing dispatcher
//!
//! Picks cursor paging or a bounded scan based on the filter shape and
//! assembles one uniform page.

use super::types::{ListRequest, RecordMapper};
use crate::config::PagerConfig;
use crate::error::{Error, Result};
use crate::filter::PageableFilter;
use crate::links::{PageLinkBuilder, UriContext};
use crate::search::{CursorSearch, ScanSearch};
use crate::store::RecordStore;
use crate::types::Page;
use tracing::{debug, info};

/// Produces pages of mapped records from a record store
///
/// Holds no per-request state; concurrent `list` calls are independent.
#[derive(Debug)]
pub struct PaginatedResultAssembler<S> {
    store: S,
    config: PagerConfig,
    links: PageLinkBuilder,
}

impl<S: RecordStore> PaginatedResultAssembler<S> {
    /// Create an assembler over `store` with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, PagerConfig::default())
    }

    /// Create an assembler over `store` with `config`
    pub fn with_config(store: S, config: PagerConfig) -> Self {
        let links = PageLinkBuilder::new(config.media_type)
            .with_preserved_params(config.preserved_params.iter().cloned());
        Self {
            store,
            config,
            links,
        }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// List the records matching `request`
    ///
    /// Returns `Ok(None)` only when a scan finds no searchable result set;
    /// zero matches yield an empty page. Store failures propagate unchanged.
    pub async fn list<M>(
        &self,
        request: &ListRequest,
        context: &UriContext,
        mapper: &M,
    ) -> Result<Option<Page<M::View>>>
    where
        M: RecordMapper<S::Record>,
    {
        let page = match PageableFilter::classify(&request.filter) {
            Some(shape) => {
                debug!("Filter {} is pageable ({:?})", request.filter, shape);
                Some(self.list_page(request, context, mapper).await?)
            }
            None => {
                debug!("Filter {} is not pageable, scanning", request.filter);
                self.list_scan(request, context, mapper).await?
            }
        };

        match &page {
            Some(page) => info!(
                "Listed {} records ({} links) for {}",
                page.items.len(),
                page.links.len(),
                request.filter
            ),
            None => info!("No searchable result set for {}", request.filter),
        }
        Ok(page)
    }

    async fn list_page<M>(
        &self,
        request: &ListRequest,
        context: &UriContext,
        mapper: &M,
    ) -> Result<Page<M::View>>
    where
        M: RecordMapper<S::Record>,
    {
        let page_size = self.resolve_page_size(request.page_size)?;
        let window = CursorSearch::new(&self.store)
            .search(&request.filter, request.start, page_size)
            .await?;

        let items = window
            .records
            .iter()
            .map(|record| mapper.map(record, context))
            .collect();
        let links = self.links.build(context, &window.state, page_size);
        Ok(Page::new(items, links))
    }

    async fn list_scan<M>(
        &self,
        request: &ListRequest,
        context: &UriContext,
        mapper: &M,
    ) -> Result<Option<Page<M::View>>>
    where
        M: RecordMapper<S::Record>,
    {
        let max_results = request.max_results.unwrap_or(self.config.max_results);
        let max_time = request.max_time.unwrap_or_else(|| self.config.max_time());

        let records = ScanSearch::new(&self.store)
            .with_lookup_concurrency(self.config.lookup_concurrency)
            .search(&request.filter, max_results, max_time)
            .await?;

        Ok(records.map(|records| {
            let items = records
                .iter()
                .map(|record| mapper.map(record, context))
                .collect();
            Page::new(items, Vec::new())
        }))
    }

    fn resolve_page_size(&self, requested: Option<usize>) -> Result<usize> {
        match requested {
            None => Ok(self.config.default_page_size),
            Some(0) => Err(Error::invalid_request("page size must be positive")),
            Some(size) if size > self.config.max_page_size => {
                debug!(
                    "Clamping page size {} to {}",
                    size, self.config.max_page_size
                );
                Ok(self.config.max_page_size)
            }
            Some(size) => Ok(size),
        }
    }
}
