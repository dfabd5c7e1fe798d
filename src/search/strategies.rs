//! Search strategy implementations
//!
//! Each strategy drives one retrieval mode of a [`RecordStore`].

use crate::error::{Error, Result};
use crate::store::{CursorWindow, RecordStore};
use crate::types::Cursor;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Duration;
use tracing::{debug, warn};

// ============================================================================
// Cursor Search
// ============================================================================

/// Indexed, cursor-positioned search
///
/// Fetches one record beyond the page so the store can tell whether a
/// further page exists without a second round trip. The lookahead record
/// never reaches the caller.
#[derive(Debug)]
pub struct CursorSearch<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> CursorSearch<'a, S> {
    /// Create a cursor search over `store`
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch the page of `page_size` records positioned at `start`
    pub async fn search(
        &self,
        filter: &str,
        start: Cursor,
        page_size: usize,
    ) -> Result<CursorWindow<S::Record>> {
        let CursorWindow { mut records, state } = self
            .store
            .cursor_search(filter, start, page_size.saturating_add(1))
            .await?;

        if state.current_index > state.total_size {
            warn!(
                "Store reported index {} beyond total size {} for {}",
                state.current_index, state.total_size, filter
            );
        }

        let num_records = state.num_records(page_size);
        records.truncate(num_records);

        debug!(
            "Cursor page for {}: total={}, index={}, records={}",
            filter,
            state.total_size,
            state.current_index,
            records.len()
        );
        Ok(CursorWindow::new(records, state))
    }
}

// ============================================================================
// Scan Search
// ============================================================================

/// Bounded, non-paginated search
///
/// Resolves each scanned id individually. Ids that no longer resolve are
/// skipped; lookups run with bounded concurrency but results keep scan order.
#[derive(Debug)]
pub struct ScanSearch<'a, S> {
    store: &'a S,
    lookup_concurrency: usize,
}

impl<'a, S: RecordStore> ScanSearch<'a, S> {
    /// Create a scan search over `store`
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            lookup_concurrency: 1,
        }
    }

    /// Allow up to `limit` lookups in flight at once
    #[must_use]
    pub fn with_lookup_concurrency(mut self, limit: usize) -> Self {
        self.lookup_concurrency = limit.max(1);
        self
    }

    /// Run the scan and resolve its ids
    ///
    /// `Ok(None)` when the store has no searchable result set.
    pub async fn search(
        &self,
        filter: &str,
        max_results: usize,
        max_time: Duration,
    ) -> Result<Option<Vec<S::Record>>> {
        let Some(ids) = self.store.scan(filter, max_results, max_time).await? else {
            debug!("Scan for {} produced no result set", filter);
            return Ok(None);
        };

        let store = self.store;
        let resolved: Vec<Option<S::Record>> = stream::iter(ids)
            .map(|id| async move {
                let record = store.find(id).await?;
                if record.is_none() {
                    debug!("Record {} vanished before lookup, skipping", id);
                }
                Ok::<_, Error>(record)
            })
            .buffered(self.lookup_concurrency)
            .try_collect()
            .await?;

        Ok(Some(resolved.into_iter().flatten().collect()))
    }
}
