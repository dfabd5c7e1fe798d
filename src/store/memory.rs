//! In-memory record store
//!
//! Reference implementation of [`RecordStore`] over request records, used
//! by the CLI and by tests. Filters are parsed with [`FilterExpr`]; scans
//! only run over indexed attributes.

use super::types::{CursorSearchState, CursorWindow, RecordStore};
use crate::error::{Error, Result, ResultExt};
use crate::filter::FilterExpr;
use crate::types::{
    Cursor, RecordId, RequestRecord, ATTR_REQUEST_ID, ATTR_REQUEST_STATE, ATTR_REQUEST_TYPE,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Record store held entirely in memory
#[derive(Debug)]
pub struct InMemoryStore {
    /// Records keyed (and therefore ordered) by id
    records: RwLock<BTreeMap<RecordId, RequestRecord>>,
    /// Attributes a scan may reference
    indexed: BTreeSet<String>,
    /// Cleared to simulate an unreachable store
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store indexing the request state, type and id
    pub fn new() -> Self {
        let indexed = [ATTR_REQUEST_STATE, ATTR_REQUEST_TYPE, ATTR_REQUEST_ID]
            .into_iter()
            .map(String::from)
            .collect();
        Self {
            records: RwLock::new(BTreeMap::new()),
            indexed,
            available: AtomicBool::new(true),
        }
    }

    /// Create a store holding the given records
    pub fn from_records(records: impl IntoIterator<Item = RequestRecord>) -> Self {
        let store = Self::new();
        let map = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: RwLock::new(map),
            ..store
        }
    }

    /// Load records from a JSON array file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read records file '{}'", path.display()))?;
        let records: Vec<RequestRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid records file '{}'", path.display()))?;
        Ok(Self::from_records(records))
    }

    /// Index an additional attribute so scans may reference it
    #[must_use]
    pub fn with_indexed_attribute(mut self, name: impl Into<String>) -> Self {
        self.indexed.insert(name.into().to_ascii_lowercase());
        self
    }

    /// Mark the store reachable or unreachable
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Insert or replace a record
    pub async fn insert(&self, record: RequestRecord) {
        self.records.write().await.insert(record.id, record);
    }

    /// Remove a record, returning it if present
    pub async fn remove(&self, id: RecordId) -> Option<RequestRecord> {
        self.records.write().await.remove(&id)
    }

    /// Number of records held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::store_unavailable("in-memory store marked unavailable"))
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    type Record = RequestRecord;

    async fn cursor_search(
        &self,
        filter: &str,
        start: Cursor,
        count: usize,
    ) -> Result<CursorWindow<RequestRecord>> {
        self.ensure_available()?;
        let expr = FilterExpr::parse(filter)?;

        let records = self.records.read().await;
        let matching: Vec<&RequestRecord> =
            records.values().filter(|r| expr.matches(r)).collect();

        let total_size = matching.len();
        let current_index = matching.partition_point(|r| !start.reaches(r.id));
        let window = matching
            .iter()
            .skip(current_index)
            .take(count)
            .map(|r| (*r).clone())
            .collect();

        debug!(
            "Cursor search {} from {}: total={}, index={}",
            filter, start, total_size, current_index
        );
        Ok(CursorWindow::new(
            window,
            CursorSearchState::new(total_size, current_index),
        ))
    }

    async fn scan(
        &self,
        filter: &str,
        max_results: usize,
        max_time: Duration,
    ) -> Result<Option<Vec<RecordId>>> {
        self.ensure_available()?;
        let expr = FilterExpr::parse(filter)?;

        if let Some(attr) = expr
            .attributes()
            .into_iter()
            .find(|a| !self.indexed.contains(a))
        {
            debug!("Scan {} references unindexed attribute {}", filter, attr);
            return Ok(None);
        }

        let started = Instant::now();
        let records = self.records.read().await;
        let mut ids = Vec::new();
        for record in records.values() {
            if max_results > 0 && ids.len() >= max_results {
                break;
            }
            if !max_time.is_zero() && started.elapsed() >= max_time {
                debug!(
                    "Scan {} hit its time budget after {} ids",
                    filter,
                    ids.len()
                );
                break;
            }
            if expr.matches(record) {
                ids.push(record.id);
            }
        }
        Ok(Some(ids))
    }

    async fn find(&self, id: RecordId) -> Result<Option<RequestRecord>> {
        self.ensure_available()?;
        Ok(self.records.read().await.get(&id).cloned())
    }
}
