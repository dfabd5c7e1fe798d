//! Tests for search module

use super::*;
use crate::error::{Error, Result};
use crate::store::{CursorSearchState, CursorWindow, InMemoryStore, RecordStore};
use crate::types::{Cursor, RecordId, RequestRecord, RequestState, RequestType};
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Store that answers cursor searches with a fixed position report
struct ScriptedStore {
    state: CursorSearchState,
    requested: Mutex<Vec<usize>>,
}

impl ScriptedStore {
    fn new(total_size: usize, current_index: usize) -> Self {
        Self {
            state: CursorSearchState::new(total_size, current_index),
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RecordStore for ScriptedStore {
    type Record = u64;

    async fn cursor_search(
        &self,
        _filter: &str,
        _start: Cursor,
        count: usize,
    ) -> Result<CursorWindow<u64>> {
        self.requested.lock().unwrap().push(count);
        let available = self.state.total_size.saturating_sub(self.state.current_index);
        let first = self.state.current_index as u64;
        let records = (first..first + count.min(available) as u64).collect();
        Ok(CursorWindow::new(records, self.state))
    }

    async fn scan(&self, _: &str, _: usize, _: Duration) -> Result<Option<Vec<RecordId>>> {
        Ok(Some(Vec::new()))
    }

    async fn find(&self, id: RecordId) -> Result<Option<u64>> {
        Ok(Some(id.value()))
    }
}

/// Store whose lookups miss for some ids and fail for others
struct FlakyLookupStore {
    inner: InMemoryStore,
    vanished: HashSet<u64>,
    failing: HashSet<u64>,
    lookups: AtomicUsize,
}

impl FlakyLookupStore {
    fn new(count: u64) -> Self {
        let records = (1..=count)
            .map(|i| RequestRecord::new(i, RequestState::Pending, RequestType::Renewal));
        Self {
            inner: InMemoryStore::from_records(records),
            vanished: HashSet::new(),
            failing: HashSet::new(),
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordStore for FlakyLookupStore {
    type Record = RequestRecord;

    async fn cursor_search(
        &self,
        filter: &str,
        start: Cursor,
        count: usize,
    ) -> Result<CursorWindow<RequestRecord>> {
        self.inner.cursor_search(filter, start, count).await
    }

    async fn scan(
        &self,
        filter: &str,
        max_results: usize,
        max_time: Duration,
    ) -> Result<Option<Vec<RecordId>>> {
        self.inner.scan(filter, max_results, max_time).await
    }

    async fn find(&self, id: RecordId) -> Result<Option<RequestRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        // Later ids resolve faster so out-of-order completion is exercised
        tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(id.value()))).await;
        if self.failing.contains(&id.value()) {
            return Err(Error::store_unavailable("lookup timed out"));
        }
        if self.vanished.contains(&id.value()) {
            return Ok(None);
        }
        self.inner.find(id).await
    }
}

fn ids(records: &[RequestRecord]) -> Vec<u64> {
    records.iter().map(|r| r.id.value()).collect()
}

// ============================================================================
// Cursor Search Tests
// ============================================================================

#[tokio::test]
async fn test_cursor_search_requests_lookahead_record() {
    let store = ScriptedStore::new(25, 10);
    let window = CursorSearch::new(&store)
        .search("(requeststate=*)", Cursor(11), 10)
        .await
        .unwrap();

    assert_eq!(*store.requested.lock().unwrap(), vec![11]);
    // the lookahead record is dropped
    assert_eq!(window.records.len(), 10);
    assert_eq!(window.records, (10..20).collect::<Vec<u64>>());
    assert_eq!(window.state, CursorSearchState::new(25, 10));
}

#[tokio::test]
async fn test_cursor_search_partial_last_page() {
    let store = ScriptedStore::new(15, 10);
    let window = CursorSearch::new(&store)
        .search("(requeststate=*)", Cursor(11), 10)
        .await
        .unwrap();

    assert_eq!(window.records, vec![10, 11, 12, 13, 14]);
}

#[tokio::test]
async fn test_cursor_search_index_beyond_total() {
    let store = ScriptedStore::new(3, 8);
    let window = CursorSearch::new(&store)
        .search("(requeststate=*)", Cursor(9), 10)
        .await
        .unwrap();

    assert!(window.records.is_empty());
}

#[tokio::test]
async fn test_cursor_search_propagates_store_failure() {
    let store = InMemoryStore::new();
    store.set_available(false);

    let err = CursorSearch::new(&store)
        .search("(requeststate=*)", Cursor(0), 10)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable { .. }));
}

// ============================================================================
// Scan Search Tests
// ============================================================================

#[tokio::test]
async fn test_scan_resolves_in_scan_order() {
    let store = FlakyLookupStore::new(12);
    let records = ScanSearch::new(&store)
        .with_lookup_concurrency(4)
        .search("(requeststate=pending)", 10, Duration::from_secs(5))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(ids(&records), (1..=10).collect::<Vec<_>>());
    assert_eq!(store.lookups.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_scan_skips_vanished_records() {
    let mut store = FlakyLookupStore::new(6);
    store.vanished.extend([2, 5]);

    let records = ScanSearch::new(&store)
        .with_lookup_concurrency(3)
        .search("(requeststate=*)", 0, Duration::ZERO)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(ids(&records), vec![1, 3, 4, 6]);
}

#[tokio::test]
async fn test_scan_all_vanished_is_empty() {
    let mut store = FlakyLookupStore::new(3);
    store.vanished.extend([1, 2, 3]);

    let records = ScanSearch::new(&store)
        .search("(requeststate=*)", 0, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(records, Some(vec![]));
}

#[tokio::test]
async fn test_scan_absent_result_set() {
    let store = InMemoryStore::new();
    let records = ScanSearch::new(&store)
        .search("(subject=cn=alice)", 10, Duration::from_secs(1))
        .await
        .unwrap();

    assert!(records.is_none());
}

#[tokio::test]
async fn test_scan_lookup_failure_fails_whole_listing() {
    let mut store = FlakyLookupStore::new(5);
    store.failing.insert(4);

    let err = ScanSearch::new(&store)
        .with_lookup_concurrency(2)
        .search("(requeststate=*)", 0, Duration::ZERO)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::StoreUnavailable { .. }));
}

#[tokio::test]
async fn test_scan_malformed_filter() {
    let store = InMemoryStore::new();
    let err = ScanSearch::new(&store)
        .search("(&(requeststate=complete)", 10, Duration::ZERO)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidFilter { .. }));
}
