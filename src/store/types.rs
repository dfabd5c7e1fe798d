//! Record store types and traits
//!
//! Defines the contract a backing store exposes to the search strategies.

use crate::error::Result;
use crate::types::{Cursor, RecordId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Position snapshot reported by a cursor-positioned search
///
/// Only valid for the call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorSearchState {
    /// Size of the full matching set
    pub total_size: usize,
    /// Logical position of the first record of the fetched window
    pub current_index: usize,
}

impl CursorSearchState {
    /// Create a new state snapshot
    pub fn new(total_size: usize, current_index: usize) -> Self {
        Self {
            total_size,
            current_index,
        }
    }

    /// Number of records that belong on a page of `page_size`
    pub fn num_records(&self, page_size: usize) -> usize {
        page_size.min(self.total_size.saturating_sub(self.current_index))
    }

    /// Whether another page follows this one
    pub fn has_next(&self, page_size: usize) -> bool {
        self.total_size > self.current_index.saturating_add(page_size)
    }

    /// Whether a page precedes this one
    pub fn has_previous(&self) -> bool {
        self.current_index > 0
    }

    /// Cursor value of the following page
    pub fn next_start(&self, page_size: usize) -> Cursor {
        Cursor(self.current_index as i64 + page_size as i64 + 1)
    }

    /// Cursor value of the preceding page
    ///
    /// Not clamped: negative when `current_index < page_size`.
    pub fn previous_start(&self, page_size: usize) -> Cursor {
        Cursor(self.current_index as i64 - page_size as i64)
    }
}

/// Records returned by a cursor search plus the store's position report
#[derive(Debug, Clone, PartialEq)]
pub struct CursorWindow<R> {
    /// Records from `current_index` onward, in id order
    pub records: Vec<R>,
    /// Position snapshot
    pub state: CursorSearchState,
}

impl<R> CursorWindow<R> {
    /// Create a new window
    pub fn new(records: Vec<R>, state: CursorSearchState) -> Self {
        Self { records, state }
    }
}

/// Backing store of records
///
/// Implementations must return records and ids in ascending id order and
/// must not retry internally.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Raw record type handed to mappers
    type Record: Send + Sync;

    /// Indexed, cursor-positioned search
    ///
    /// Positions the window at the first matching record whose id is
    /// `>= start` (the first record when `start` is zero or negative) and
    /// returns up to `count` records from there.
    async fn cursor_search(
        &self,
        filter: &str,
        start: Cursor,
        count: usize,
    ) -> Result<CursorWindow<Self::Record>>;

    /// Bounded, non-paginated search returning matching ids
    ///
    /// `Ok(None)` means the store has no searchable result set for this
    /// filter, which is distinct from `Ok(Some(vec![]))` (no matches).
    /// A zero `max_results` or `max_time` means unbounded.
    async fn scan(
        &self,
        filter: &str,
        max_results: usize,
        max_time: Duration,
    ) -> Result<Option<Vec<RecordId>>>;

    /// Single-id lookup; `Ok(None)` when the id no longer resolves
    async fn find(&self, id: RecordId) -> Result<Option<Self::Record>>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for &T {
    type Record = T::Record;

    async fn cursor_search(
        &self,
        filter: &str,
        start: Cursor,
        count: usize,
    ) -> Result<CursorWindow<Self::Record>> {
        (**self).cursor_search(filter, start, count).await
    }

    async fn scan(
        &self,
        filter: &str,
        max_results: usize,
        max_time: Duration,
    ) -> Result<Option<Vec<RecordId>>> {
        (**self).scan(filter, max_results, max_time).await
    }

    async fn find(&self, id: RecordId) -> Result<Option<Self::Record>> {
        (**self).find(id).await
    }
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    type Record = T::Record;

    async fn cursor_search(
        &self,
        filter: &str,
        start: Cursor,
        count: usize,
    ) -> Result<CursorWindow<Self::Record>> {
        (**self).cursor_search(filter, start, count).await
    }

    async fn scan(
        &self,
        filter: &str,
        max_results: usize,
        max_time: Duration,
    ) -> Result<Option<Vec<RecordId>>> {
        (**self).scan(filter, max_results, max_time).await
    }

    async fn find(&self, id: RecordId) -> Result<Option<Self::Record>> {
        (**self).find(id).await
    }
}
