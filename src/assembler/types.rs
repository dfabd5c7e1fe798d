//! Assembler request and mapping types

use crate::links::UriContext;
use crate::types::Cursor;
use std::time::Duration;

/// Parameters of one listing call
///
/// Unset fields fall back to the assembler's configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// Filter expression
    pub filter: String,
    /// Cursor target for pageable filters
    pub start: Cursor,
    /// Page size for pageable filters
    pub page_size: Option<usize>,
    /// Result cap for scans
    pub max_results: Option<usize>,
    /// Time budget for scans
    pub max_time: Option<Duration>,
}

impl ListRequest {
    /// Create a request for `filter` starting at the beginning
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            start: Cursor::default(),
            page_size: None,
            max_results: None,
            max_time: None,
        }
    }

    /// Set the cursor target
    ///
    /// Accepts the `start` value of a generated link, including a negative
    /// `previous` cursor.
    #[must_use]
    pub fn with_start(mut self, start: impl Into<Cursor>) -> Self {
        self.start = start.into();
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set the scan result cap
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Set the scan time budget
    #[must_use]
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = Some(max_time);
        self
    }
}

/// Converts a raw store record into its public representation
pub trait RecordMapper<R>: Send + Sync {
    /// Public view type
    type View;

    /// Map one record in the context of the current request
    fn map(&self, record: &R, context: &UriContext) -> Self::View;
}

/// A [`RecordMapper`] backed by a closure
#[derive(Debug, Clone, Copy)]
pub struct MapFn<F>(pub F);

impl<R, V, F> RecordMapper<R> for MapFn<F>
where
    F: Fn(&R, &UriContext) -> V + Send + Sync,
{
    type View = V;

    fn map(&self, record: &R, context: &UriContext) -> V {
        (self.0)(record, context)
    }
}

/// Wrap a closure as a [`RecordMapper`]
pub fn map_fn<R, V, F>(f: F) -> MapFn<F>
where
    F: Fn(&R, &UriContext) -> V + Send + Sync,
{
    MapFn(f)
}
