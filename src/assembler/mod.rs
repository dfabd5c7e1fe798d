//! Paginated result assembly
//!
//! Classifies the filter, runs the matching search strategy, maps each raw
//! record to its public view, and attaches navigation links.
//!
//! # Overview
//!
//! - [`PaginatedResultAssembler`] - the single `list` operation
//! - [`ListRequest`] - per-call search and paging parameters
//! - [`RecordMapper`] - per-record-kind conversion to a public view

mod dispatcher;
mod types;

pub use dispatcher::PaginatedResultAssembler;
pub use types::{map_fn, ListRequest, MapFn, RecordMapper};
