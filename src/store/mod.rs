//! Record store module
//!
//! The narrow interface through which search strategies reach the data.
//!
//! # Overview
//!
//! - [`RecordStore`] - cursor search, bounded scan, and single-id lookup
//! - [`CursorSearchState`] - per-call position report of a cursor search
//! - [`InMemoryStore`] - reference store over request records

mod memory;
mod types;

pub use memory::InMemoryStore;
pub use types::{CursorSearchState, CursorWindow, RecordStore};
