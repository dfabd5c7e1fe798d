//! Search module
//!
//! The two retrieval modes behind a listing:
//! - [`CursorSearch`] - indexed paging with a one-record lookahead
//! - [`ScanSearch`] - bounded scan with per-id resolution

mod strategies;

pub use strategies::{CursorSearch, ScanSearch};

#[cfg(test)]
mod tests;
