// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! # Record Pager
//!
//! Uniform paginated listings over an indexed record store.
//!
//! A listing filter is either one of a fixed set of indexed shapes, which
//! are served by a cursor-positioned search with `next`/`previous` links,
//! or anything else, which falls back to a bounded scan plus per-id
//! lookups and yields a single unlinked page.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use record_pager::{
//!     InMemoryStore, ListRequest, PaginatedResultAssembler, RequestInfoMapper, UriContext,
//! };
//!
//! #[tokio::main]
//! async fn main() -> record_pager::Result<()> {
//!     let store = InMemoryStore::from_json_file("requests.json")?;
//!     let assembler = PaginatedResultAssembler::new(store);
//!
//!     let context = UriContext::parse("https://ca.example.com/requests?requestState=complete")?;
//!     let request = ListRequest::new("(requeststate=complete)").with_page_size(10);
//!
//!     if let Some(page) = assembler.list(&request, &context, &RequestInfoMapper).await? {
//!         println!("{} items, next: {:?}", page.len(), page.next());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 PaginatedResultAssembler                   │
//! │   list(request, uri, mapper) → Option<Page<View>>          │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌──────────────┬──────┴───────┬──────────────┐
//!        │   Filter     │   Search     │    Links     │
//!        ├──────────────┼──────────────┼──────────────┤
//!        │ 12 pageable  │ Cursor       │ next         │
//!        │ shapes       │ Scan + find  │ previous     │
//!        └──────────────┴──────┬───────┴──────────────┘
//!                              │
//!                     RecordStore (trait)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Records, links and pages
pub mod types;

/// Filter classification and parsing
pub mod filter;

/// Record store contract and in-memory store
pub mod store;

/// Cursor and scan search strategies
pub mod search;

/// Navigation link construction
pub mod links;

/// Listing dispatcher
pub mod assembler;

/// Public record views
pub mod views;

/// Pager configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use assembler::{map_fn, ListRequest, MapFn, PaginatedResultAssembler, RecordMapper};
pub use config::PagerConfig;
pub use filter::{is_pageable, FilterExpr, PageableFilter};
pub use links::{PageLinkBuilder, UriContext};
pub use store::{CursorSearchState, CursorWindow, InMemoryStore, RecordStore};
pub use views::{RequestInfo, RequestInfoMapper};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
