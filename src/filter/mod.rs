//! Filter module
//!
//! Classifies filter expressions and parses them for evaluation.
//!
//! # Overview
//!
//! - [`PageableFilter`] - the closed set of shapes backed by a cursor index
//! - [`is_pageable`] - case-insensitive exact-match classification
//! - [`FilterExpr`] - parsed expression tree used by record stores

mod parser;
mod types;

pub use parser::FilterExpr;
pub use types::{is_pageable, PageableFilter};

#[cfg(test)]
mod tests;
