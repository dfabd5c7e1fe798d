//! Common types used throughout record-pager
//!
//! This module contains the identifiers, record shape, and page/link types
//! shared by the store, the search strategies, and the assembler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// ============================================================================
// Record Identity
// ============================================================================

/// Stable, totally ordered identifier of a record in the store
///
/// Used both as the cursor target for paged searches and as the token
/// returned by scans.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Create a new record id
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw numeric value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| Error::Other(format!("Invalid record id '{s}': {e}")))
    }
}

/// Position requested from a cursor search
///
/// Signed so that a `previous` link computed before the first page can be
/// followed back. A cursor selects the first record whose id is `>=` it;
/// any cursor at or below zero selects the first record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cursor(pub i64);

impl Cursor {
    /// Create a new cursor
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw numeric value
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Whether `id` is at or after this cursor
    pub fn reaches(self, id: RecordId) -> bool {
        i128::from(id.value()) >= i128::from(self.0)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Cursor {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for Cursor {
    fn from(id: RecordId) -> Self {
        Self(i64::try_from(id.value()).unwrap_or(i64::MAX))
    }
}

impl FromStr for Cursor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| Error::invalid_request(format!("Invalid cursor '{s}': {e}")))
    }
}

// ============================================================================
// Request State / Type
// ============================================================================

/// Lifecycle state of a request record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Begin,
    Pending,
    Approved,
    SvcPending,
    Canceled,
    Rejected,
    Complete,
}

impl RequestState {
    /// Attribute value as stored in the index
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Begin => "begin",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::SvcPending => "svc_pending",
            Self::Canceled => "canceled",
            Self::Rejected => "rejected",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of request a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    #[default]
    Enrollment,
    Renewal,
    Revocation,
    Recovery,
}

impl RequestType {
    /// Attribute value as stored in the index
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enrollment => "enrollment",
            Self::Renewal => "renewal",
            Self::Revocation => "revocation",
            Self::Recovery => "recovery",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request Record
// ============================================================================

/// Attribute name of the request state in filter expressions
pub const ATTR_REQUEST_STATE: &str = "requeststate";

/// Attribute name of the request type in filter expressions
pub const ATTR_REQUEST_TYPE: &str = "requesttype";

/// Attribute name of the request id in filter expressions
pub const ATTR_REQUEST_ID: &str = "requestid";

/// A request record as held by a record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Unique id
    pub id: RecordId,
    /// Current lifecycle state
    pub state: RequestState,
    /// Request kind
    #[serde(rename = "type")]
    pub kind: RequestType,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Extra searchable attributes (lower-case names)
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl RequestRecord {
    /// Create a new record created now
    pub fn new(id: impl Into<RecordId>, state: RequestState, kind: RequestType) -> Self {
        Self {
            id: id.into(),
            state,
            kind,
            created_at: Utc::now(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add a searchable attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Set the creation timestamp
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Look up an attribute value by (case-insensitive) name
    pub fn attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            ATTR_REQUEST_STATE => Some(self.state.as_str().to_string()),
            ATTR_REQUEST_TYPE => Some(self.kind.as_str().to_string()),
            ATTR_REQUEST_ID => Some(self.id.to_string()),
            _ => self.attributes.get(&name).cloned(),
        }
    }
}

// ============================================================================
// Links
// ============================================================================

/// Relation of a navigation link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRelation {
    Next,
    Previous,
}

impl LinkRelation {
    /// Relation string as written on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

impl fmt::Display for LinkRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media type advertised on links, fixed per representation format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    #[serde(rename = "application/xml")]
    Xml,
    #[serde(rename = "application/json")]
    Json,
}

impl MediaType {
    /// MIME string
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "application/xml",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigation link attached to a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link relation
    pub rel: LinkRelation,
    /// Absolute target URI
    pub href: String,
    /// Media type of the target representation
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

impl Link {
    /// Create a new link
    pub fn new(rel: LinkRelation, href: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            rel,
            href: href.into(),
            media_type,
        }
    }
}

// ============================================================================
// Page
// ============================================================================

/// One bounded, ordered result set plus its navigation links
///
/// Carries at most one link per relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<V> {
    /// Mapped records in store order
    pub items: Vec<V>,
    /// Navigation links
    #[serde(default)]
    pub links: Vec<Link>,
}

impl<V> Default for Page<V> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl<V> Page<V> {
    /// Create a page from items and links
    pub fn new(items: Vec<V>, links: Vec<Link>) -> Self {
        let mut page = Self {
            items,
            links: Vec::with_capacity(links.len()),
        };
        for link in links {
            page.set_link(link);
        }
        page
    }

    /// Add a link, replacing any existing link with the same relation
    pub fn set_link(&mut self, link: Link) {
        self.links.retain(|l| l.rel != link.rel);
        self.links.push(link);
    }

    /// Link with the given relation
    pub fn link(&self, rel: LinkRelation) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }

    /// Href of the `next` link
    pub fn next(&self) -> Option<&str> {
        self.link(LinkRelation::Next).map(|l| l.href.as_str())
    }

    /// Href of the `previous` link
    pub fn previous(&self) -> Option<&str> {
        self.link(LinkRelation::Previous).map(|l| l.href.as_str())
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
