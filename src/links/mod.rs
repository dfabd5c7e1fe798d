//! Navigation link construction
//!
//! Derives `next`/`previous` links for a cursor page from the caller's
//! request URI. Only a fixed set of filter parameters survives into the
//! generated hrefs; `start` and `pageSize` are appended per direction.

use crate::error::Result;
use crate::store::CursorSearchState;
use crate::types::{Cursor, Link, LinkRelation, MediaType};
use url::Url;

/// Query parameter carrying the cursor position
pub const START_PARAM: &str = "start";

/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "pageSize";

/// Query parameter filtering by request state
pub const REQUEST_STATE_PARAM: &str = "requestState";

/// Query parameter filtering by request type
pub const REQUEST_TYPE_PARAM: &str = "requestType";

/// Parameters carried into links unless configured otherwise
pub const DEFAULT_PRESERVED_PARAMS: [&str; 2] = [REQUEST_STATE_PARAM, REQUEST_TYPE_PARAM];

// ============================================================================
// URI Context
// ============================================================================

/// The current request's absolute path and raw query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriContext {
    base: Url,
    query: Vec<(String, String)>,
}

impl UriContext {
    /// Create a context from a base URL and query parameters
    ///
    /// Any query or fragment already on `base` is discarded.
    pub fn new(mut base: Url, query: Vec<(String, String)>) -> Self {
        base.set_query(None);
        base.set_fragment(None);
        Self { base, query }
    }

    /// Split a full request URI into its base path and query parameters
    pub fn parse(request_uri: &str) -> Result<Self> {
        let url = Url::parse(request_uri)?;
        let query = url.query_pairs().into_owned().collect();
        Ok(Self::new(url, query))
    }

    /// Absolute path of the request, without query
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// All raw query parameters, in request order
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// First value of a query parameter (names are case-sensitive)
    pub fn first(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Link Template
// ============================================================================

/// Base URI plus preserved parameters, awaiting `start` and `pageSize`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplate {
    base: Url,
    preserved: Vec<(String, String)>,
}

impl LinkTemplate {
    /// Preserved parameters, in the order they will appear
    pub fn preserved(&self) -> &[(String, String)] {
        &self.preserved
    }

    /// Fill in the cursor placeholders
    pub fn expand(&self, start: Cursor, page_size: usize) -> String {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in &self.preserved {
                query.append_pair(name, value);
            }
            query.append_pair(START_PARAM, &start.to_string());
            query.append_pair(PAGE_SIZE_PARAM, &page_size.to_string());
        }
        url.to_string()
    }
}

// ============================================================================
// Page Link Builder
// ============================================================================

/// Builds `next`/`previous` links for cursor pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinkBuilder {
    preserved_params: Vec<String>,
    media_type: MediaType,
}

impl Default for PageLinkBuilder {
    fn default() -> Self {
        Self::new(MediaType::default())
    }
}

impl PageLinkBuilder {
    /// Create a builder preserving the request state and type filters
    pub fn new(media_type: MediaType) -> Self {
        Self {
            preserved_params: DEFAULT_PRESERVED_PARAMS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            media_type,
        }
    }

    /// Replace the set of preserved parameter names
    #[must_use]
    pub fn with_preserved_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preserved_params = names.into_iter().map(Into::into).collect();
        self
    }

    /// Media type stamped on every link
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Capture the base URI and the preserved parameters present on the request
    pub fn template(&self, context: &UriContext) -> LinkTemplate {
        let preserved = self
            .preserved_params
            .iter()
            .filter_map(|name| {
                context
                    .first(name)
                    .map(|value| (name.clone(), value.to_string()))
            })
            .collect();
        LinkTemplate {
            base: context.base().clone(),
            preserved,
        }
    }

    /// Derive the navigation links for a cursor page
    ///
    /// `next` exists iff `total_size > current_index + page_size` and points
    /// at `current_index + page_size + 1`. `previous` exists iff
    /// `current_index > 0` and points at `current_index - page_size`, which
    /// is not clamped and may be negative.
    pub fn build(
        &self,
        context: &UriContext,
        state: &CursorSearchState,
        page_size: usize,
    ) -> Vec<Link> {
        let template = self.template(context);
        let mut links = Vec::with_capacity(2);

        if state.has_next(page_size) {
            let href = template.expand(state.next_start(page_size), page_size);
            links.push(Link::new(LinkRelation::Next, href, self.media_type));
        }

        if state.has_previous() {
            let href = template.expand(state.previous_start(page_size), page_size);
            links.push(Link::new(LinkRelation::Previous, href, self.media_type));
        }

        links
    }
}
