//! Per-request facts the cache layer needs.
//!
//! Populated by the HTTP layer; the cache never inspects a request itself.
//! The session-scoped cache bypass is an explicit field here rather than
//! ambient process state, so the allowance policy stays a pure predicate.

use std::collections::HashSet;

use crate::domain::PageId;

/// Request-derived inputs for key building and the allowance policy.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Names of query parameters present on the request.
    pub query_params: HashSet<String>,
    /// Names of form (POST) parameters present on the request.
    pub post_params: HashSet<String>,
    /// Whether the request carries an authenticated (non-guest) session.
    pub authenticated: bool,
    /// URL segments beyond the page's own path, in order.
    pub url_segments: Vec<String>,
    /// 1-based pagination number.
    pub page_num: u32,
    /// Active language identifier, if any.
    pub language_id: Option<String>,
    /// Whether the active language is the site default.
    pub language_is_default: bool,
    /// Session-scoped override: skip the cache for this one page.
    pub bypass_page: Option<PageId>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            query_params: HashSet::new(),
            post_params: HashSet::new(),
            authenticated: false,
            url_segments: Vec::new(),
            page_num: 1,
            language_id: None,
            language_is_default: true,
            bypass_page: None,
        }
    }
}

impl RequestContext {
    /// An anonymous request with no variation: the common case.
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn has_query_param(&self, name: &str) -> bool {
        self.query_params.contains(name)
    }

    pub fn has_post_param(&self, name: &str) -> bool {
        self.post_params.contains(name)
    }

    /// Whether the session override names exactly this page.
    pub fn bypasses(&self, page_id: PageId) -> bool {
        self.bypass_page == Some(page_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_context_defaults() {
        let ctx = RequestContext::guest();
        assert!(!ctx.authenticated);
        assert_eq!(ctx.page_num, 1);
        assert!(ctx.language_is_default);
        assert!(ctx.bypass_page.is_none());
    }

    #[test]
    fn bypass_matches_only_the_named_page() {
        let ctx = RequestContext {
            bypass_page: Some(10),
            ..Default::default()
        };
        assert!(ctx.bypasses(10));
        assert!(!ctx.bypasses(11));
    }
}
