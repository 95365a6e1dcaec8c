//! Cache allowance policy.
//!
//! Decides, per request, whether the cache may be read or populated for a
//! page. Rules are evaluated in a fixed order and short-circuit on the
//! first denial. Everything is a pure predicate over the page snapshot and
//! the request context.

use crate::domain::PageRecord;

use super::context::RequestContext;

/// Why a request was denied cache access. Used for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDenial {
    /// The page's template has no positive TTL.
    NoTtl,
    /// Authenticated requester, and the template does not opt in.
    Authenticated,
    /// Authenticated requester with edit rights on this page; editors must
    /// never see their own stale previews.
    PageEditor,
    /// A template-blacklisted query parameter is present.
    QueryParam(String),
    /// A template-blacklisted form parameter is present.
    PostParam(String),
    /// The session-scoped override names this page.
    SessionBypass,
}

/// Evaluate the allowance rules; `None` means caching is permitted.
pub fn evaluate(page: &PageRecord, ctx: &RequestContext) -> Option<CacheDenial> {
    let template = &page.template;

    if !template.cacheable() {
        return Some(CacheDenial::NoTtl);
    }

    if ctx.authenticated {
        if !template.cache_for_authenticated {
            return Some(CacheDenial::Authenticated);
        }
        if page.editable {
            return Some(CacheDenial::PageEditor);
        }
    }

    for name in &template.no_cache_query_params {
        if ctx.has_query_param(name) {
            return Some(CacheDenial::QueryParam(name.clone()));
        }
    }

    for name in &template.no_cache_post_params {
        if ctx.has_post_param(name) {
            return Some(CacheDenial::PostParam(name.clone()));
        }
    }

    if ctx.bypasses(page.id) {
        return Some(CacheDenial::SessionBypass);
    }

    None
}

/// Whether this request may use or populate the cache for this page.
pub fn is_allowed(page: &PageRecord, ctx: &RequestContext) -> bool {
    evaluate(page, ctx).is_none()
}

#[cfg(test)]
mod tests {
    use crate::domain::Template;

    use super::*;

    fn cacheable_page(id: u64) -> PageRecord {
        PageRecord::new(id, Template::with_ttl(300))
    }

    #[test]
    fn guest_request_on_cacheable_template_is_allowed() {
        let page = cacheable_page(1);
        let ctx = RequestContext::guest();
        assert!(is_allowed(&page, &ctx));
    }

    #[test]
    fn zero_ttl_denies_everything() {
        let page = PageRecord::new(1, Template::with_ttl(0));
        assert_eq!(
            evaluate(&page, &RequestContext::guest()),
            Some(CacheDenial::NoTtl)
        );
    }

    #[test]
    fn authenticated_denied_unless_template_opts_in() {
        let mut page = cacheable_page(1);
        let ctx = RequestContext {
            authenticated: true,
            ..Default::default()
        };

        assert_eq!(evaluate(&page, &ctx), Some(CacheDenial::Authenticated));

        page.template.cache_for_authenticated = true;
        assert!(is_allowed(&page, &ctx));
    }

    #[test]
    fn page_editor_always_bypasses() {
        // Even with authenticated caching enabled, an editor of this page
        // must not be served from cache.
        let mut page = cacheable_page(1);
        page.template.cache_for_authenticated = true;
        page.editable = true;

        let ctx = RequestContext {
            authenticated: true,
            ..Default::default()
        };
        assert_eq!(evaluate(&page, &ctx), Some(CacheDenial::PageEditor));
    }

    #[test]
    fn editor_flag_is_ignored_for_guests() {
        let mut page = cacheable_page(1);
        page.editable = true;
        assert!(is_allowed(&page, &RequestContext::guest()));
    }

    #[test]
    fn blacklisted_query_param_denies() {
        let mut page = cacheable_page(1);
        page.template.no_cache_query_params = vec!["preview".to_string()];

        let ctx = RequestContext {
            query_params: ["preview".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(
            evaluate(&page, &ctx),
            Some(CacheDenial::QueryParam("preview".to_string()))
        );

        let other = RequestContext {
            query_params: ["sort".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert!(is_allowed(&page, &other));
    }

    #[test]
    fn blacklisted_post_param_denies() {
        let mut page = cacheable_page(1);
        page.template.no_cache_post_params = vec!["comment".to_string()];

        let ctx = RequestContext {
            post_params: ["comment".to_string()].into_iter().collect(),
            ..Default::default()
        };
        assert_eq!(
            evaluate(&page, &ctx),
            Some(CacheDenial::PostParam("comment".to_string()))
        );
    }

    #[test]
    fn session_bypass_denies_only_the_named_page() {
        let page = cacheable_page(5);
        let ctx = RequestContext {
            bypass_page: Some(5),
            ..Default::default()
        };
        assert_eq!(evaluate(&page, &ctx), Some(CacheDenial::SessionBypass));

        let other = cacheable_page(6);
        assert!(is_allowed(&other, &ctx));
    }

    #[test]
    fn rules_short_circuit_in_order() {
        // TTL wins over every later rule.
        let mut page = PageRecord::new(1, Template::with_ttl(0));
        page.template.no_cache_query_params = vec!["preview".to_string()];
        let ctx = RequestContext {
            authenticated: true,
            query_params: ["preview".to_string()].into_iter().collect(),
            bypass_page: Some(1),
            ..Default::default()
        };
        assert_eq!(evaluate(&page, &ctx), Some(CacheDenial::NoTtl));
    }
}
