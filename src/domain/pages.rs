//! Page and template records consumed by the render cache.
//!
//! The content tree itself lives outside this crate; these types are
//! read-only snapshots handed in by the host application. `PageRecord`
//! carries the requester-resolved `editable`/`viewable` flags so the cache
//! layer never has to reach into a permission system.

use serde::Deserialize;

/// Stable integer identity of a page in the content tree.
pub type PageId = u64;

/// Publish state of a page, as reported by the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    Published,
    Unpublished,
    Trashed,
}

/// Which pages' cache entries are purged when a page mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationScope {
    /// No cascade on save; downgraded to `ThisPage` semantics on delete.
    None,
    /// Remove only the mutated page's own variants.
    #[default]
    ThisPage,
    /// Flush every cached page on the site.
    SiteWide,
    /// Remove the mutated page's ancestors (each with a positive TTL).
    Ancestors,
    /// Remove a template-configured list of target pages.
    ExplicitList,
}

/// Cache-relevant template metadata attached to a page.
///
/// A TTL of zero disables caching for every page using the template.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Template {
    /// Maximum servable entry age, in seconds. Zero disables caching.
    pub cache_ttl: u64,
    /// Allow cached output to be served to authenticated requesters.
    pub cache_for_authenticated: bool,
    /// Query-parameter names that disable caching when present.
    pub no_cache_query_params: Vec<String>,
    /// Form-parameter names that disable caching when present.
    pub no_cache_post_params: Vec<String>,
    /// Cascade policy applied when a page using this template mutates.
    pub invalidation_scope: InvalidationScope,
    /// Target page IDs, consulted only for `InvalidationScope::ExplicitList`.
    pub invalidation_targets: Vec<PageId>,
}

impl Template {
    /// Whether this template caches at all.
    pub fn cacheable(&self) -> bool {
        self.cache_ttl > 0
    }

    pub fn with_ttl(cache_ttl: u64) -> Self {
        Self {
            cache_ttl,
            ..Default::default()
        }
    }
}

/// Read-only snapshot of a page as seen by the cache layer.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: PageId,
    pub template: Template,
    pub status: PageStatus,
    /// Whether the current requester has edit rights on this page.
    pub editable: bool,
    /// Whether the current requester may view this page at all.
    pub viewable: bool,
}

impl PageRecord {
    /// A published, viewable, non-editable page. Callers adjust the flags
    /// for the requester at hand.
    pub fn new(id: PageId, template: Template) -> Self {
        Self {
            id,
            template,
            status: PageStatus::Published,
            editable: false,
            viewable: true,
        }
    }
}
