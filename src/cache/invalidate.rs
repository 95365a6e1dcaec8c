//! Invalidation coordinator.
//!
//! Invoked by the content-mutation pipeline after a successful save or
//! delete. Resolves the template's invalidation scope into a set of pages
//! to purge, then unconditionally removes the mutated page's own variants:
//! the cascade covers other pages whose cached output might embed this
//! page's data, while self-removal guarantees the mutated page never
//! serves stale content regardless of the configured scope.
//!
//! Store failures are logged and never abort the pass; invalidation is
//! best-effort and the TTL ceiling recovers anything it misses.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{InvalidationScope, PageRecord};

use super::config::CacheConfig;
use super::deps::ContentTree;
use super::store::FsCacheStore;

/// What kind of mutation triggered the pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Saved,
    Deleted,
}

/// Purges cache entries in response to content mutation events.
pub struct InvalidationCoordinator {
    config: CacheConfig,
    store: Arc<FsCacheStore>,
    tree: Arc<dyn ContentTree>,
}

impl InvalidationCoordinator {
    pub fn new(config: CacheConfig, store: Arc<FsCacheStore>, tree: Arc<dyn ContentTree>) -> Self {
        Self {
            config,
            store,
            tree,
        }
    }

    /// Entry point for the mutation pipeline: a page was saved.
    pub async fn on_page_saved(&self, page: &PageRecord) {
        self.apply(page, Mutation::Saved).await;
    }

    /// Entry point for the mutation pipeline: a page was deleted.
    pub async fn on_page_deleted(&self, page: &PageRecord) {
        self.apply(page, Mutation::Deleted).await;
    }

    async fn apply(&self, page: &PageRecord, mutation: Mutation) {
        if !self.config.is_enabled() {
            debug!(page_id = page.id, "Invalidation skipped: cache disabled");
            return;
        }

        // A template that never caches has no entries to remove.
        if !page.template.cacheable() {
            return;
        }

        let scope = page.template.invalidation_scope;

        // Scope None suppresses everything on save, but a deleted page's
        // own cache must never survive, so delete downgrades to this-page
        // semantics.
        if scope == InvalidationScope::None && mutation == Mutation::Saved {
            return;
        }

        info!(
            page_id = page.id,
            scope = ?scope,
            mutation = ?mutation,
            "Invalidating cache"
        );

        match scope {
            InvalidationScope::SiteWide => {
                // The flush already covers the page itself.
                if let Err(error) = self.store.expire_all() {
                    warn!(page_id = page.id, %error, "Site-wide cache flush failed");
                }
                return;
            }
            InvalidationScope::Ancestors => {
                for ancestor in self.tree.ancestors_of(page).await {
                    if ancestor.template.cacheable() {
                        self.remove_page(&ancestor);
                    }
                }
            }
            InvalidationScope::ExplicitList => {
                // resolve_pages drops IDs that no longer exist; a stale
                // target never aborts the rest of the list.
                let targets = &page.template.invalidation_targets;
                for target in self.tree.resolve_pages(targets).await {
                    if target.template.cacheable() {
                        self.remove_page(&target);
                    }
                }
            }
            InvalidationScope::None | InvalidationScope::ThisPage => {}
        }

        self.remove_page(page);
    }

    fn remove_page(&self, page: &PageRecord) {
        if let Err(error) = self.store.remove_all_for_page(page.id) {
            warn!(page_id = page.id, %error, "Cache removal failed");
        }
    }
}
