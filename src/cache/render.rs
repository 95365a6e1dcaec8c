//! Render orchestrator.
//!
//! The single entry point on the page-view path: check allowance, try the
//! store, fall back to the external renderer, and store the result. Cache
//! failures never fail the request; only the renderer's own errors (such
//! as a visibility denial) propagate.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::domain::{PageRecord, RenderError};

use super::config::CacheConfig;
use super::context::RequestContext;
use super::deps::Renderer;
use super::keys::build_key;
use super::policy;
use super::store::FsCacheStore;

/// Serves page renders through the cache.
pub struct RenderOrchestrator {
    config: CacheConfig,
    store: Arc<FsCacheStore>,
    renderer: Arc<dyn Renderer>,
}

impl RenderOrchestrator {
    pub fn new(config: CacheConfig, store: Arc<FsCacheStore>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            config,
            store,
            renderer,
        }
    }

    /// Produce the rendered output for one page-view request.
    ///
    /// `force_rebuild` skips the read path but still stores the fresh
    /// render when caching is allowed.
    pub async fn render(
        &self,
        page: &PageRecord,
        ctx: &RequestContext,
        force_rebuild: bool,
    ) -> Result<Bytes, RenderError> {
        // Visibility is a hard denial and must precede any cache
        // interaction: a page that became non-viewable must not be served
        // from an old entry.
        if !page.viewable {
            return Err(RenderError::not_viewable(page.id));
        }

        let allowed = if self.config.is_enabled() {
            match policy::evaluate(page, ctx) {
                None => true,
                Some(denial) => {
                    debug!(page_id = page.id, denial = ?denial, "Cache bypassed");
                    false
                }
            }
        } else {
            false
        };

        if !allowed {
            return self.renderer.render_output(page, ctx).await;
        }

        let key = build_key(
            page.id,
            &ctx.url_segments,
            ctx.page_num,
            ctx.language_id.as_deref(),
            ctx.language_is_default,
        );
        let ttl = Duration::from_secs(page.template.cache_ttl);

        if !force_rebuild {
            if let Some(payload) = self.store.get(&key, ttl) {
                debug!(page_id = page.id, variant = %key.variant, "Cache hit");
                return Ok(payload);
            }
        }

        let payload = self.renderer.render_output(page, ctx).await?;

        // Empty output is returned but never cached.
        if !payload.is_empty() {
            if let Err(error) = self.store.put(&key, &payload) {
                warn!(
                    page_id = page.id,
                    variant = %key.variant,
                    %error,
                    "Cache write failed, serving uncached render"
                );
            }
        }

        Ok(payload)
    }
}
