//! Collaborator seams.
//!
//! The cache core never queries the content tree or runs templates itself;
//! it consumes both through these traits. Hosts back them with whatever
//! storage and template engine they use.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{PageId, PageRecord, RenderError};

use super::context::RequestContext;

/// Read-only view of the hierarchical content tree.
#[async_trait]
pub trait ContentTree: Send + Sync {
    /// The page's ancestor chain, nearest parent first.
    async fn ancestors_of(&self, page: &PageRecord) -> Vec<PageRecord>;

    /// Resolve page IDs to records. IDs that no longer exist are simply
    /// omitted; resolution never fails the caller.
    async fn resolve_pages(&self, ids: &[PageId]) -> Vec<PageRecord>;
}

/// The external template/output renderer.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Produce the rendered payload for a page.
    ///
    /// May fail with [`RenderError::NotViewable`] when the page fails its
    /// visibility check at render time.
    async fn render_output(
        &self,
        page: &PageRecord,
        ctx: &RequestContext,
    ) -> Result<Bytes, RenderError>;
}
