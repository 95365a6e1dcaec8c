use thiserror::Error;

use super::pages::PageId;

/// Failures raised by the external render collaborator.
///
/// These are the only failures that propagate to the request caller; cache
/// storage failures degrade to "render without caching" instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page {page_id} is not viewable by the current requester")]
    NotViewable { page_id: PageId },
    #[error("rendering page {page_id} failed: {message}")]
    Failed { page_id: PageId, message: String },
}

impl RenderError {
    pub fn not_viewable(page_id: PageId) -> Self {
        Self::NotViewable { page_id }
    }

    pub fn failed(page_id: PageId, message: impl Into<String>) -> Self {
        Self::Failed {
            page_id,
            message: message.into(),
        }
    }
}
