//! Domain layer types and invariants.

pub mod error;
pub mod pages;

pub use error::RenderError;
pub use pages::{InvalidationScope, PageId, PageRecord, PageStatus, Template};
