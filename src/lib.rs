//! Foglio: a filesystem-backed render cache for hierarchical content pages.
//!
//! Foglio caches the rendered output of pages on disk, keyed by page identity
//! plus request-specific variation (URL segments, pagination, language), and
//! invalidates entries when content mutates. Invalidation cascades according
//! to a per-template scope: nothing, this page only, the whole site, the
//! ancestor chain, or an explicit page list.
//!
//! The crate exposes two entry points to its host application:
//!
//! - [`cache::RenderOrchestrator::render`], called once per page-view request;
//! - [`cache::InvalidationCoordinator`] (`on_page_saved` / `on_page_deleted`),
//!   called by the content-mutation pipeline after a successful save/delete.
//!
//! Everything else (the content tree, the template renderer, request/session
//! inspection) is consumed through the traits in [`cache::deps`].

pub mod cache;
pub mod domain;
