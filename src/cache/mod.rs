//! Foglio render cache.
//!
//! Caches rendered page output on disk, one namespace per page, one entry
//! per variation (URL segments, pagination, language). Entries expire by
//! age against the template's current TTL and are purged on content
//! mutation according to the template's invalidation scope.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `foglio.toml` (and `FOGLIO_*`
//! environment overrides):
//!
//! ```toml
//! [cache]
//! enabled = true
//! root = "cache/pages"
//! dir_mode = 0o755
//! ```

pub mod deps;
pub mod policy;

mod config;
mod context;
mod error;
mod invalidate;
mod keys;
mod maintenance;
mod render;
mod store;

pub use config::CacheConfig;
pub use context::RequestContext;
pub use error::CacheError;
pub use invalidate::InvalidationCoordinator;
pub use keys::{CacheKey, build_key, sanitize_segment};
pub use maintenance::{clear_all, count_cached_pages};
pub use policy::CacheDenial;
pub use render::RenderOrchestrator;
pub use store::FsCacheStore;
