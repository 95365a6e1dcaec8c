//! Thin maintenance utilities for administrative tooling.
//!
//! The admin layer owns presentation and bulk-clear UX; these helpers keep
//! it out of the store's on-disk layout.

use tracing::info;

use super::error::CacheError;
use super::store::FsCacheStore;

/// Number of pages with at least one cached variant.
pub fn count_cached_pages(store: &FsCacheStore) -> Result<usize, CacheError> {
    store.cached_page_count()
}

/// Flush the entire cache.
pub fn clear_all(store: &FsCacheStore) -> Result<(), CacheError> {
    store.expire_all()?;
    info!("Cache cleared by maintenance request");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cache::config::CacheConfig;
    use crate::cache::keys::CacheKey;

    use super::*;

    #[test]
    fn count_and_clear() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = CacheConfig {
            root: dir.path().join("pages"),
            ..Default::default()
        };
        let store = FsCacheStore::open(&config).expect("open store");

        assert_eq!(count_cached_pages(&store).expect("count"), 0);

        store.put(&CacheKey::bare(1), b"a").expect("put");
        store.put(&CacheKey::new(1, "x"), b"b").expect("put");
        store.put(&CacheKey::bare(2), b"c").expect("put");
        assert_eq!(count_cached_pages(&store).expect("count"), 2);

        clear_all(&store).expect("clear");
        assert_eq!(count_cached_pages(&store).expect("count"), 0);
    }
}
