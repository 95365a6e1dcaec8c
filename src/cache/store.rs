//! Filesystem-backed cache storage.
//!
//! One directory per page under the configured root, one file per variant.
//! Each entry is a 16-byte header (creation timestamp and payload length,
//! both little-endian `u64`) followed by the payload. The header records
//! creation time explicitly so TTL is always evaluated against the true
//! write time, even when the template's TTL changes afterwards.
//!
//! Writes go through a temporary file in the target directory and land via
//! rename, so a concurrent reader never observes a partial entry and a
//! cancelled write never becomes visible.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::domain::PageId;

use super::config::CacheConfig;
use super::error::CacheError;
use super::keys::CacheKey;

const ENTRY_EXTENSION: &str = "cache";
/// File stem used when the variant is empty (the common unvaried request).
/// A lone `~` is unreachable from the variant grammar: sanitization strips
/// it from segments and language identifiers, and the pagination token is
/// always `~page{N}`. No non-empty variant can therefore collide with the
/// bare entry's file name.
const BARE_VARIANT_STEM: &str = "~";
const HEADER_LEN: usize = 16;

/// Filesystem-backed store for rendered page output.
///
/// The store exclusively owns the on-disk layout under its root; no other
/// component writes into the cache namespace.
pub struct FsCacheStore {
    root: PathBuf,
    dir_mode: u32,
}

impl FsCacheStore {
    /// Open the store, creating the root directory if needed.
    ///
    /// An unusable root is a configuration error: fatal for caching, never
    /// for rendering. Callers degrade to running without a cache.
    pub fn open(config: &CacheConfig) -> Result<Self, CacheError> {
        let store = Self {
            root: config.root.clone(),
            dir_mode: config.dir_mode,
        };
        store.create_dir(&config.root).map_err(|error| {
            CacheError::configuration(format!(
                "cache root {} is not usable: {error}",
                config.root.display()
            ))
        })?;
        Ok(store)
    }

    /// Fetch an entry, enforcing the template's current TTL.
    ///
    /// Returns `None` when the entry is absent, older than `ttl`, corrupt,
    /// or unreadable: on the read path availability wins over caching, so
    /// storage errors degrade to a miss. Expired and corrupt entries are
    /// deleted best-effort.
    pub fn get(&self, key: &CacheKey, ttl: Duration) -> Option<Bytes> {
        let path = self.entry_path(key);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return None,
            Err(error) => {
                warn!(
                    page_id = key.page_id,
                    variant = %key.variant,
                    %error,
                    "Cache read failed, treating as miss"
                );
                return None;
            }
        };

        let (created_at, payload) = match decode_entry(&raw) {
            Some(decoded) => decoded,
            None => {
                warn!(
                    page_id = key.page_id,
                    variant = %key.variant,
                    "Corrupt cache entry, removing"
                );
                self.remove_quietly(&path);
                return None;
            }
        };

        let age = OffsetDateTime::now_utc().unix_timestamp() - created_at;
        if age < 0 || age as u64 >= ttl.as_secs() {
            debug!(
                page_id = key.page_id,
                variant = %key.variant,
                age,
                ttl_secs = ttl.as_secs(),
                "Cache entry expired"
            );
            self.remove_quietly(&path);
            return None;
        }

        Some(Bytes::copy_from_slice(payload))
    }

    /// Store a payload atomically, creating the page directory lazily.
    pub fn put(&self, key: &CacheKey, payload: &[u8]) -> Result<(), CacheError> {
        self.put_with_created_at(key, payload, OffsetDateTime::now_utc().unix_timestamp())
    }

    pub(crate) fn put_with_created_at(
        &self,
        key: &CacheKey,
        payload: &[u8],
        created_at: i64,
    ) -> Result<(), CacheError> {
        let dir = self.page_dir(key.page_id);
        self.create_dir(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&encode_header(created_at, payload.len() as u64))?;
        tmp.write_all(payload)?;
        tmp.flush()?;
        tmp.persist(self.entry_path(key))
            .map_err(|error| CacheError::Io(error.error))?;

        debug!(
            page_id = key.page_id,
            variant = %key.variant,
            bytes = payload.len(),
            "Cache entry stored"
        );
        Ok(())
    }

    /// Delete one entry; absence is not an error.
    pub fn remove(&self, key: &CacheKey) -> Result<(), CacheError> {
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    /// Delete every cached variant under one page's namespace.
    pub fn remove_all_for_page(&self, page_id: PageId) -> Result<(), CacheError> {
        match fs::remove_dir_all(self.page_dir(page_id)) {
            Ok(()) => {
                debug!(page_id, "Removed all cached variants");
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    /// Delete every entry across every page namespace (site-wide flush).
    pub fn expire_all(&self) -> Result<(), CacheError> {
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(entry.path())?;
            }
        }
        debug!(root = %self.root.display(), "Expired all cache entries");
        Ok(())
    }

    /// Existence probe without reading or TTL-checking the payload.
    pub fn exists(&self, key: &CacheKey) -> bool {
        self.entry_path(key).is_file()
    }

    /// Number of pages that currently have at least one cached variant.
    ///
    /// Entry removal leaves the page directory behind, so an empty
    /// directory does not count as a cached page.
    pub fn cached_page_count(&self) -> Result<usize, CacheError> {
        let mut count = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() && has_entries(&entry.path())? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn page_dir(&self, page_id: PageId) -> PathBuf {
        self.root.join(page_id.to_string())
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        let stem = if key.variant.is_empty() {
            BARE_VARIANT_STEM
        } else {
            key.variant.as_str()
        };
        self.page_dir(key.page_id)
            .join(format!("{stem}.{ENTRY_EXTENSION}"))
    }

    fn create_dir(&self, dir: &Path) -> Result<(), CacheError> {
        if dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir, fs::Permissions::from_mode(self.dir_mode))?;
        }
        Ok(())
    }

    fn remove_quietly(&self, path: &Path) {
        if let Err(error) = fs::remove_file(path) {
            if error.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), %error, "Failed to remove cache entry");
            }
        }
    }
}

fn has_entries(dir: &Path) -> Result<bool, CacheError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn encode_header(created_at: i64, payload_len: u64) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..8].copy_from_slice(&(created_at as u64).to_le_bytes());
    header[8..].copy_from_slice(&payload_len.to_le_bytes());
    header
}

/// Split a raw entry into creation timestamp and payload.
///
/// Returns `None` for short or length-mismatched files; both indicate a
/// partial or mangled write and must never be served.
fn decode_entry(raw: &[u8]) -> Option<(i64, &[u8])> {
    if raw.len() < HEADER_LEN {
        return None;
    }
    let created_at = u64::from_le_bytes(raw[..8].try_into().ok()?) as i64;
    let payload_len = u64::from_le_bytes(raw[8..HEADER_LEN].try_into().ok()?);
    let payload = &raw[HEADER_LEN..];
    if payload.len() as u64 != payload_len {
        return None;
    }
    Some((created_at, payload))
}
