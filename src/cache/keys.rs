//! Cache key construction.
//!
//! A key is the page identity plus a `variant` string capturing every
//! dimension of output variation: sanitized URL segments, pagination,
//! and a non-default language. The variant doubles as the entry's file
//! name, so sanitization keeps only filesystem-safe characters.
//!
//! Injectivity over the sanitized inputs comes from reserved separators:
//! segments are joined with `+`, the pagination token is prefixed `~`,
//! the language token is prefixed `=`, and all three characters are
//! stripped from segments and language identifiers. No two distinct
//! (segments, page number, language) tuples can therefore produce the
//! same variant.

use crate::domain::PageId;

/// Joins sanitized URL segments within the variant.
const SEGMENT_SEPARATOR: char = '+';
/// Prefixes the `page{N}` pagination token.
const PAGE_SEPARATOR: char = '~';
/// Prefixes the non-default language token.
const LANGUAGE_SEPARATOR: char = '=';

/// Identifies one cached rendering of one page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub page_id: PageId,
    /// Empty for the common unvaried request.
    pub variant: String,
}

impl CacheKey {
    pub fn new(page_id: PageId, variant: impl Into<String>) -> Self {
        Self {
            page_id,
            variant: variant.into(),
        }
    }

    /// Key for a request with no variation at all.
    pub fn bare(page_id: PageId) -> Self {
        Self {
            page_id,
            variant: String::new(),
        }
    }
}

/// Build the cache key for one request.
///
/// Tokens are concatenated in a fixed order (segments, pagination,
/// language) so construction is deterministic. `page_num` is 1-based;
/// page 1 and the default language contribute nothing. Segments that
/// sanitize to the empty string are dropped.
pub fn build_key(
    page_id: PageId,
    url_segments: &[String],
    page_num: u32,
    language_id: Option<&str>,
    language_is_default: bool,
) -> CacheKey {
    let varied = !url_segments.is_empty()
        || page_num > 1
        || (!language_is_default && language_id.is_some());
    if !varied {
        return CacheKey::bare(page_id);
    }

    let mut variant = String::new();

    for segment in url_segments {
        let clean = sanitize_segment(segment);
        if clean.is_empty() {
            continue;
        }
        if !variant.is_empty() {
            variant.push(SEGMENT_SEPARATOR);
        }
        variant.push_str(&clean);
    }

    if page_num > 1 {
        variant.push(PAGE_SEPARATOR);
        variant.push_str("page");
        variant.push_str(&page_num.to_string());
    }

    if !language_is_default {
        if let Some(language) = language_id {
            let clean = sanitize_segment(language);
            if !clean.is_empty() {
                variant.push(LANGUAGE_SEPARATOR);
                variant.push_str(&clean);
            }
        }
    }

    CacheKey::new(page_id, variant)
}

/// Strip everything unsafe for filesystem or key use from one segment.
///
/// Keeps ASCII alphanumerics, `-`, `_` and `.`; everything else, including
/// the three reserved separator characters, is dropped.
pub fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect()
}
