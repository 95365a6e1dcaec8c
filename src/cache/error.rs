use thiserror::Error;

/// Failures internal to the cache subsystem.
///
/// None of these are fatal for rendering: callers log them and fall back to
/// rendering without a cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache configuration error: {message}")]
    Configuration { message: String },
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
