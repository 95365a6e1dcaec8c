//! Cache configuration.
//!
//! Controls the on-disk render cache via `foglio.toml`, with `FOGLIO_*`
//! environment variables layered on top.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use super::error::CacheError;

const DEFAULT_ROOT: &str = "cache/pages";
const DEFAULT_DIR_MODE: u32 = 0o755;
const ENV_PREFIX: &str = "FOGLIO";

/// Cache configuration from `foglio.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Master switch; when false the whole subsystem is a pass-through.
    pub enabled: bool,
    /// Root directory holding one subdirectory per cached page.
    pub root: PathBuf,
    /// Permission bits applied to created cache directories (unix only).
    pub dir_mode: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: PathBuf::from(DEFAULT_ROOT),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

impl CacheConfig {
    /// Returns true if the render cache is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Load configuration with layered precedence: defaults, then an
    /// optional TOML file, then `FOGLIO_CACHE__*` environment variables
    /// (e.g. `FOGLIO_CACHE__ROOT=/var/cache/foglio`).
    pub fn load(file: Option<&Path>) -> Result<Self, CacheError> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|error| CacheError::configuration(error.to_string()))?;

        // The [cache] table is optional; absent means all defaults.
        match settings.get::<Self>("cache") {
            Ok(config) => Ok(config),
            Err(config::ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(error) => Err(CacheError::configuration(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.root, PathBuf::from("cache/pages"));
        assert_eq!(config.dir_mode, 0o755);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let config = CacheConfig::load(None).expect("load defaults");
        assert!(config.is_enabled());
        assert_eq!(config.root, PathBuf::from("cache/pages"));
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("foglio.toml");
        let mut file = std::fs::File::create(&path).expect("create config file");
        writeln!(
            file,
            "[cache]\nenabled = false\nroot = \"/tmp/render-cache\"\ndir_mode = 0o700"
        )
        .expect("write config file");

        let config = CacheConfig::load(Some(&path)).expect("load config");
        assert!(!config.is_enabled());
        assert_eq!(config.root, PathBuf::from("/tmp/render-cache"));
        assert_eq!(config.dir_mode, 0o700);
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let result = CacheConfig::load(Some(Path::new("/nonexistent/foglio.toml")));
        assert!(matches!(result, Err(CacheError::Configuration { .. })));
    }
}
