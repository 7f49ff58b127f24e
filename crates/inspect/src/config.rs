use peek_render::RenderLimits;
use peek_source_meta::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the default docstring page size
pub const PAGE_SIZE_ENV: &str = "PEEK_PAGE_SIZE";

/// Default number of docstring lines per page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Configuration for a [`Registry`](crate::Registry)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    /// Where Python modules are looked up
    pub provider: ProviderConfig,

    /// Output caps shared by all renderers
    pub limits: RenderLimits,

    /// Lines per docstring page when the caller does not choose
    pub page_size: usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            limits: RenderLimits::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl InspectConfig {
    /// Configuration from `PEEK_PATH`/`PYTHONPATH`/`PEEK_PYTHON` and `PEEK_PAGE_SIZE`
    pub fn from_env() -> Self {
        let page_size = match env::var(PAGE_SIZE_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    log::warn!("Ignoring invalid {PAGE_SIZE_ENV}={raw:?}");
                    DEFAULT_PAGE_SIZE
                }
            },
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        Self {
            provider: ProviderConfig::from_env(),
            limits: RenderLimits::default(),
            page_size,
        }
    }

    /// Builder: search `path` before every other root
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.provider = self.provider.with_search_path(path);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.provider.validate()?;
        self.limits.validate()?;

        if self.page_size == 0 {
            return Err("page_size must be > 0".to_string());
        }

        Ok(())
    }
}
