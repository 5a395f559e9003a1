//! Dispatch configuration

use serde::Deserialize;

use crate::error::NotifyError;

fn default_chunk_size() -> usize {
    100
}

fn default_max_chunk_size() -> usize {
    500
}

/// Configuration for the bulk dispatch engine
///
/// The default chunk size matches the outbound provider's per-call limit;
/// requests may ask for smaller chunks but are capped at `max_chunk_size`.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Chunk size used when a request does not specify one
    #[serde(default = "default_chunk_size")]
    pub default_chunk_size: usize,
    /// Hard upper bound on any requested chunk size
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: default_chunk_size(),
            max_chunk_size: default_max_chunk_size(),
        }
    }
}

impl DispatchConfig {
    /// Loads configuration from `DISPATCH_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("DISPATCH"))
            .build()?
            .try_deserialize()
    }

    /// Checks internal consistency
    pub fn validate(&self) -> Result<(), NotifyError> {
        if self.default_chunk_size == 0 {
            return Err(NotifyError::configuration(
                "default chunk size must be at least 1",
            ));
        }
        if self.max_chunk_size < self.default_chunk_size {
            return Err(NotifyError::configuration(format!(
                "max chunk size {} is below default chunk size {}",
                self.max_chunk_size, self.default_chunk_size
            )));
        }
        Ok(())
    }
}
