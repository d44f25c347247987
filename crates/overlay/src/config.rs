//! Engine configuration.
//!
//! ```toml
//! fetch_debounce_ms = 300
//! hover_debounce_ms = 300
//! cache_capacity = 32
//! fallback_chunk_lines = 50
//!
//! [endpoint]
//! base_url = "https://example.org/api"
//! timeout_secs = 10
//! ```
//!
//! Every key is optional.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use marginalia_client::EndpointConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
	/// Quiescence window before a scroll-triggered fetch fires.
	pub fetch_debounce_ms: u64,
	/// Quiescence window before a hover lookup fires.
	pub hover_debounce_ms: u64,
	/// Resources whose fetched data is retained.
	pub cache_capacity: usize,
	/// Lines per synthetic chunk when chunk data is unavailable.
	pub fallback_chunk_lines: u32,
	pub endpoint: EndpointConfig,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			fetch_debounce_ms: 300,
			hover_debounce_ms: 300,
			cache_capacity: 32,
			fallback_chunk_lines: 50,
			endpoint: EndpointConfig::default(),
		}
	}
}

impl EngineConfig {
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	pub fn fetch_debounce(&self) -> Duration {
		Duration::from_millis(self.fetch_debounce_ms)
	}

	pub fn hover_debounce(&self) -> Duration {
		Duration::from_millis(self.hover_debounce_ms)
	}

	/// Cache capacity, never zero.
	pub fn cache_capacity(&self) -> NonZeroUsize {
		NonZeroUsize::new(self.cache_capacity).unwrap_or(NonZeroUsize::MIN)
	}

	/// Fallback window size, never zero.
	pub fn fallback_chunk_lines(&self) -> u32 {
		self.fallback_chunk_lines.max(1)
	}
}
