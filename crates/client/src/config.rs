use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the backend services live and how long to wait for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
	/// Base URL every endpoint path is appended to.
	pub base_url: String,
	/// Per-request timeout in seconds.
	pub timeout_secs: u64,
}

impl Default for EndpointConfig {
	fn default() -> Self {
		Self {
			base_url: "http://127.0.0.1:8000/api".to_owned(),
			timeout_secs: 10,
		}
	}
}

impl EndpointConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}
