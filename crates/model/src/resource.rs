use marginalia_primitives::ResourceId;
use serde::{Deserialize, Serialize};

/// File metadata shown alongside the read-only fallback view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeta {
	pub id: ResourceId,
	pub name: String,
	#[serde(default)]
	pub language: Option<String>,
	#[serde(default)]
	pub size_bytes: u64,
}
