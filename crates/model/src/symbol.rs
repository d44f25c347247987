//! Hover enrichment payloads.

use serde::{Deserialize, Serialize};

/// Natural-language summary of a symbol and its relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSummary {
	pub name: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default)]
	pub connections: Vec<Connection>,
}

/// A related symbol, e.g. a caller or an implemented interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
	pub name: String,
	#[serde(rename = "type", default)]
	pub kind: String,
	#[serde(default)]
	pub relationship: String,
	#[serde(default)]
	pub file: String,
}
