//! System-extracted citations anchored to a single source line.

use chrono::{DateTime, Utc};
use marginalia_primitives::{LineNumber, ReferenceId, ResourceId};
use serde::{Deserialize, Serialize};

/// Kind of material a reference points at. Unknown kinds read as `External`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ReferenceType {
	Paper,
	Documentation,
	External,
}

impl From<String> for ReferenceType {
	fn from(value: String) -> Self {
		match value.to_ascii_lowercase().as_str() {
			"paper" => Self::Paper,
			"documentation" => Self::Documentation,
			_ => Self::External,
		}
	}
}

impl ReferenceType {
	/// Gutter glyph class for this kind of reference.
	pub fn icon_class(self) -> &'static str {
		match self {
			Self::Paper => "reference-icon-paper",
			Self::Documentation => "reference-icon-documentation",
			Self::External => "reference-icon-external",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
	pub id: ReferenceId,
	pub resource_id: ResourceId,
	/// 1-based source line the reference is anchored to.
	pub line_number: LineNumber,
	#[serde(rename = "type")]
	pub reference_type: ReferenceType,
	pub title: String,
	#[serde(default)]
	pub authors: Option<Vec<String>>,
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub library_item_id: Option<String>,
	#[serde(default)]
	pub citation: Option<String>,
	pub created_at: DateTime<Utc>,
}

impl Reference {
	/// One-line hover text: title, then authors when known.
	pub fn summary(&self) -> String {
		match self.authors.as_deref() {
			Some(authors) if !authors.is_empty() => format!("{} ({})", self.title, authors.join(", ")),
			_ => self.title.clone(),
		}
	}
}
