//! Server-computed semantic code units.

use marginalia_primitives::{ChunkId, LineNumber, LineSpan, ResourceId};
use serde::{Deserialize, Serialize};

/// One semantically meaningful code unit (function, class, ...) of a resource.
///
/// Chunks may nest. They are produced server-side and never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticChunk {
	pub id: ChunkId,
	pub resource_id: ResourceId,
	#[serde(default)]
	pub content: String,
	/// 0-based ordinal, stable within a resource.
	pub chunk_index: u32,
	pub chunk_metadata: ChunkMetadata,
}

impl SemanticChunk {
	/// Inclusive line span of the chunk.
	pub fn lines(&self) -> LineSpan {
		self.chunk_metadata.lines()
	}

	pub fn display_label(&self) -> String {
		self.chunk_metadata.display_label()
	}
}

/// Position and naming metadata attached to a chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
	pub start_line: LineNumber,
	pub end_line: LineNumber,
	#[serde(default)]
	pub function_name: Option<String>,
	#[serde(default)]
	pub class_name: Option<String>,
	#[serde(default)]
	pub language: String,
}

/// What a chunk is named after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSymbol<'a> {
	Function(&'a str),
	Class(&'a str),
	Unknown,
}

fn present(name: &Option<String>) -> Option<&str> {
	name.as_deref().map(str::trim).filter(|n| !n.is_empty())
}

impl ChunkMetadata {
	/// Inclusive line span; reversed bounds are normalized.
	pub fn lines(&self) -> LineSpan {
		LineSpan::new(self.start_line, self.end_line)
	}

	/// Resolves the naming fields. Blank names count as absent and a function
	/// name takes precedence when a record carries both.
	pub fn symbol(&self) -> ChunkSymbol<'_> {
		match (present(&self.function_name), present(&self.class_name)) {
			(Some(name), _) => ChunkSymbol::Function(name),
			(None, Some(name)) => ChunkSymbol::Class(name),
			(None, None) => ChunkSymbol::Unknown,
		}
	}

	pub fn display_label(&self) -> String {
		match self.symbol() {
			ChunkSymbol::Function(name) => format!("fn {name}"),
			ChunkSymbol::Class(name) => format!("class {name}"),
			ChunkSymbol::Unknown => "Unknown".to_owned(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn meta(function_name: Option<&str>, class_name: Option<&str>) -> ChunkMetadata {
		ChunkMetadata {
			start_line: 1,
			end_line: 4,
			function_name: function_name.map(Into::into),
			class_name: class_name.map(Into::into),
			language: "python".into(),
		}
	}

	#[test]
	fn label_prefers_function_then_class_then_unknown() {
		assert_eq!(meta(Some("parse"), None).display_label(), "fn parse");
		assert_eq!(meta(None, Some("Lexer")).display_label(), "class Lexer");
		assert_eq!(meta(None, None).display_label(), "Unknown");
		assert_eq!(meta(Some("parse"), Some("Lexer")).display_label(), "fn parse");
	}

	#[test]
	fn blank_names_are_absent() {
		assert_eq!(meta(Some(" "), Some("")).symbol(), ChunkSymbol::Unknown);
	}

	#[test]
	fn metadata_without_names_deserializes() {
		let json = r#"{"start_line": 10, "end_line": 15}"#;
		let meta: ChunkMetadata = serde_json::from_str(json).unwrap();
		assert_eq!(meta.symbol(), ChunkSymbol::Unknown);
		assert_eq!(meta.lines(), LineSpan::new(10, 15));
	}
}
