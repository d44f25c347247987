//! User-authored highlights anchored to character offsets.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use marginalia_primitives::{AnnotationId, CharIdx, OffsetSpan, ResourceId, UserId};
use serde::{Deserialize, Serialize};

/// Highlight color used when the user does not pick one.
pub const DEFAULT_ANNOTATION_COLOR: &str = "#facc15";

/// A user-authored highlight over a range of a resource's text.
///
/// Offsets are fixed at creation. `highlighted_text` is a snapshot and is not
/// re-validated when the resource content changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
	pub id: AnnotationId,
	pub resource_id: ResourceId,
	pub user_id: UserId,
	pub start_offset: CharIdx,
	pub end_offset: CharIdx,
	#[serde(default)]
	pub highlighted_text: String,
	#[serde(default)]
	pub note: Option<String>,
	#[serde(default)]
	pub tags: BTreeSet<String>,
	#[serde(default = "default_color")]
	pub color: String,
	#[serde(default)]
	pub is_shared: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
	DEFAULT_ANNOTATION_COLOR.to_owned()
}

impl Annotation {
	/// Inclusive offset span covered by this annotation.
	pub fn span(&self) -> OffsetSpan {
		OffsetSpan::new(self.start_offset, self.end_offset)
	}

	/// Applies an edit in place. Offsets are never touched.
	pub fn apply_patch(&mut self, patch: &AnnotationPatch, now: DateTime<Utc>) {
		if let Some(note) = &patch.note {
			self.note = if note.trim().is_empty() { None } else { Some(note.clone()) };
		}
		if let Some(tags) = &patch.tags {
			self.tags = tags.clone();
		}
		if let Some(color) = &patch.color {
			self.color = color.clone();
		}
		self.updated_at = now;
	}
}

/// Payload for creating an annotation from a text selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnnotation {
	pub resource_id: ResourceId,
	pub user_id: UserId,
	pub start_offset: CharIdx,
	pub end_offset: CharIdx,
	pub highlighted_text: String,
	pub note: Option<String>,
	pub tags: BTreeSet<String>,
	pub color: String,
	pub is_shared: bool,
}

impl NewAnnotation {
	/// Starts a creation payload for the selected span, with default color and no note.
	pub fn new(resource_id: ResourceId, user_id: UserId, span: OffsetSpan, highlighted_text: impl Into<String>) -> Self {
		Self {
			resource_id,
			user_id,
			start_offset: span.start,
			end_offset: span.end,
			highlighted_text: highlighted_text.into(),
			note: None,
			tags: BTreeSet::new(),
			color: default_color(),
			is_shared: false,
		}
	}

	pub fn with_note(mut self, note: impl Into<String>) -> Self {
		self.note = Some(note.into());
		self
	}

	pub fn with_tags<I, S>(mut self, tags: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tags = tags.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = color.into();
		self
	}

	/// Materializes a locally-visible annotation under a provisional id.
	pub fn provisional(&self, id: AnnotationId, now: DateTime<Utc>) -> Annotation {
		Annotation {
			id,
			resource_id: self.resource_id.clone(),
			user_id: self.user_id.clone(),
			start_offset: self.start_offset,
			end_offset: self.end_offset,
			highlighted_text: self.highlighted_text.clone(),
			note: self.note.clone(),
			tags: self.tags.clone(),
			color: self.color.clone(),
			is_shared: self.is_shared,
			created_at: now,
			updated_at: now,
		}
	}
}

/// Editable fields of an annotation. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPatch {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub note: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tags: Option<BTreeSet<String>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}
