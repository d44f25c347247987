use std::num::NonZeroUsize;

use lru::LruCache;
use marginalia_model::{Annotation, QualityDetails, Reference, SemanticChunk};
use marginalia_primitives::ResourceId;

use super::edits::EditLog;
use super::{DataKind, Payload};

/// Everything fetched for one resource. `None` means never fetched.
///
/// Local annotation edits live in `edits`, outside the fetched list, so
/// having an entry or outstanding edits never counts as having data.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResourceData {
	pub annotations: Option<Vec<Annotation>>,
	pub chunks: Option<Vec<SemanticChunk>>,
	pub quality: Option<QualityDetails>,
	pub references: Option<Vec<Reference>>,
	pub edits: EditLog,
	/// Fetched annotations with `edits` replayed; `None` while the log is empty.
	visible: Option<Vec<Annotation>>,
}

impl ResourceData {
	pub fn has(&self, kind: DataKind) -> bool {
		match kind {
			DataKind::Annotations => self.annotations.is_some(),
			DataKind::Chunks => self.chunks.is_some(),
			DataKind::Quality => self.quality.is_some(),
			DataKind::References => self.references.is_some(),
		}
	}

	/// Annotations as displayed: fetched records plus local edits.
	pub fn visible_annotations(&self) -> &[Annotation] {
		self.visible
			.as_deref()
			.or(self.annotations.as_deref())
			.unwrap_or_default()
	}

	/// Recomputes the displayed annotations after the log or the fetched list changed.
	pub fn refresh_annotations(&mut self) {
		self.visible = if self.edits.is_empty() {
			None
		} else {
			Some(self.edits.replay(self.annotations.as_deref().unwrap_or_default()))
		};
	}

	/// Folds confirmed edits into the fetched list, when there is one.
	pub fn fold_confirmed(&mut self) {
		if let Some(base) = self.annotations.as_mut() {
			self.edits.fold_confirmed(base);
		}
	}

	fn store(&mut self, payload: Payload, issued: u64) {
		match payload {
			Payload::Annotations(value) => {
				self.annotations = Some(value);
				self.edits.prune_confirmed_before(issued);
				self.refresh_annotations();
			}
			Payload::Chunks(value) => self.chunks = Some(value),
			Payload::Quality(value) => self.quality = Some(value),
			Payload::References(value) => self.references = Some(value),
		}
	}
}

/// Least-recently-opened resources keep their data; older ones are evicted.
pub(crate) struct DataCache {
	entries: LruCache<ResourceId, ResourceData>,
}

impl DataCache {
	pub fn new(capacity: NonZeroUsize) -> Self {
		Self {
			entries: LruCache::new(capacity),
		}
	}

	pub fn peek(&self, resource: &ResourceId) -> Option<&ResourceData> {
		self.entries.peek(resource)
	}

	pub fn peek_mut(&mut self, resource: &ResourceId) -> Option<&mut ResourceData> {
		self.entries.peek_mut(resource)
	}

	pub fn promote(&mut self, resource: &ResourceId) {
		self.entries.promote(resource);
	}

	pub fn has(&self, resource: &ResourceId, kind: DataKind) -> bool {
		self.peek(resource).is_some_and(|data| data.has(kind))
	}

	/// Stores a fetch result. `issued` is the stamp taken when the fetch was sent.
	pub fn store(&mut self, resource: ResourceId, payload: Payload, issued: u64) {
		self.entries.get_or_insert_mut(resource, ResourceData::default).store(payload, issued);
	}

	/// The entry of `resource`, created empty (with nothing fetched) when missing.
	pub fn entry_mut(&mut self, resource: &ResourceId) -> &mut ResourceData {
		self.entries.get_or_insert_mut(resource.clone(), ResourceData::default)
	}
}
