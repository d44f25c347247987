//! In-memory [`DataSource`] with switchable failures and call accounting.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use marginalia_model::{Annotation, AnnotationPatch, NewAnnotation, QualityDetails, Reference, SemanticChunk, SymbolSummary};
use marginalia_primitives::{AnnotationId, ResourceId};
use parking_lot::Mutex;

use crate::{DataSource, Result, SourceError};

/// Operation selector for failure injection and call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
	Annotations,
	CreateAnnotation,
	UpdateAnnotation,
	DeleteAnnotation,
	Chunks,
	Quality,
	References,
	SymbolSummary,
}

#[derive(Debug, Default)]
struct MemoryState {
	annotations: HashMap<ResourceId, Vec<Annotation>>,
	chunks: HashMap<ResourceId, Vec<SemanticChunk>>,
	quality: HashMap<ResourceId, QualityDetails>,
	references: HashMap<ResourceId, Vec<Reference>>,
	summaries: HashMap<(ResourceId, String), SymbolSummary>,
	failing: HashSet<Endpoint>,
	calls: HashMap<Endpoint, usize>,
	next_id: u64,
}

/// Data source holding everything in process memory.
#[derive(Debug, Default)]
pub struct MemorySource {
	state: Mutex<MemoryState>,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_annotations(&self, resource: ResourceId, annotations: Vec<Annotation>) {
		self.state.lock().annotations.insert(resource, annotations);
	}

	pub fn set_chunks(&self, resource: ResourceId, chunks: Vec<SemanticChunk>) {
		self.state.lock().chunks.insert(resource, chunks);
	}

	pub fn set_quality(&self, resource: ResourceId, quality: QualityDetails) {
		self.state.lock().quality.insert(resource, quality);
	}

	pub fn set_references(&self, resource: ResourceId, references: Vec<Reference>) {
		self.state.lock().references.insert(resource, references);
	}

	pub fn set_summary(&self, resource: ResourceId, summary: SymbolSummary) {
		self.state.lock().summaries.insert((resource, summary.name.clone()), summary);
	}

	/// Makes every following call to `endpoint` fail until [`Self::recover`].
	pub fn fail(&self, endpoint: Endpoint) {
		self.state.lock().failing.insert(endpoint);
	}

	pub fn recover(&self, endpoint: Endpoint) {
		self.state.lock().failing.remove(&endpoint);
	}

	/// Number of calls made to `endpoint`, failed ones included.
	pub fn calls(&self, endpoint: Endpoint) -> usize {
		self.state.lock().calls.get(&endpoint).copied().unwrap_or(0)
	}

	/// Current stored annotations of a resource.
	pub fn stored_annotations(&self, resource: &ResourceId) -> Vec<Annotation> {
		self.state.lock().annotations.get(resource).cloned().unwrap_or_default()
	}

	fn enter(&self, endpoint: Endpoint) -> Result<parking_lot::MutexGuard<'_, MemoryState>> {
		let mut state = self.state.lock();
		*state.calls.entry(endpoint).or_default() += 1;
		if state.failing.contains(&endpoint) {
			return Err(SourceError::Unavailable(format!("{endpoint:?} is failing")));
		}
		Ok(state)
	}
}

#[async_trait]
impl DataSource for MemorySource {
	async fn annotations(&self, resource: &ResourceId) -> Result<Vec<Annotation>> {
		let state = self.enter(Endpoint::Annotations)?;
		Ok(state.annotations.get(resource).cloned().unwrap_or_default())
	}

	async fn create_annotation(&self, annotation: &NewAnnotation) -> Result<Annotation> {
		let mut state = self.enter(Endpoint::CreateAnnotation)?;
		state.next_id += 1;
		let stored = annotation.provisional(AnnotationId(format!("mem-{}", state.next_id)), Utc::now());
		state.annotations.entry(annotation.resource_id.clone()).or_default().push(stored.clone());
		Ok(stored)
	}

	async fn update_annotation(&self, id: &AnnotationId, patch: &AnnotationPatch) -> Result<Annotation> {
		let mut state = self.enter(Endpoint::UpdateAnnotation)?;
		let annotation = state
			.annotations
			.values_mut()
			.flat_map(|list| list.iter_mut())
			.find(|a| &a.id == id)
			.ok_or_else(|| SourceError::NotFound(id.to_string()))?;
		annotation.apply_patch(patch, Utc::now());
		Ok(annotation.clone())
	}

	async fn delete_annotation(&self, id: &AnnotationId) -> Result<()> {
		let mut state = self.enter(Endpoint::DeleteAnnotation)?;
		let mut found = false;
		for list in state.annotations.values_mut() {
			let before = list.len();
			list.retain(|a| &a.id != id);
			found |= list.len() != before;
		}
		if found { Ok(()) } else { Err(SourceError::NotFound(id.to_string())) }
	}

	async fn chunks(&self, resource: &ResourceId) -> Result<Vec<SemanticChunk>> {
		let state = self.enter(Endpoint::Chunks)?;
		Ok(state.chunks.get(resource).cloned().unwrap_or_default())
	}

	async fn quality(&self, resource: &ResourceId) -> Result<QualityDetails> {
		let state = self.enter(Endpoint::Quality)?;
		state.quality.get(resource).cloned().ok_or_else(|| SourceError::NotFound(resource.to_string()))
	}

	async fn references(&self, resource: &ResourceId) -> Result<Vec<Reference>> {
		let state = self.enter(Endpoint::References)?;
		Ok(state.references.get(resource).cloned().unwrap_or_default())
	}

	async fn symbol_summary(&self, resource: &ResourceId, symbol: &str) -> Result<SymbolSummary> {
		let state = self.enter(Endpoint::SymbolSummary)?;
		state
			.summaries
			.get(&(resource.clone(), symbol.to_owned()))
			.cloned()
			.ok_or_else(|| SourceError::NotFound(symbol.to_owned()))
	}
}
