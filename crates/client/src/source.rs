use async_trait::async_trait;
use marginalia_model::{Annotation, AnnotationPatch, NewAnnotation, QualityDetails, Reference, SemanticChunk, SymbolSummary};
use marginalia_primitives::{AnnotationId, ResourceId};

use crate::Result;

/// Backend operations the overlay engine depends on.
///
/// Implementations must be cheap to share: the engine holds one behind an
/// `Arc` and calls it from spawned tasks.
#[async_trait]
pub trait DataSource: Send + Sync {
	/// All annotations visible on a resource.
	async fn annotations(&self, resource: &ResourceId) -> Result<Vec<Annotation>>;

	/// Creates an annotation and returns the stored record.
	async fn create_annotation(&self, annotation: &NewAnnotation) -> Result<Annotation>;

	/// Edits note, tags or color of an annotation and returns the stored record.
	async fn update_annotation(&self, id: &AnnotationId, patch: &AnnotationPatch) -> Result<Annotation>;

	async fn delete_annotation(&self, id: &AnnotationId) -> Result<()>;

	/// Semantic chunks of a resource, in chunk-index order.
	async fn chunks(&self, resource: &ResourceId) -> Result<Vec<SemanticChunk>>;

	async fn quality(&self, resource: &ResourceId) -> Result<QualityDetails>;

	/// References of a resource. Array order decides which reference wins a shared line.
	async fn references(&self, resource: &ResourceId) -> Result<Vec<Reference>>;

	/// Enrichment summary of a symbol within a resource.
	async fn symbol_summary(&self, resource: &ResourceId, symbol: &str) -> Result<SymbolSummary>;
}
