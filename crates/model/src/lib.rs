//! Domain records consumed by the overlay engine.
//!
//! Everything here is owned by backend services: the engine reads, caches
//! and invalidates these records per resource but only annotations are ever
//! mutated client-side, and only through explicit user actions.

pub mod annotation;
pub mod chunk;
pub mod quality;
pub mod reference;
pub mod resource;
pub mod symbol;

pub use annotation::{Annotation, AnnotationPatch, DEFAULT_ANNOTATION_COLOR, NewAnnotation};
pub use chunk::{ChunkMetadata, ChunkSymbol, SemanticChunk};
pub use quality::{BadgeLevel, QualityDetails, QualityDimensions};
pub use reference::{Reference, ReferenceType};
pub use resource::ResourceMeta;
pub use symbol::{Connection, SymbolSummary};
