//! Core coordinate types for the overlay engine: offsets, positions, spans, and ids.

/// Identifier newtypes for backend-owned entities.
pub mod ids;
/// Conversion between absolute character offsets and 1-based positions.
pub mod position;
/// Offset and line span types used for hit-testing.
pub mod range;
/// Rope utilities and extensions.
pub mod rope;

pub use ids::{AnnotationId, ChunkId, ReferenceId, ResourceId, UserId};
pub use position::{Position, line_of_offset, offset_to_position, position_to_offset};
pub use range::{CharIdx, LineNumber, LineSpan, OffsetSpan};
pub use rope::{line_content_len, line_count};
pub use ropey::{Rope, RopeSlice};
