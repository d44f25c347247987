//! Pointer event to entity resolution.
//!
//! Gutter events resolve by line: the first annotation in stacking order,
//! else the first reference on the line, else the innermost chunk. Text
//! events resolve by offset: the first annotation, in input order, whose
//! inclusive span contains the offset under the pointer. Anything else, or
//! an event without a position, resolves to no match.
//!
//! The dispatcher holds no state. Hover callbacks fire exactly once per
//! event, with `None` for no match, so subscribers can clear highlighting;
//! click callbacks only fire on a match.

use marginalia_model::{Annotation, Reference, SemanticChunk};
use marginalia_primitives::{LineNumber, RopeSlice, line_of_offset, position_to_offset};

use crate::host::{PointerEvent, TargetKind};
use crate::resolver::{annotation_at_offset, innermost_chunk, stacking_order};

/// An entity under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityRef<'a> {
	Annotation(&'a Annotation),
	Reference(&'a Reference),
	Chunk(&'a SemanticChunk),
}

/// The entities currently rendered, borrowed for one resolution.
///
/// Hidden overlays are passed as empty slices so they cannot be hit.
#[derive(Debug, Clone, Copy)]
pub struct HitTargets<'a> {
	pub text: RopeSlice<'a>,
	pub annotations: &'a [Annotation],
	pub references: &'a [Reference],
	pub chunks: &'a [SemanticChunk],
}

impl<'a> HitTargets<'a> {
	pub fn resolve(&self, event: &PointerEvent) -> Option<EntityRef<'a>> {
		let position = event.target.position?;
		match event.target.kind {
			TargetKind::GutterGlyphMargin => self.at_line(position.line),
			TargetKind::ContentText => {
				let offset = position_to_offset(self.text, position);
				annotation_at_offset(self.annotations, offset).map(EntityRef::Annotation)
			}
			TargetKind::Other => None,
		}
	}

	fn at_line(&self, line: LineNumber) -> Option<EntityRef<'a>> {
		let on_line: Vec<&'a Annotation> = self
			.annotations
			.iter()
			.filter(|a| line_of_offset(self.text, a.start_offset) == line)
			.collect();
		if let Some(&&first) = stacking_order(&on_line).first() {
			return Some(EntityRef::Annotation(first));
		}
		if let Some(reference) = self.references.iter().find(|r| r.line_number == line) {
			return Some(EntityRef::Reference(reference));
		}
		innermost_chunk(self.chunks, line).map(EntityRef::Chunk)
	}
}

/// Resolves `event` and reports the result to `on_hover`, exactly once.
pub fn dispatch_hover<'a>(targets: &HitTargets<'a>, event: &PointerEvent, on_hover: impl FnOnce(Option<EntityRef<'a>>)) {
	on_hover(targets.resolve(event));
}

/// Resolves `event` and reports a match to `on_click`. Returns whether it fired.
pub fn dispatch_click<'a>(targets: &HitTargets<'a>, event: &PointerEvent, on_click: impl FnOnce(EntityRef<'a>)) -> bool {
	match targets.resolve(event) {
		Some(entity) => {
			on_click(entity);
			true
		}
		None => false,
	}
}
