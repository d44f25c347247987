//! Ordering and precedence rules for overlapping overlay entities.
//!
//! * Same-line stacking: ascending anchor offset, ties keep input order.
//! * Offset hit-testing: the first entity in input order containing the offset.
//! * Nested chunks: the chunk with the smallest line extent containing the
//!   line; equal extents go to the later chunk in input order.
//! * References: only the first reference per line, in input order, is shown
//!   and clickable.
//!
//! Every function returns an empty collection or `None` for empty input.

use std::collections::BTreeMap;

use marginalia_model::{Annotation, Reference, SemanticChunk};
use marginalia_primitives::{CharIdx, LineNumber, RopeSlice, line_of_offset};

/// An entity with an absolute anchor offset used for stacking.
pub trait Anchored {
	fn anchor_offset(&self) -> CharIdx;
}

impl Anchored for Annotation {
	fn anchor_offset(&self) -> CharIdx {
		self.start_offset
	}
}

impl<T: Anchored + ?Sized> Anchored for &T {
	fn anchor_offset(&self) -> CharIdx {
		(**self).anchor_offset()
	}
}

/// Stable stacking order of entities sharing a line.
pub fn stacking_order<T: Anchored>(items: &[T]) -> Vec<&T> {
	let mut ordered: Vec<&T> = items.iter().collect();
	// sort_by_key is stable
	ordered.sort_by_key(|item| item.anchor_offset());
	ordered
}

/// Groups annotations by the line of their start offset, each group in stacking order.
pub fn annotations_by_line<'a>(text: RopeSlice, annotations: &'a [Annotation]) -> BTreeMap<LineNumber, Vec<&'a Annotation>> {
	let mut lines: BTreeMap<LineNumber, Vec<&'a Annotation>> = BTreeMap::new();
	for annotation in annotations {
		lines.entry(line_of_offset(text, annotation.start_offset)).or_default().push(annotation);
	}
	for group in lines.values_mut() {
		let ordered: Vec<&'a Annotation> = stacking_order(group).into_iter().copied().collect();
		*group = ordered;
	}
	lines
}

/// First annotation, in input order, whose inclusive span contains `offset`.
pub fn annotation_at_offset(annotations: &[Annotation], offset: CharIdx) -> Option<&Annotation> {
	annotations.iter().find(|a| a.span().contains(offset))
}

/// Innermost chunk containing `line`.
pub fn innermost_chunk(chunks: &[SemanticChunk], line: LineNumber) -> Option<&SemanticChunk> {
	let mut best: Option<&SemanticChunk> = None;
	for chunk in chunks.iter().filter(|c| c.lines().contains(line)) {
		match best {
			// an equal extent replaces, so the later chunk wins
			Some(current) if chunk.lines().extent() > current.lines().extent() => {}
			_ => best = Some(chunk),
		}
	}
	best
}

/// The displayable reference of each line: the first one the source returned.
pub fn first_reference_per_line(references: &[Reference]) -> BTreeMap<LineNumber, &Reference> {
	let mut lines = BTreeMap::new();
	for reference in references {
		lines.entry(reference.line_number).or_insert(reference);
	}
	lines
}
