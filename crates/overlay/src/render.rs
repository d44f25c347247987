//! Builders turning overlay data into per-channel decoration lists.
//!
//! Every builder is pure: the same input yields the same list, so a
//! repeated render hands the host an identical delta.

use marginalia_model::{Annotation, QualityDetails, Reference, SemanticChunk};
use marginalia_primitives::{LineNumber, RopeSlice, line_count, offset_to_position};

use crate::decoration::{Decoration, DecorationOptions, DecorationRange};
use crate::resolver::{annotations_by_line, first_reference_per_line};

pub const ANNOTATION_CHIP_CLASS: &str = "annotation-chip";
pub const ANNOTATION_HIGHLIGHT_CLASS: &str = "annotation-highlight";
pub const CHUNK_BOUNDARY_CLASS: &str = "chunk-boundary";
pub const CHUNK_FALLBACK_CLASS: &str = "chunk-boundary-fallback";

fn annotation_hover(annotation: &Annotation) -> String {
	match annotation.note.as_deref() {
		Some(note) => note.to_owned(),
		None if annotation.highlighted_text.is_empty() => "Annotation".to_owned(),
		None => format!("\"{}\"", annotation.highlighted_text),
	}
}

/// Builds the gutter chips: one per annotation on the line of its start
/// offset, stacked in resolver order.
pub fn annotation_gutter(text: RopeSlice, annotations: &[Annotation]) -> Vec<Decoration> {
	let mut decorations = Vec::with_capacity(annotations.len());
	for (line, group) in annotations_by_line(text, annotations) {
		for (index, annotation) in group.into_iter().enumerate() {
			let mut chip = Decoration::glyph(line, ANNOTATION_CHIP_CLASS)
				.with_hover(annotation_hover(annotation))
				.with_stack_index(index as u32);
			chip.options.color = Some(annotation.color.clone());
			if let Some(tag) = annotation.tags.iter().next() {
				chip.options.label = Some(tag.clone());
			}
			decorations.push(chip);
		}
	}
	decorations
}

/// Builds one inline highlight per annotation.
pub fn annotation_highlights(text: RopeSlice, annotations: &[Annotation]) -> Vec<Decoration> {
	annotations
		.iter()
		.map(|annotation| {
			let span = annotation.span();
			Decoration::new(
				DecorationRange::new(offset_to_position(text, span.start), offset_to_position(text, span.end)),
				DecorationOptions {
					inline_class: Some(ANNOTATION_HIGHLIGHT_CLASS.to_owned()),
					color: Some(annotation.color.clone()),
					hover_message: Some(annotation_hover(annotation)),
					..Default::default()
				},
			)
		})
		.collect()
}

/// Builds whole-line chunk ranges labeled with the chunk's display label.
///
/// Nested chunks carry their nesting depth as `stack_index`.
pub fn chunk_boundaries(chunks: &[SemanticChunk]) -> Vec<Decoration> {
	chunks
		.iter()
		.map(|chunk| {
			let lines = chunk.lines();
			let depth = chunks
				.iter()
				.filter(|outer| {
					let outer = outer.lines();
					outer.extent() > lines.extent() && outer.contains(lines.start_line) && outer.contains(lines.end_line)
				})
				.count();
			let label = chunk.display_label();
			let language = chunk.chunk_metadata.language.as_str();
			Decoration::new(
				DecorationRange::lines(lines.start_line, lines.end_line),
				DecorationOptions {
					glyph_class: Some(CHUNK_BOUNDARY_CLASS.to_owned()),
					hover_message: Some(if language.is_empty() { label.clone() } else { format!("{label} ({language})") }),
					label: Some(label),
					whole_line: true,
					stack_index: depth as u32,
					..Default::default()
				},
			)
		})
		.collect()
}

/// Builds fixed windows of `window` lines used when chunks are unavailable.
pub fn line_fallback_boundaries(text: RopeSlice, window: u32) -> Vec<Decoration> {
	let window = window.max(1);
	let total = line_count(text) as LineNumber;
	let mut decorations = Vec::new();
	let mut start = 1;
	while start <= total {
		let end = (start + window - 1).min(total);
		let label = format!("Lines {start}-{end}");
		decorations.push(Decoration::new(
			DecorationRange::lines(start, end),
			DecorationOptions {
				glyph_class: Some(format!("{CHUNK_BOUNDARY_CLASS} {CHUNK_FALLBACK_CLASS}")),
				hover_message: Some(label.clone()),
				label: Some(label),
				whole_line: true,
				..Default::default()
			},
		));
		start = end + 1;
	}
	decorations
}

/// Builds the line-1 quality badge. Empty when no quality is available.
pub fn quality_badge(quality: Option<&QualityDetails>, stale: bool) -> Vec<Decoration> {
	let Some(quality) = quality else {
		return Vec::new();
	};
	let level = quality.badge();
	let mut hover = format!("Quality {:.2} ({})", quality.overall, level.as_str());
	for (name, score) in quality.dimensions.entries() {
		hover.push_str(&format!("\n{name}: {score:.2}"));
	}
	if quality.is_quality_outlier {
		hover.push_str("\nflagged as outlier");
	}
	if quality.needs_quality_review {
		hover.push_str("\nneeds review");
	}
	if stale {
		hover.push_str("\n(cached)");
	}
	let percent = (quality.overall.clamp(0.0, 1.0) * 100.0).round();
	vec![Decoration::glyph(1, level.css_class()).with_label(format!("{percent}%")).with_hover(hover)]
}

/// Builds one icon per line for the first reference anchored there.
pub fn reference_icons(references: &[Reference]) -> Vec<Decoration> {
	first_reference_per_line(references)
		.into_iter()
		.map(|(line, reference)| Decoration::glyph(line, reference.reference_type.icon_class()).with_hover(reference.summary()))
		.collect()
}
