//! Decoration values exchanged with the host widget.

use marginalia_primitives::Position;

/// Opaque id the host assigns to an applied decoration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecorationHandle(pub String);

/// Range a decoration covers. `end` is exclusive for inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationRange {
	pub start: Position,
	pub end: Position,
}

impl DecorationRange {
	pub const fn new(start: Position, end: Position) -> Self {
		Self { start, end }
	}

	/// A range covering whole lines `start_line..=end_line`.
	pub const fn lines(start_line: u32, end_line: u32) -> Self {
		Self {
			start: Position::new(start_line, 1),
			end: Position::new(end_line, 1),
		}
	}
}

/// Styling and metadata of one decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecorationOptions {
	/// Class applied to the covered text.
	pub inline_class: Option<String>,
	/// Class of the glyph drawn in the gutter margin.
	pub glyph_class: Option<String>,
	/// Background color for inline highlights.
	pub color: Option<String>,
	/// Text shown when hovering the decoration.
	pub hover_message: Option<String>,
	/// Short label rendered next to the glyph.
	pub label: Option<String>,
	/// Apply to whole lines rather than the exact range.
	pub whole_line: bool,
	/// Position among decorations sharing a line, starting at zero.
	pub stack_index: u32,
}

/// A decoration ready to hand to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decoration {
	pub range: DecorationRange,
	pub options: DecorationOptions,
}

impl Decoration {
	pub fn new(range: DecorationRange, options: DecorationOptions) -> Self {
		Self { range, options }
	}

	/// A gutter glyph on a single line.
	pub fn glyph(line: u32, glyph_class: impl Into<String>) -> Self {
		Self {
			range: DecorationRange::lines(line, line),
			options: DecorationOptions {
				glyph_class: Some(glyph_class.into()),
				whole_line: true,
				..Default::default()
			},
		}
	}

	pub fn with_hover(mut self, message: impl Into<String>) -> Self {
		self.options.hover_message = Some(message.into());
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.options.label = Some(label.into());
		self
	}

	pub fn with_stack_index(mut self, index: u32) -> Self {
		self.options.stack_index = index;
		self
	}
}
