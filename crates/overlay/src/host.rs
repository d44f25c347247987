//! The embedded editor widget as seen by the engine.

use marginalia_primitives::Position;
use marginalia_worker::Subscription;

use crate::decoration::{Decoration, DecorationHandle};
use crate::error::HostError;

/// Zone of the editor a pointer event landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
	/// The gutter glyph margin.
	GutterGlyphMargin,
	/// Text content.
	ContentText,
	/// Anything else: line numbers, scrollbars, outside the editor.
	Other,
}

/// What a pointer event points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerTarget {
	pub kind: TargetKind,
	/// Absent when the pointer is outside the text area.
	pub position: Option<Position>,
}

/// Pointer-move or pointer-down event reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
	pub target: PointerTarget,
}

impl PointerEvent {
	pub const fn new(kind: TargetKind, position: Option<Position>) -> Self {
		Self {
			target: PointerTarget { kind, position },
		}
	}

	pub const fn gutter(line: u32) -> Self {
		Self::new(TargetKind::GutterGlyphMargin, Some(Position::new(line, 1)))
	}

	pub const fn text(line: u32, column: u32) -> Self {
		Self::new(TargetKind::ContentText, Some(Position::new(line, column)))
	}

	pub const fn outside() -> Self {
		Self::new(TargetKind::Other, None)
	}
}

/// Host events the session listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEventKind {
	PointerMove,
	PointerDown,
	Scroll,
	Blur,
}

impl HostEventKind {
	pub const ALL: [HostEventKind; 4] = [Self::PointerMove, Self::PointerDown, Self::Scroll, Self::Blur];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::PointerMove => "pointer-move",
			Self::PointerDown => "pointer-down",
			Self::Scroll => "scroll",
			Self::Blur => "blur",
		}
	}
}

/// Surface of the embedded editor widget consumed by the engine.
///
/// Hosts forward subscribed events to the matching [`crate::EditorSession`]
/// methods. Decoration handles are opaque to the engine.
pub trait EditorHost {
	/// Initializes the widget. A failure switches the session to its read-only fallback.
	fn mount(&mut self) -> Result<(), HostError>;

	/// Returns true once the widget has been torn down.
	fn is_disposed(&self) -> bool;

	/// Removes the decorations behind `old` and applies `new`, returning the new handles.
	fn delta_decorations(&mut self, old: &[DecorationHandle], new: &[Decoration]) -> Vec<DecorationHandle>;

	/// Identifier-like word under `position`, if any.
	fn word_at(&self, position: Position) -> Option<String>;

	/// The widget's own hover text for `position`.
	fn builtin_hover(&self, position: Position) -> Option<String>;

	/// Starts listening for `kind`; dropping the handle stops it.
	fn subscribe(&mut self, kind: HostEventKind) -> Subscription;
}
