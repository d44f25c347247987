use std::fmt;

/// A named partition of the host editor's decoration surface.
///
/// Every channel has exactly one writer and its own handle list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
	AnnotationGutter,
	AnnotationHighlights,
	ChunkBoundaries,
	QualityBadges,
	ReferenceIcons,
}

impl Channel {
	pub const ALL: [Channel; 5] = [
		Channel::AnnotationGutter,
		Channel::AnnotationHighlights,
		Channel::ChunkBoundaries,
		Channel::QualityBadges,
		Channel::ReferenceIcons,
	];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::AnnotationGutter => "annotation-gutter",
			Self::AnnotationHighlights => "annotation-highlights",
			Self::ChunkBoundaries => "chunk-boundaries",
			Self::QualityBadges => "quality-badges",
			Self::ReferenceIcons => "reference-icons",
		}
	}

	pub(crate) const fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for Channel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
