//! Offset and line spans.
//!
//! Offsets count characters (not bytes) from the start of a resource's text,
//! starting at zero. Line numbers start at one. Both span types are inclusive
//! on both ends, which is what hit-testing against annotations and chunks
//! expects.

use serde::{Deserialize, Serialize};

/// A position in the text, measured in characters (not bytes).
pub type CharIdx = usize;

/// A 1-based line number.
pub type LineNumber = u32;

/// An inclusive range of absolute character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OffsetSpan {
	/// First offset covered.
	pub start: CharIdx,
	/// Last offset covered (inclusive).
	pub end: CharIdx,
}

impl OffsetSpan {
	/// Creates a span, swapping the bounds if they arrive reversed.
	pub fn new(start: CharIdx, end: CharIdx) -> Self {
		if end < start { Self { start: end, end: start } } else { Self { start, end } }
	}

	/// Returns true when `offset` lies within `[start, end]`.
	#[inline]
	pub fn contains(&self, offset: CharIdx) -> bool {
		self.start <= offset && offset <= self.end
	}

	/// Returns true when the two spans share at least one offset.
	#[inline]
	pub fn overlaps(&self, other: &OffsetSpan) -> bool {
		self.start <= other.end && other.start <= self.end
	}

	/// Number of characters between the bounds.
	#[inline]
	pub fn len(&self) -> usize {
		self.end - self.start
	}

	/// Returns true for a zero-width span.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}
}

/// An inclusive range of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSpan {
	/// First line covered.
	pub start_line: LineNumber,
	/// Last line covered (inclusive).
	pub end_line: LineNumber,
}

impl LineSpan {
	/// Creates a line span, swapping the bounds if they arrive reversed.
	pub fn new(start_line: LineNumber, end_line: LineNumber) -> Self {
		if end_line < start_line {
			Self {
				start_line: end_line,
				end_line: start_line,
			}
		} else {
			Self { start_line, end_line }
		}
	}

	/// Returns true when `line` lies within `[start_line, end_line]`.
	#[inline]
	pub fn contains(&self, line: LineNumber) -> bool {
		self.start_line <= line && line <= self.end_line
	}

	/// Distance between the first and last line; zero for a single-line span.
	#[inline]
	pub fn extent(&self) -> u32 {
		self.end_line - self.start_line
	}
}
