//! Coordinate mapping between absolute offsets and editor positions.
//!
//! The editor surface addresses text by 1-based `(line, column)` pairs while
//! the backend stores annotation anchors as 0-based character offsets. Both
//! directions are pure functions of the text and clamp instead of failing:
//!
//! * An offset past the end of the text maps to the end-of-text position.
//! * An offset sitting on a `\n` belongs to the line that newline terminates,
//!   at column `line length + 1`.
//! * A position past the last line or past the end of its line clamps to the
//!   last line or to the line's terminating column.
//!
//! Only `\n` separates lines; a `\r` before it is ordinary line content.

use ropey::RopeSlice;
use serde::{Deserialize, Serialize};

use crate::range::{CharIdx, LineNumber};
use crate::rope::line_content_len;

/// A 1-based `(line, column)` position on the editor surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
	/// 1-based line number.
	pub line: LineNumber,
	/// 1-based column, counted in characters.
	pub column: u32,
}

impl Position {
	/// Creates a new position.
	pub const fn new(line: LineNumber, column: u32) -> Self {
		Self { line, column }
	}
}

/// Maps an absolute character offset to its 1-based position.
pub fn offset_to_position(text: RopeSlice, offset: CharIdx) -> Position {
	let offset = offset.min(text.len_chars());
	let line_idx = text.char_to_line(offset);
	let line_start = text.line_to_char(line_idx);
	Position {
		line: (line_idx + 1) as LineNumber,
		column: (offset - line_start + 1) as u32,
	}
}

/// Maps a 1-based position back to an absolute character offset.
///
/// Line 0 and column 0 are treated as 1.
pub fn position_to_offset(text: RopeSlice, position: Position) -> CharIdx {
	let last_line = text.len_lines().saturating_sub(1);
	let line_idx = (position.line.max(1) as usize - 1).min(last_line);
	let line_start = text.line_to_char(line_idx);
	let max_column = line_content_len(text, line_idx) + 1;
	let column = (position.column.max(1) as usize).min(max_column);
	line_start + column - 1
}

/// Returns the 1-based line number that contains `offset`.
#[inline]
pub fn line_of_offset(text: RopeSlice, offset: CharIdx) -> LineNumber {
	offset_to_position(text, offset).line
}
