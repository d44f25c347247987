//! Rope utilities and extensions.

use ropey::RopeSlice;

/// Returns the number of lines, including the empty line after a trailing newline.
#[inline]
pub fn line_count(text: RopeSlice) -> usize {
	text.len_lines()
}

/// Returns the character length of a 0-based line, excluding its `\n` terminator.
///
/// Out-of-range lines have length zero.
pub fn line_content_len(text: RopeSlice, line_idx: usize) -> usize {
	if line_idx >= text.len_lines() {
		return 0;
	}
	let line = text.line(line_idx);
	let len = line.len_chars();
	if len > 0 && line.char(len - 1) == '\n' { len - 1 } else { len }
}
