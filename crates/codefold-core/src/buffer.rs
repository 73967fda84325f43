//! Text Buffer
//!
//! The canonical ("real") text of an editing session plus a version stamp.
//!
//! Backed by a [`Rope`] so char-offset splices and line lookups stay O(log n). Cloning a buffer is
//! cheap (the rope shares its nodes), which lets the edit planner build a new buffer without
//! touching the committed one.

use ropey::Rope;

/// The canonical text and its change counter.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    version: u64,
}

impl TextBuffer {
    /// Create a buffer holding `text` at version 0.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            version: 0,
        }
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Monotonic version stamp, bumped by every [`splice`](Self::splice) that changes the text.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total character count.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the buffer has no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines (a trailing `\n` opens a final empty line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its trailing newline. Out-of-range lines are empty.
    pub fn line(&self, line: usize) -> String {
        if line >= self.line_count() {
            return String::new();
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// Char offset of the first char of `line`, clamped to the end of the buffer.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.line_count() {
            return self.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Char offset just past the last char of `line` (before its newline).
    pub fn line_end(&self, line: usize) -> usize {
        if line + 1 >= self.line_count() {
            return self.len_chars();
        }
        self.rope.line_to_char(line + 1) - 1
    }

    /// Char length of `line`, excluding the newline.
    pub fn line_len(&self, line: usize) -> usize {
        self.line_end(line).saturating_sub(self.line_start(line))
    }

    /// Line containing `offset` (clamped).
    pub fn char_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.len_chars()))
    }

    /// Text in `[start, end)`, clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);
        self.rope.slice(start..end).to_string()
    }

    /// Replace `[start, end)` with `insert`. Offsets are clamped; the version is bumped only when
    /// something actually changed.
    pub fn splice(&mut self, start: usize, end: usize, insert: &str) {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);
        if start == end && insert.is_empty() {
            return;
        }
        if start < end {
            self.rope.remove(start..end);
        }
        if !insert.is_empty() {
            self.rope.insert(start, insert);
        }
        self.version += 1;
    }

    /// Replace the whole text.
    pub fn replace_all(&mut self, text: &str) {
        let len = self.len_chars();
        self.splice(0, len, text);
    }

    /// Returns `true` if the text equals `other`.
    pub fn text_eq(&self, other: &str) -> bool {
        self.rope == other
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_model_matches_newline_split() {
        let buffer = TextBuffer::new("a\nbc\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.line(0), "a");
        assert_eq!(buffer.line(1), "bc");
        assert_eq!(buffer.line(2), "");
        assert_eq!(buffer.line_start(1), 2);
        assert_eq!(buffer.line_end(1), 4);
        assert_eq!(buffer.line_end(2), 5);
        assert_eq!(buffer.line_start(9), 5);
    }

    #[test]
    fn test_carriage_return_is_not_a_line_break() {
        let buffer = TextBuffer::new("a\rb\nc");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(0), "a\rb");
    }

    #[test]
    fn test_splice_bumps_version_only_on_change() {
        let mut buffer = TextBuffer::new("hello");
        buffer.splice(2, 2, "");
        assert_eq!(buffer.version(), 0);

        buffer.splice(1, 4, "ipp");
        assert_eq!(buffer.text(), "hippo");
        assert_eq!(buffer.version(), 1);

        buffer.splice(10, 20, "!");
        assert_eq!(buffer.text(), "hippo!");
        assert_eq!(buffer.version(), 2);
    }

    #[test]
    fn test_slice_clamps() {
        let buffer = TextBuffer::new("wörld");
        assert_eq!(buffer.slice(1, 3), "ör");
        assert_eq!(buffer.slice(3, 100), "ld");
        assert_eq!(buffer.slice(4, 2), "");
        assert!(buffer.text_eq("wörld"));
    }
}
