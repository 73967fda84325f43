//! Display Projection
//!
//! Derives the user-visible text from the real buffer and the collapsed ranges. A collapsed block
//! renders as a single line, `"<start line> ... <trimmed end line>"`, mapped to its start line;
//! every other visible line is copied verbatim and mapped to itself. Hidden lines keep their real
//! content untouched; they are just absent from the display text.
//!
//! The projection is read-only and must be recomputed whenever the buffer or the fold state
//! changes.

use crate::buffer::TextBuffer;
use crate::folding::FoldState;
use crate::text::{char_len, leading_whitespace_len, split_lines};

/// Separator rendered between a collapsed block's first and last line.
pub const FOLD_MARKER: &str = " ... ";

/// Length of [`FOLD_MARKER`] in chars (the marker is ASCII).
pub const FOLD_MARKER_LEN: usize = FOLD_MARKER.len();

/// One line of display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    /// Real line this display line belongs to.
    pub real_line: usize,
    /// End line of the collapsed block, if this line is a collapsed start.
    pub fold_end: Option<usize>,
    /// Char offset of this line within the display text.
    pub start: usize,
    /// Char length of the display line.
    pub len: usize,
    /// Char length of the real start line, i.e. where the fold marker begins.
    pub prefix_len: usize,
    /// Leading whitespace trimmed from the end line when rendering the fold.
    pub end_indent: usize,
}

impl DisplayLine {
    /// Returns `true` if this line stands for a collapsed block.
    pub fn is_folded(&self) -> bool {
        self.fold_end.is_some()
    }

    /// Exclusive end offset in display text (before the newline).
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Display text plus the display-line to real-line index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayProjection {
    text: String,
    lines: Vec<DisplayLine>,
    len_chars: usize,
}

impl DisplayProjection {
    /// Project `buffer` through the collapsed ranges of `folds`.
    pub fn compute(buffer: &TextBuffer, folds: &FoldState) -> Self {
        let real_text = buffer.text();
        let real_lines = split_lines(&real_text);

        let mut text = String::with_capacity(real_text.len());
        let mut lines = Vec::with_capacity(real_lines.len());
        let mut offset = 0usize;
        let mut idx = 0usize;

        while idx < real_lines.len() {
            if idx > 0 {
                text.push('\n');
                offset += 1;
            }

            let line = real_lines[idx];
            let fold_end = folds
                .is_folded(idx)
                .then(|| folds.end_for(idx))
                .flatten()
                .filter(|end| *end > idx && *end < real_lines.len());

            let prefix_len = char_len(line);
            match fold_end {
                Some(end) => {
                    let end_line = real_lines[end];
                    let trimmed = end_line.trim();
                    text.push_str(line);
                    text.push_str(FOLD_MARKER);
                    text.push_str(trimmed);
                    let len = prefix_len + FOLD_MARKER_LEN + char_len(trimmed);
                    lines.push(DisplayLine {
                        real_line: idx,
                        fold_end: Some(end),
                        start: offset,
                        len,
                        prefix_len,
                        end_indent: leading_whitespace_len(end_line),
                    });
                    offset += len;
                    idx = end + 1;
                }
                None => {
                    text.push_str(line);
                    lines.push(DisplayLine {
                        real_line: idx,
                        fold_end: None,
                        start: offset,
                        len: prefix_len,
                        prefix_len,
                        end_indent: 0,
                    });
                    offset += prefix_len;
                    idx += 1;
                }
            }
        }

        Self {
            text,
            lines,
            len_chars: offset,
        }
    }

    /// The display text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Display text length in chars.
    pub fn len_chars(&self) -> usize {
        self.len_chars
    }

    /// Display lines in order.
    pub fn lines(&self) -> &[DisplayLine] {
        &self.lines
    }

    /// Number of display lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Display line `idx`, if it exists.
    pub fn line(&self, idx: usize) -> Option<&DisplayLine> {
        self.lines.get(idx)
    }

    /// One real-line index per display line.
    pub fn display_to_real_line_map(&self) -> Vec<usize> {
        self.lines.iter().map(|l| l.real_line).collect()
    }

    /// Display line showing `real_line`, or the collapsed line hiding it.
    pub fn display_line_for_real(&self, real_line: usize) -> usize {
        match self
            .lines
            .binary_search_by_key(&real_line, |l| l.real_line)
        {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        }
    }
}
