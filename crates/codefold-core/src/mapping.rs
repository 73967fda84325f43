//! Offset Mapper
//!
//! Converts offsets between display coordinates (the folded text the user sees) and real
//! coordinates (the canonical buffer).
//!
//! A range whose end reaches the fold marker of a collapsed line expands to the end of the whole
//! hidden block, so selecting a collapsed line is equivalent to selecting everything it hides.
//! Out-of-range offsets clamp to the nearest valid boundary; nothing here fails.
//!
//! A mapper is only meaningful against the projection computed for the current buffer and fold
//! state; rebuild the projection after every edit before mapping again.

use crate::buffer::TextBuffer;
use crate::display::{DisplayLine, DisplayProjection, FOLD_MARKER_LEN};
use crate::selection::Selection;

/// Which end of a range an offset represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// A caret (empty selection). Never expands at the marker boundary.
    Caret,
    /// Start of a non-empty range.
    Start,
    /// End of a non-empty range. Expands over a collapsed block once it reaches the marker.
    End,
}

/// Maps offsets through a [`DisplayProjection`].
#[derive(Debug, Clone, Copy)]
pub struct OffsetMapper<'a> {
    buffer: &'a TextBuffer,
    projection: &'a DisplayProjection,
}

impl<'a> OffsetMapper<'a> {
    /// Create a mapper over a buffer and its current projection.
    pub fn new(buffer: &'a TextBuffer, projection: &'a DisplayProjection) -> Self {
        Self { buffer, projection }
    }

    /// Index of the display line containing `offset`, clamped to the last line.
    pub fn display_line_index(&self, offset: usize) -> usize {
        let lines = self.projection.lines();
        lines
            .partition_point(|line| line.start <= offset)
            .saturating_sub(1)
            .min(lines.len().saturating_sub(1))
    }

    /// Display line and clamped column for `offset`.
    pub fn display_position(&self, offset: usize) -> (usize, usize) {
        let idx = self.display_line_index(offset);
        let column = self
            .projection
            .line(idx)
            .map(|line| offset.saturating_sub(line.start).min(line.len))
            .unwrap_or(0);
        (idx, column)
    }

    /// Map a display offset to a real offset.
    pub fn to_real(&self, offset: usize, bias: Bias) -> usize {
        let (idx, column) = self.display_position(offset);
        let Some(line) = self.projection.line(idx) else {
            return 0;
        };
        self.column_to_real(line, column, bias)
    }

    fn column_to_real(&self, line: &DisplayLine, column: usize, bias: Bias) -> usize {
        if let Some(end) = line.fold_end {
            let past_marker = column > line.prefix_len;
            let reaches_marker = column == line.prefix_len && bias == Bias::End;
            if past_marker || reaches_marker {
                return self.buffer.line_end(end);
            }
        }
        let real_line = line.real_line;
        self.buffer.line_start(real_line) + column.min(self.buffer.line_len(real_line))
    }

    /// Map a display selection to a real `[start, end)` range with fold expansion.
    ///
    /// A caret maps to a caret; a non-empty range maps its end with [`Bias::End`].
    pub fn to_real_range(&self, selection: Selection) -> (usize, usize) {
        let selection = Selection::new(selection.start, selection.end);
        if selection.is_empty() {
            let caret = self.to_real(selection.start, Bias::Caret);
            return (caret, caret);
        }
        let start = self.to_real(selection.start, Bias::Start);
        let end = self.to_real(selection.end, Bias::End);
        (start.min(end), start.max(end))
    }

    /// Map a real offset to a display offset.
    ///
    /// Offsets inside hidden lines land on the collapsed line: the last hidden line maps into the
    /// rendered end text, other hidden lines map to the start of the fold marker.
    pub fn to_display(&self, real_offset: usize) -> usize {
        let real_offset = real_offset.min(self.buffer.len_chars());
        let real_line = self.buffer.char_to_line(real_offset);
        let column = real_offset - self.buffer.line_start(real_line);

        let idx = self.projection.display_line_for_real(real_line);
        let Some(line) = self.projection.line(idx) else {
            return 0;
        };

        match line.fold_end {
            Some(end) if real_line > line.real_line => {
                if real_line == end {
                    let rendered = column.saturating_sub(line.end_indent);
                    line.start + (line.prefix_len + FOLD_MARKER_LEN + rendered).min(line.len)
                } else {
                    line.start + line.prefix_len
                }
            }
            _ => line.start + column.min(line.len),
        }
    }

    /// Map a real range back to a display selection.
    pub fn to_display_range(&self, start: usize, end: usize) -> Selection {
        Selection::new(self.to_display(start), self.to_display(end))
    }
}
