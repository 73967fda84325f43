//! Comment toggling over whole real lines.
//!
//! - Line comments prefix every non-blank line after its indentation. They are removed only when
//!   *every* non-blank line already carries the token.
//! - Block comments wrap or unwrap the whole span as one unit, detected by the trimmed span
//!   starting with the open token and ending with the close token.

use crate::buffer::TextBuffer;
use crate::text::{char_len, leading_whitespace};
use codefold_lang::CommentConfig;

/// A planned replacement of whole lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEdit {
    /// Real start offset (start of the first line).
    pub start: usize,
    /// Real end offset (end of the last line, before its newline).
    pub end: usize,
    /// New text for `[start, end)`.
    pub replacement: String,
}

impl CommentEdit {
    /// Char length of the replacement.
    pub fn replacement_len(&self) -> usize {
        char_len(&self.replacement)
    }
}

/// Plan a comment toggle for the real range `[start, end)`, expanded to whole lines.
///
/// A non-empty range that ends at column 0 does not include that last line. Returns `None` when
/// there is nothing to toggle (blank span, no usable tokens).
pub fn plan_toggle(
    buffer: &TextBuffer,
    start: usize,
    end: usize,
    config: &CommentConfig,
) -> Option<CommentEdit> {
    let first_line = buffer.char_to_line(start);
    let mut last_line = buffer.char_to_line(end);
    if end > start && last_line > first_line && end == buffer.line_start(last_line) {
        last_line -= 1;
    }

    let span_start = buffer.line_start(first_line);
    let span_end = buffer.line_end(last_line);
    let span = buffer.slice(span_start, span_end);

    let replacement = if let Some(token) = config.line_token() {
        toggle_line_comments(&span, token)?
    } else if let Some((open, close)) = config.block_tokens() {
        toggle_block_comment(&span, open, close)?
    } else {
        return None;
    };

    Some(CommentEdit {
        start: span_start,
        end: span_end,
        replacement,
    })
}

fn toggle_line_comments(span: &str, token: &str) -> Option<String> {
    let lines: Vec<&str> = span.split('\n').collect();
    let mut non_blank = lines.iter().filter(|l| !l.trim().is_empty()).peekable();
    non_blank.peek()?;

    let uncomment = non_blank.all(|l| l.trim_start().starts_with(token));

    let toggled: Vec<String> = lines
        .iter()
        .map(|line| {
            if line.trim().is_empty() {
                return (*line).to_string();
            }
            let indent = leading_whitespace(line);
            let rest = &line[indent.len()..];
            if uncomment {
                let body = rest.strip_prefix(token).unwrap_or(rest);
                let body = body.strip_prefix(' ').unwrap_or(body);
                format!("{indent}{body}")
            } else {
                format!("{indent}{token} {rest}")
            }
        })
        .collect();

    Some(toggled.join("\n"))
}

fn toggle_block_comment(span: &str, open: &str, close: &str) -> Option<String> {
    let trimmed = span.trim();
    if trimmed.is_empty() {
        return None;
    }

    let leading = leading_whitespace(span);
    let body = &span[leading.len()..];

    let wrapped = trimmed.len() >= open.len() + close.len()
        && trimmed.starts_with(open)
        && trimmed.ends_with(close);

    if wrapped {
        let trailing = &span[span.trim_end().len()..];
        let inner = &trimmed[open.len()..trimmed.len() - close.len()];
        let inner = inner.strip_prefix(' ').unwrap_or(inner);
        let inner = inner.strip_suffix(' ').unwrap_or(inner);
        Some(format!("{leading}{inner}{trailing}"))
    } else {
        Some(format!("{leading}{open} {body} {close}"))
    }
}
