//! Small string helpers shared by the projection, mapper and edit planner.
//!
//! All lengths here are in `char`s. Lines are split on `\n` only, so N newlines yield N+1 lines.

pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    // `str::split('\n')` preserves trailing empty segments, which matches the buffer's line model.
    text.split('\n').collect()
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_idx`-th char, clamped to the end of `text`.
pub(crate) fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Count of leading whitespace chars.
pub(crate) fn leading_whitespace_len(text: &str) -> usize {
    text.chars().take_while(|c| c.is_whitespace()).count()
}

pub(crate) fn leading_whitespace(text: &str) -> &str {
    let trimmed = text.trim_start();
    &text[..text.len() - trimmed.len()]
}
