//! Fold Range Detector
//!
//! A single forward scan over the real text that produces a `start_line -> end_line` map of
//! collapsible blocks. The whole buffer is rescanned after every change.
//!
//! - **Braces**: a trimmed line ending in `{` opens a block; a trimmed line starting with `}`
//!   closes the most recently opened one. `} else {` closes and reopens on the same line.
//! - **Tags**: every open/close tag on each line is matched; a closing tag pairs with the most
//!   recent open tag of the same name. Void elements and self-closing tags never open a block.
//!
//! Unbalanced input is not an error; unmatched openers simply produce no range.

use crate::text::split_lines;
use codefold_lang::{FoldMode, is_void_element};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Map of collapsible blocks keyed by start line. Every entry has `end > start`.
pub type FoldRanges = BTreeMap<usize, usize>;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([A-Za-z][A-Za-z0-9-]*)\b[^<>]*?(/?)>").expect("valid tag regex")
});

/// Detect collapsible ranges in `text`.
pub fn detect_fold_ranges(text: &str, mode: FoldMode) -> FoldRanges {
    match mode {
        FoldMode::Braces => detect_braces(text),
        FoldMode::Tags => detect_tags(text),
    }
}

fn record(ranges: &mut FoldRanges, start: usize, end: usize) {
    if end <= start {
        return;
    }
    // Several blocks may open on one line; keep the outermost.
    ranges
        .entry(start)
        .and_modify(|existing| *existing = (*existing).max(end))
        .or_insert(end);
}

fn detect_braces(text: &str) -> FoldRanges {
    let mut ranges = FoldRanges::new();
    let mut open: Vec<usize> = Vec::new();

    for (line_idx, line) in split_lines(text).into_iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with('}')
            && let Some(start) = open.pop()
        {
            record(&mut ranges, start, line_idx);
        }
        if trimmed.ends_with('{') {
            open.push(line_idx);
        }
    }

    ranges
}

fn detect_tags(text: &str) -> FoldRanges {
    let mut ranges = FoldRanges::new();
    let mut open: Vec<(usize, String)> = Vec::new();

    for (line_idx, line) in split_lines(text).into_iter().enumerate() {
        for caps in TAG_RE.captures_iter(line) {
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
            let Some(name) = caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) else {
                continue;
            };

            if closing {
                if let Some(pos) = open.iter().rposition(|(_, open_name)| *open_name == name) {
                    let (start, _) = open.remove(pos);
                    record(&mut ranges, start, line_idx);
                }
            } else if !self_closing && !is_void_element(&name) {
                open.push((line_idx, name));
            }
        }
    }

    ranges
}
