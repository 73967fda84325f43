//! Edit Operation Controller
//!
//! [`Document`] owns the real buffer, the fold state and the display projection, and is the only
//! place either of them changes. Every edit is two-phase:
//!
//! 1. [`Document::plan`] takes a display-level [`EditIntent`] plus the current display
//!    [`Selection`] and computes the resulting document *without mutating* `self`.
//! 2. [`Document::commit`] installs the planned [`EditOutcome`].
//!
//! Planning maps the selection through the [`OffsetMapper`] (expanding ranges that touch a
//! collapsed block), splices the real buffer, clears collapsed blocks whose hidden content was
//! overwritten, shifts the remaining ones past the edit, rescans for foldable ranges, recomputes
//! the projection, and maps the caret back into display coordinates.

use crate::buffer::TextBuffer;
use crate::comment::plan_toggle;
use crate::detect::detect_fold_ranges;
use crate::display::DisplayProjection;
use crate::folding::FoldState;
use crate::mapping::{Bias, OffsetMapper};
use crate::selection::Selection;
use crate::text::{char_len, leading_whitespace};
use codefold_lang::{Language, closing_pair, is_void_element};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

static OPEN_TAG_BEFORE_CARET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([A-Za-z][A-Za-z0-9-]*)(?:\s[^<>]*)?$"#).expect("valid open tag regex")
});

/// Knobs that change how intents are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOptions {
    /// Text inserted by [`EditIntent::InsertTab`].
    pub tab_text: String,
    /// Insert matching closers for brackets, quotes and HTML tags.
    pub auto_close: bool,
    /// Carry indentation over on [`EditIntent::InsertNewline`].
    pub auto_indent: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            tab_text: "  ".to_string(),
            auto_close: true,
            auto_indent: true,
        }
    }
}

/// A display-level edit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditIntent {
    /// Typed text. A single auto-closing character also inserts its closer.
    Type(String),
    /// Pasted text, inserted verbatim.
    Paste(String),
    /// Replace a display range (used when accepting a suggestion).
    Replace {
        /// Display range to replace.
        range: Selection,
        /// Replacement text.
        text: String,
    },
    /// Line break with indentation carried over.
    InsertNewline,
    /// Insert the configured tab text at the caret or over the selection.
    InsertTab,
    /// Delete the selection, or the char before the caret.
    Backspace,
    /// Delete the selection, or the char after the caret.
    DeleteForward,
    /// Cut the selection (or the current real line) to the clipboard.
    Cut,
    /// Copy the selection (or the current real line) to the clipboard.
    Copy,
    /// Toggle comments on the selected lines.
    ToggleComment,
    /// Collapse or expand the range starting at a real line.
    ToggleFold(usize),
}

impl EditIntent {
    /// Returns `true` for edits that get their own undo snapshot instead of being coalesced into
    /// a typing burst.
    pub fn is_structural(&self, selection: Selection) -> bool {
        match self {
            EditIntent::Type(text) => !selection.is_empty() || char_len(text) != 1,
            EditIntent::Backspace | EditIntent::DeleteForward => !selection.is_empty(),
            EditIntent::Copy | EditIntent::ToggleFold(_) => false,
            EditIntent::Paste(_)
            | EditIntent::Replace { .. }
            | EditIntent::InsertNewline
            | EditIntent::InsertTab
            | EditIntent::Cut
            | EditIntent::ToggleComment => true,
        }
    }
}

/// The result of planning an intent.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// The document after the edit.
    pub document: Document,
    /// Display selection after the edit.
    pub selection: Selection,
    /// Text to place on the clipboard (cut/copy).
    pub clipboard: Option<String>,
    /// Whether the real text changed.
    pub text_changed: bool,
    /// Whether the collapsed set changed.
    pub folds_changed: bool,
}

/// Buffer, folds and projection for one editing session.
#[derive(Debug, Clone)]
pub struct Document {
    buffer: TextBuffer,
    language: Language,
    folds: FoldState,
    projection: DisplayProjection,
    options: EditOptions,
}

impl Document {
    /// Create a document with default options.
    pub fn new(text: &str, language: Language) -> Self {
        Self::with_options(text, language, EditOptions::default())
    }

    /// Create a document with explicit options.
    pub fn with_options(text: &str, language: Language, options: EditOptions) -> Self {
        let buffer = TextBuffer::new(text);
        let folds = FoldState::new();
        let projection = DisplayProjection::compute(&buffer, &folds);
        let mut document = Self {
            buffer,
            language,
            folds,
            projection,
            options,
        };
        document.rescan();
        document
    }

    /// The real buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Real text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Fold state.
    pub fn folds(&self) -> &FoldState {
        &self.folds
    }

    /// Current display projection.
    pub fn projection(&self) -> &DisplayProjection {
        &self.projection
    }

    /// Display text.
    pub fn display_text(&self) -> &str {
        self.projection.text()
    }

    /// Edit options.
    pub fn options(&self) -> &EditOptions {
        &self.options
    }

    /// A mapper over the current projection.
    pub fn mapper(&self) -> OffsetMapper<'_> {
        OffsetMapper::new(&self.buffer, &self.projection)
    }

    /// Install a planned outcome.
    pub fn commit(&mut self, outcome: EditOutcome) -> Selection {
        *self = outcome.document;
        outcome.selection
    }

    /// Replace the whole text (history restore). Collapsed ranges that survive the rescan stay
    /// collapsed.
    pub fn restore_text(&mut self, text: &str) {
        if self.buffer.text_eq(text) {
            return;
        }
        self.buffer.replace_all(text);
        self.rescan();
    }

    /// Apply a fold-state change and reproject. Returns `false` if nothing changed.
    pub fn update_folds(&mut self, change: impl FnOnce(&mut FoldState) -> bool) -> bool {
        let changed = change(&mut self.folds);
        if changed {
            self.reproject();
        }
        changed
    }

    fn rescan(&mut self) {
        let ranges = detect_fold_ranges(&self.buffer.text(), self.language.fold_mode());
        self.folds.set_ranges(ranges);
        self.reproject();
    }

    fn reproject(&mut self) {
        self.projection = DisplayProjection::compute(&self.buffer, &self.folds);
    }

    /// Plan `intent` against the display `selection`. Does not mutate `self`.
    pub fn plan(&self, selection: Selection, intent: &EditIntent) -> EditOutcome {
        let selection = selection.clamp(self.projection.len_chars());
        trace!(?intent, ?selection, "planning edit");

        match intent {
            EditIntent::Type(text) => self.plan_type(selection, text),
            EditIntent::Paste(text) => self.plan_insert(selection, text, char_len(text)),
            EditIntent::Replace { range, text } => {
                let range = range.clamp(self.projection.len_chars());
                self.plan_insert(range, text, char_len(text))
            }
            EditIntent::InsertNewline => self.plan_newline(selection),
            EditIntent::InsertTab => {
                let tab = self.options.tab_text.clone();
                self.plan_insert(selection, &tab, char_len(&tab))
            }
            EditIntent::Backspace => self.plan_delete(selection, false),
            EditIntent::DeleteForward => self.plan_delete(selection, true),
            EditIntent::Cut => self.plan_clipboard(selection, true),
            EditIntent::Copy => self.plan_clipboard(selection, false),
            EditIntent::ToggleComment => self.plan_comment(selection),
            EditIntent::ToggleFold(line) => self.refold(selection, |folds| folds.toggle(*line)),
        }
    }

    fn unchanged(&self, selection: Selection) -> EditOutcome {
        EditOutcome {
            document: self.clone(),
            selection,
            clipboard: None,
            text_changed: false,
            folds_changed: false,
        }
    }

    /// Splice the real buffer and return the rescanned document.
    fn spliced(&self, start: usize, end: usize, insert: &str) -> Document {
        let buffer = &self.buffer;
        let mut folds = self.folds.clone();

        if start < end {
            // Hidden content runs from the end of the start line through the end of the end line.
            folds.clear_where(|range| {
                start < buffer.line_end(range.end_line) && end > buffer.line_end(range.start_line)
            });
        }

        let removed_lines = buffer.slice(start, end).matches('\n').count() as isize;
        let inserted_lines = insert.matches('\n').count() as isize;
        let edit_line = buffer.char_to_line(start);
        let shift_edit_line = start < buffer.line_end(edit_line);
        folds.apply_line_delta(edit_line, inserted_lines - removed_lines, shift_edit_line);

        let mut buffer = buffer.clone();
        buffer.splice(start, end, insert);

        let mut document = Document {
            buffer,
            language: self.language,
            folds,
            projection: self.projection.clone(),
            options: self.options.clone(),
        };
        document.rescan();
        document
    }

    fn outcome_with_caret(
        &self,
        document: Document,
        real_caret: usize,
        clipboard: Option<String>,
    ) -> EditOutcome {
        let caret = document.mapper().to_display(real_caret);
        let text_changed = document.buffer.version() != self.buffer.version();
        let folds_changed = document.folds != self.folds;
        EditOutcome {
            document,
            selection: Selection::caret(caret),
            clipboard,
            text_changed,
            folds_changed,
        }
    }

    fn plan_insert(&self, selection: Selection, text: &str, caret_in_text: usize) -> EditOutcome {
        let (start, end) = self.mapper().to_real_range(selection);
        let document = self.spliced(start, end, text);
        self.outcome_with_caret(document, start + caret_in_text, None)
    }

    fn plan_type(&self, selection: Selection, text: &str) -> EditOutcome {
        let mut chars = text.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };

        if self.options.auto_close
            && let Some(c) = single
        {
            if let Some(close) = closing_pair(c) {
                return self.plan_insert(selection, &format!("{c}{close}"), 1);
            }
            if c == '>'
                && self.language == Language::Html
                && let Some(tag) = self.open_tag_before(selection)
            {
                return self.plan_insert(selection, &format!("></{tag}>"), 1);
            }
        }

        self.plan_insert(selection, text, char_len(text))
    }

    /// Name of a non-void open tag left unterminated right before the selection start.
    fn open_tag_before(&self, selection: Selection) -> Option<String> {
        let (start, _) = self.mapper().to_real_range(selection);
        let line_start = self.buffer.line_start(self.buffer.char_to_line(start));
        let before = self.buffer.slice(line_start, start);
        if before.ends_with('/') {
            return None;
        }
        let caps = OPEN_TAG_BEFORE_CARET.captures(&before)?;
        let name = caps.get(1)?.as_str();
        (!is_void_element(name)).then(|| name.to_string())
    }

    fn plan_newline(&self, selection: Selection) -> EditOutcome {
        if !self.options.auto_indent {
            return self.plan_insert(selection, "\n", 1);
        }

        let (start, end) = self.mapper().to_real_range(selection);
        let line = self.buffer.char_to_line(start);
        let line_start = self.buffer.line_start(line);
        let before = self.buffer.slice(line_start, start);
        let indent = leading_whitespace(&before).to_string();

        let opener = before.trim_end().chars().last();
        let opens_block = match opener {
            Some('{' | '[' | '(') => true,
            Some(':') => self.language == Language::Python,
            _ => false,
        };

        if !opens_block {
            let text = format!("\n{indent}");
            let caret = char_len(&text);
            return self.plan_insert(selection, &text, caret);
        }

        let inner = format!("\n{indent}{}", self.options.tab_text);
        let caret = char_len(&inner);
        let after = self.buffer.slice(end, end + 1).chars().next();
        let text = match (opener.and_then(closing_pair), after) {
            (Some(close), Some(next)) if close == next => format!("{inner}\n{indent}"),
            _ => inner,
        };
        self.plan_insert(selection, &text, caret)
    }

    fn plan_delete(&self, selection: Selection, forward: bool) -> EditOutcome {
        let mapper = self.mapper();

        if !selection.is_empty() {
            let (start, end) = mapper.to_real_range(selection);
            let document = self.spliced(start, end, "");
            return self.outcome_with_caret(document, start, None);
        }

        let (line_idx, _) = mapper.display_position(selection.start);
        let caret = mapper.to_real(selection.start, Bias::Caret);

        // Deleting on a collapsed line reveals it instead of destroying hidden content.
        if let Some(line) = self.projection.line(line_idx)
            && line.is_folded()
        {
            let mut document = self.clone();
            document.update_folds(|folds| folds.unfold(line.real_line));
            return self.outcome_with_caret(document, caret, None);
        }

        let (start, end) = if forward {
            (caret, (caret + 1).min(self.buffer.len_chars()))
        } else {
            (caret.saturating_sub(1), caret)
        };
        if start == end {
            return self.unchanged(selection);
        }

        let document = self.spliced(start, end, "");
        self.outcome_with_caret(document, start, None)
    }

    fn plan_clipboard(&self, selection: Selection, cut: bool) -> EditOutcome {
        let (start, end) = if selection.is_empty() {
            // Line cut/copy works on the real line, independent of folding.
            let caret = self.mapper().to_real(selection.start, Bias::Caret);
            let line = self.buffer.char_to_line(caret);
            (self.buffer.line_start(line), self.buffer.line_start(line + 1))
        } else if selection.start == 0 && selection.end == self.projection.len_chars() {
            (0, self.buffer.len_chars())
        } else {
            self.mapper().to_real_range(selection)
        };

        let copied = self.buffer.slice(start, end);
        if !cut || start == end {
            let mut outcome = self.unchanged(selection);
            outcome.clipboard = Some(copied);
            return outcome;
        }

        let document = self.spliced(start, end, "");
        self.outcome_with_caret(document, start, Some(copied))
    }

    fn plan_comment(&self, selection: Selection) -> EditOutcome {
        let (start, end) = self.mapper().to_real_range(selection);
        let config = self.language.comment_config();
        let Some(edit) = plan_toggle(&self.buffer, start, end, &config) else {
            return self.unchanged(selection);
        };

        let old_first_len = self.buffer.line_len(self.buffer.char_to_line(edit.start));
        let document = self.spliced(edit.start, edit.end, &edit.replacement);

        if selection.is_empty() {
            // Keep the caret on the same text: shift it by the change in its line's length.
            let new_first_len = document.buffer.line_len(document.buffer.char_to_line(edit.start));
            let caret = (start + new_first_len)
                .saturating_sub(old_first_len)
                .max(edit.start);
            return self.outcome_with_caret(document, caret, None);
        }

        let span_end = edit.start + edit.replacement_len();
        let selection = document.mapper().to_display_range(edit.start, span_end);
        let text_changed = document.buffer.version() != self.buffer.version();
        let folds_changed = document.folds != self.folds;
        EditOutcome {
            document,
            selection,
            clipboard: None,
            text_changed,
            folds_changed,
        }
    }

    /// Plan a fold-state change, keeping the selection on the same real text.
    pub fn refold(
        &self,
        selection: Selection,
        change: impl FnOnce(&mut FoldState) -> bool,
    ) -> EditOutcome {
        let selection = selection.clamp(self.projection.len_chars());
        let (start, end) = self.mapper().to_real_range(selection);
        let mut document = self.clone();
        if !document.update_folds(change) {
            return self.unchanged(selection);
        }
        let selection = if start == end {
            Selection::caret(document.mapper().to_display(start))
        } else {
            document.mapper().to_display_range(start, end)
        };
        EditOutcome {
            document,
            selection,
            clipboard: None,
            text_changed: false,
            folds_changed: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(document: &mut Document, selection: Selection, intent: EditIntent) -> Selection {
        let outcome = document.plan(selection, &intent);
        document.commit(outcome)
    }

    #[test]
    fn test_plan_does_not_mutate() {
        let document = Document::new("abc", Language::JavaScript);
        let outcome = document.plan(Selection::caret(3), &EditIntent::Type("d".into()));
        assert_eq!(document.text(), "abc");
        assert_eq!(outcome.document.text(), "abcd");
        assert!(outcome.text_changed);
        assert_eq!(outcome.selection, Selection::caret(4));
    }

    #[test]
    fn test_auto_close_paren_in_empty_buffer() {
        let mut document = Document::new("", Language::JavaScript);
        let selection = apply(&mut document, Selection::caret(0), EditIntent::Type("(".into()));
        assert_eq!(document.text(), "()");
        assert_eq!(selection, Selection::caret(1));
    }

    #[test]
    fn test_auto_close_html_tag() {
        let mut document = Document::new("<div class=\"a\"", Language::Html);
        let selection = apply(&mut document, Selection::caret(14), EditIntent::Type(">".into()));
        assert_eq!(document.text(), "<div class=\"a\"></div>");
        assert_eq!(selection, Selection::caret(15));

        let mut document = Document::new("<br", Language::Html);
        apply(&mut document, Selection::caret(3), EditIntent::Type(">".into()));
        assert_eq!(document.text(), "<br>");
    }

    #[test]
    fn test_auto_close_can_be_disabled() {
        let options = EditOptions {
            auto_close: false,
            ..EditOptions::default()
        };
        let mut document = Document::with_options("", Language::JavaScript, options);
        apply(&mut document, Selection::caret(0), EditIntent::Type("[".into()));
        assert_eq!(document.text(), "[");
    }

    #[test]
    fn test_backspace_on_folded_line_unfolds() {
        let text = "if (x) {\n  y();\n}\n";
        let mut document = Document::new(text, Language::JavaScript);
        assert!(document.update_folds(|folds| folds.toggle(0)));
        assert_eq!(document.display_text(), "if (x) { ... }\n");

        let outcome = document.plan(Selection::caret(14), &EditIntent::Backspace);
        assert!(!outcome.text_changed);
        assert!(outcome.folds_changed);
        document.commit(outcome);

        assert_eq!(document.text(), text);
        assert!(!document.folds().is_folded(0));
        assert_eq!(document.display_text(), text);
    }

    #[test]
    fn test_insert_over_folded_line_replaces_hidden_block() {
        let mut document = Document::new("if (x) {\n  y();\n}\nz();", Language::JavaScript);
        document.update_folds(|folds| folds.toggle(0));

        let selection = apply(&mut document, Selection::new(0, 14), EditIntent::Paste("w();".into()));
        assert_eq!(document.text(), "w();\nz();");
        assert!(document.folds().is_empty());
        assert_eq!(selection, Selection::caret(4));
    }

    #[test]
    fn test_edit_above_fold_keeps_it_collapsed() {
        let mut document = Document::new("a\nif (x) {\n  y();\n}", Language::JavaScript);
        document.update_folds(|folds| folds.toggle(1));
        assert_eq!(document.display_text(), "a\nif (x) { ... }");

        apply(&mut document, Selection::caret(1), EditIntent::Paste("\nb".into()));
        assert_eq!(document.text(), "a\nb\nif (x) {\n  y();\n}");
        assert!(document.folds().is_folded(2));
        assert_eq!(document.display_text(), "a\nb\nif (x) { ... }");
    }

    #[test]
    fn test_cut_selection_touching_fold_takes_hidden_content() {
        let mut document = Document::new("a\nif (x) {\n  y();\n}\nz", Language::JavaScript);
        document.update_folds(|folds| folds.toggle(1));
        // Display: "a\nif (x) { ... }\nz"; select from "a" through the collapsed line.
        let outcome = document.plan(Selection::new(0, 16), &EditIntent::Cut);
        assert_eq!(outcome.clipboard.as_deref(), Some("a\nif (x) {\n  y();\n}"));
        document.commit(outcome);
        assert_eq!(document.text(), "\nz");
        assert!(document.folds().is_empty());
    }

    #[test]
    fn test_select_all_copy_includes_hidden_text() {
        let text = "if (x) {\n  y();\n}";
        let mut document = Document::new(text, Language::JavaScript);
        document.update_folds(|folds| folds.toggle(0));
        let len = document.projection().len_chars();
        let outcome = document.plan(Selection::new(0, len), &EditIntent::Copy);
        assert_eq!(outcome.clipboard.as_deref(), Some(text));
        assert!(!outcome.text_changed);
    }

    #[test]
    fn test_line_cut_without_selection() {
        let mut document = Document::new("one\ntwo\nthree", Language::PlainText);
        let outcome = document.plan(Selection::caret(5), &EditIntent::Cut);
        assert_eq!(outcome.clipboard.as_deref(), Some("two\n"));
        let selection = document.commit(outcome);
        assert_eq!(document.text(), "one\nthree");
        assert_eq!(selection, Selection::caret(4));

        let outcome = document.plan(Selection::caret(6), &EditIntent::Copy);
        assert_eq!(outcome.clipboard.as_deref(), Some("three"));
    }

    #[test]
    fn test_tab_inserts_two_spaces_over_selection() {
        let mut document = Document::new("abc", Language::JavaScript);
        let selection = apply(&mut document, Selection::new(1, 2), EditIntent::InsertTab);
        assert_eq!(document.text(), "a  c");
        assert_eq!(selection, Selection::caret(3));
    }

    #[test]
    fn test_newline_carries_indent_and_splits_braces() {
        let mut document = Document::new("  if (x) {}", Language::JavaScript);
        let selection = apply(&mut document, Selection::caret(10), EditIntent::InsertNewline);
        assert_eq!(document.text(), "  if (x) {\n    \n  }");
        assert_eq!(selection, Selection::caret(15));

        let mut document = Document::new("    x = 1", Language::Python);
        apply(&mut document, Selection::caret(9), EditIntent::InsertNewline);
        assert_eq!(document.text(), "    x = 1\n    ");

        let mut document = Document::new("def f():", Language::Python);
        apply(&mut document, Selection::caret(8), EditIntent::InsertNewline);
        assert_eq!(document.text(), "def f():\n  ");
    }

    #[test]
    fn test_delete_forward_and_backspace_at_bounds() {
        let mut document = Document::new("ab", Language::PlainText);
        let outcome = document.plan(Selection::caret(0), &EditIntent::Backspace);
        assert!(!outcome.text_changed);
        let outcome = document.plan(Selection::caret(2), &EditIntent::DeleteForward);
        assert!(!outcome.text_changed);

        let selection = apply(&mut document, Selection::caret(0), EditIntent::DeleteForward);
        assert_eq!(document.text(), "b");
        assert_eq!(selection, Selection::caret(0));
    }

    #[test]
    fn test_toggle_comment_selects_toggled_lines() {
        let mut document = Document::new("a\nb", Language::JavaScript);
        let selection = apply(&mut document, Selection::new(0, 3), EditIntent::ToggleComment);
        assert_eq!(document.text(), "// a\n// b");
        assert_eq!(selection, Selection::new(0, 9));

        apply(&mut document, selection, EditIntent::ToggleComment);
        assert_eq!(document.text(), "a\nb");
    }

    #[test]
    fn test_toggle_comment_caret_follows_text() {
        let mut document = Document::new("x = 1", Language::Python);
        let selection = apply(&mut document, Selection::caret(2), EditIntent::ToggleComment);
        assert_eq!(document.text(), "# x = 1");
        assert_eq!(selection, Selection::caret(4));
    }

    #[test]
    fn test_toggle_fold_ignores_non_foldable_line() {
        let document = Document::new("a\nb", Language::JavaScript);
        let outcome = document.plan(Selection::caret(0), &EditIntent::ToggleFold(1));
        assert!(!outcome.folds_changed);
    }

    #[test]
    fn test_restore_text_keeps_surviving_folds() {
        let mut document = Document::new("if (x) {\n  y();\n}", Language::JavaScript);
        document.update_folds(|folds| folds.toggle(0));
        document.restore_text("if (x) {\n  z();\n}");
        assert!(document.folds().is_folded(0));
        document.restore_text("nothing");
        assert!(document.folds().is_empty());
    }
}
