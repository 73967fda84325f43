//! Command interface and per-instance editor state.
//!
//! [`EditorSession`] owns everything one editor instance needs: the [`Document`], the display
//! selection, the undo history and its debounce, the suggestion list, the clipboard backend and
//! the content-changed subscribers. Hosts drive it with [`Command`] values.
//!
//! # Example
//!
//! ```rust
//! use codefold_core::{Command, EditCommand, EditorConfig, EditorSession, FoldCommand};
//!
//! let mut session = EditorSession::new("if (x) {\n  y();\n}", EditorConfig::default());
//!
//! session.execute(Command::Fold(FoldCommand::Toggle { line: 0 }));
//! assert_eq!(session.display_text(), "if (x) { ... }");
//!
//! session.execute(Command::Edit(EditCommand::Backspace));
//! assert_eq!(session.display_text(), "if (x) {\n  y();\n}");
//! ```

use crate::autocomplete::{SuggestionState, Trigger};
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::config::EditorConfig;
use crate::display::DisplayProjection;
use crate::edit::{Document, EditIntent, EditOutcome};
use crate::folding::FoldState;
use crate::history::{Debounce, History, HistoryEntry};
use crate::selection::Selection;
use codefold_lang::Language;
use std::time::Instant;
use tracing::{debug, warn};

/// Text editing commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Type text at the caret (or over the selection), auto-closing single openers.
    Type {
        /// Typed text.
        text: String,
    },
    /// Paste text verbatim.
    Paste {
        /// Pasted text.
        text: String,
    },
    /// Line break with indentation.
    InsertNewline,
    /// Insert the configured tab text.
    InsertTab,
    /// Delete the selection or the char before the caret; unfolds a collapsed line instead.
    Backspace,
    /// Delete the selection or the char after the caret; unfolds a collapsed line instead.
    DeleteForward,
    /// Cut the selection, or the current real line, to the clipboard.
    Cut,
    /// Copy the selection, or the current real line, to the clipboard.
    Copy,
    /// Toggle comments on the selected lines.
    ToggleComment,
    /// Undo
    Undo,
    /// Redo
    Redo,
}

/// Cursor & selection commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Set the display selection (clamped).
    SetSelection {
        /// Start offset in display chars.
        start: usize,
        /// End offset in display chars.
        end: usize,
    },
    /// Select the whole display text.
    SelectAll,
}

/// Folding commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldCommand {
    /// Toggle the range starting at a real line.
    Toggle {
        /// Real start line.
        line: usize,
    },
    /// Toggle the range shown on a display line (gutter click).
    ToggleAtDisplayLine {
        /// Display line index.
        line: usize,
    },
    /// Collapse every detected range.
    FoldAll,
    /// Expand everything.
    UnfoldAll,
}

/// Suggestion list commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestCommand {
    /// Open the list on request.
    Trigger,
    /// Highlight the next item.
    Next,
    /// Highlight the previous item.
    Previous,
    /// Insert the highlighted item over the partial word.
    Accept,
    /// Hide the list.
    Dismiss,
}

/// Unified command enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor commands
    Cursor(CursorCommand),
    /// Folding commands
    Fold(FoldCommand),
    /// Suggestion commands
    Suggest(SuggestCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// State changed
    Success,
    /// Nothing to do
    Unchanged,
    /// Success, returns text (cut/copy)
    Text(String),
}

/// Emitted after every command that changed the real text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChanged {
    /// Buffer version after the change.
    pub version: u64,
    /// The full real text.
    pub text: String,
}

/// Content change callback function type
pub type ContentChangedCallback = Box<dyn FnMut(&ContentChanged) + Send>;

/// One editor instance.
pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    selection: Selection,
    history: History,
    debounce: Debounce,
    suggestions: SuggestionState,
    clipboard: Box<dyn Clipboard + Send>,
    callbacks: Vec<ContentChangedCallback>,
}

impl EditorSession {
    /// Start a session over `text` with an in-memory clipboard.
    pub fn new(text: &str, config: EditorConfig) -> Self {
        Self::with_clipboard(text, config, MemoryClipboard::new())
    }

    /// Start a session with a host clipboard.
    pub fn with_clipboard(
        text: &str,
        config: EditorConfig,
        clipboard: impl Clipboard + Send + 'static,
    ) -> Self {
        let document = Document::with_options(text, config.language, config.edit_options());
        let mut history = History::new(config.history_limit);
        history.push_state(HistoryEntry::new(text, Selection::default()));

        Self {
            debounce: Debounce::new(config.debounce()),
            config,
            document,
            selection: Selection::default(),
            history,
            suggestions: SuggestionState::new(),
            clipboard: Box::new(clipboard),
            callbacks: Vec::new(),
        }
    }

    /// Configuration
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Language
    pub fn language(&self) -> Language {
        self.document.language()
    }

    /// Document (buffer, folds, projection).
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Real text.
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// Display text.
    pub fn display_text(&self) -> &str {
        self.document.display_text()
    }

    /// Display selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Fold state.
    pub fn folds(&self) -> &FoldState {
        self.document.folds()
    }

    /// Display projection.
    pub fn projection(&self) -> &DisplayProjection {
        self.document.projection()
    }

    /// Undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns `true` while a typing snapshot is waiting for the debounce.
    pub fn has_pending_snapshot(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Suggestion list.
    pub fn suggestions(&self) -> &SuggestionState {
        &self.suggestions
    }

    /// Buffer version; increases on every text change.
    pub fn version(&self) -> u64 {
        self.document.buffer().version()
    }

    /// Subscribe to content change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&ContentChanged) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Execute a command now.
    pub fn execute(&mut self, command: Command) -> CommandResult {
        self.execute_at(command, Instant::now())
    }

    /// Execute a command at an explicit time.
    pub fn execute_at(&mut self, command: Command, now: Instant) -> CommandResult {
        self.tick(now);
        match command {
            Command::Edit(command) => self.execute_edit(command, now),
            Command::Cursor(command) => self.execute_cursor(command),
            Command::Fold(command) => self.execute_fold(command),
            Command::Suggest(command) => self.execute_suggest(command, now),
        }
    }

    /// Take the pending typing snapshot if its idle window has passed. Returns `true` if one was
    /// recorded.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.debounce.fire_if_due(now) {
            self.snapshot();
            return true;
        }
        false
    }

    /// Tear the session down, recording any pending typing snapshot first.
    pub fn close(mut self) -> History {
        if self.debounce.flush() {
            self.snapshot();
        }
        self.history
    }

    fn current_entry(&self) -> HistoryEntry {
        HistoryEntry::new(self.document.text(), self.selection)
    }

    fn snapshot(&mut self) {
        let entry = self.current_entry();
        self.history.push_state(entry);
    }

    fn execute_edit(&mut self, command: EditCommand, now: Instant) -> CommandResult {
        let intent = match command {
            EditCommand::Undo => return self.execute_undo(),
            EditCommand::Redo => return self.execute_redo(),
            EditCommand::Type { text } => EditIntent::Type(text),
            EditCommand::Paste { text } => EditIntent::Paste(text),
            EditCommand::InsertNewline => EditIntent::InsertNewline,
            EditCommand::InsertTab => EditIntent::InsertTab,
            EditCommand::Backspace => EditIntent::Backspace,
            EditCommand::DeleteForward => EditIntent::DeleteForward,
            EditCommand::Cut => EditIntent::Cut,
            EditCommand::Copy => EditIntent::Copy,
            EditCommand::ToggleComment => EditIntent::ToggleComment,
        };
        self.apply_intent(intent, now)
    }

    fn apply_intent(&mut self, intent: EditIntent, now: Instant) -> CommandResult {
        let structural = intent.is_structural(self.selection);
        let outcome = self.document.plan(self.selection, &intent);

        if structural && outcome.text_changed {
            self.debounce.cancel();
            self.snapshot();
        }

        let clipboard = outcome.clipboard.clone();
        if let Some(text) = &clipboard
            && let Err(err) = self.clipboard.write_text(text)
        {
            warn!(error = %err, "clipboard write failed");
        }

        let text_changed = outcome.text_changed;
        let changed = self.commit(outcome);

        if text_changed {
            self.history.clear_redo();
            if !structural {
                self.debounce.reschedule(now);
            }
        }
        self.update_suggestions(&intent, structural);

        match clipboard {
            Some(text) => CommandResult::Text(text),
            None if changed => CommandResult::Success,
            None => CommandResult::Unchanged,
        }
    }

    /// Install `outcome`, notify subscribers on text change, and report whether anything changed.
    fn commit(&mut self, outcome: EditOutcome) -> bool {
        let text_changed = outcome.text_changed;
        let changed =
            text_changed || outcome.folds_changed || outcome.selection != self.selection;
        self.selection = self.document.commit(outcome);
        if text_changed {
            self.notify();
        }
        changed
    }

    fn notify(&mut self) {
        let change = ContentChanged {
            version: self.version(),
            text: self.document.text(),
        };
        for callback in &mut self.callbacks {
            callback(&change);
        }
    }

    fn update_suggestions(&mut self, intent: &EditIntent, structural: bool) {
        if !self.config.suggestions || structural {
            self.suggestions.dismiss();
            return;
        }
        let language = self.document.language();
        let caret = self.selection.end;
        match intent {
            EditIntent::Type(text) if text.chars().last().is_some_and(|c| !c.is_whitespace()) => {
                let real = self.document.text();
                let display = self.document.display_text();
                self.suggestions
                    .update(Trigger::Auto, language, &real, display, caret);
            }
            EditIntent::Type(_) => self.suggestions.dismiss(),
            EditIntent::Backspace | EditIntent::DeleteForward => {
                let real = self.document.text();
                let display = self.document.display_text();
                self.suggestions.refilter(language, &real, display, caret);
            }
            _ => {}
        }
    }

    fn restore(&mut self, entry: HistoryEntry) {
        let before = self.version();
        self.document.restore_text(&entry.text);
        self.selection = entry.selection().clamp(self.document.projection().len_chars());
        self.suggestions.dismiss();
        if self.version() != before {
            self.notify();
        }
    }

    fn execute_undo(&mut self) -> CommandResult {
        self.debounce.cancel();
        let current = self.current_entry();
        match self.history.undo(current) {
            Some(entry) => {
                self.restore(entry);
                CommandResult::Success
            }
            None => CommandResult::Unchanged,
        }
    }

    fn execute_redo(&mut self) -> CommandResult {
        self.debounce.cancel();
        let current = self.current_entry();
        match self.history.redo(current) {
            Some(entry) => {
                self.restore(entry);
                CommandResult::Success
            }
            None => CommandResult::Unchanged,
        }
    }

    fn execute_cursor(&mut self, command: CursorCommand) -> CommandResult {
        let len = self.document.projection().len_chars();
        let selection = match command {
            CursorCommand::SetSelection { start, end } => Selection::new(start, end).clamp(len),
            CursorCommand::SelectAll => Selection::new(0, len),
        };
        if selection == self.selection {
            return CommandResult::Unchanged;
        }
        self.selection = selection;
        self.suggestions.dismiss();
        CommandResult::Success
    }

    fn execute_fold(&mut self, command: FoldCommand) -> CommandResult {
        let outcome = match command {
            FoldCommand::Toggle { line } => {
                self.document.plan(self.selection, &EditIntent::ToggleFold(line))
            }
            FoldCommand::ToggleAtDisplayLine { line } => {
                let Some(real_line) = self.document.projection().line(line).map(|l| l.real_line)
                else {
                    return CommandResult::Unchanged;
                };
                self.document
                    .plan(self.selection, &EditIntent::ToggleFold(real_line))
            }
            FoldCommand::FoldAll => self.document.refold(self.selection, |folds| {
                let before = folds.clone();
                folds.fold_all();
                *folds != before
            }),
            FoldCommand::UnfoldAll => self.document.refold(self.selection, |folds| {
                let changed = !folds.is_empty();
                folds.unfold_all();
                changed
            }),
        };

        if !outcome.folds_changed {
            return CommandResult::Unchanged;
        }
        self.suggestions.dismiss();
        self.commit(outcome);
        debug!(folded = self.folds().folded_lines().count(), "folds updated");
        CommandResult::Success
    }

    fn execute_suggest(&mut self, command: SuggestCommand, now: Instant) -> CommandResult {
        let changed = match command {
            SuggestCommand::Trigger => {
                if !self.config.suggestions {
                    return CommandResult::Unchanged;
                }
                let real = self.document.text();
                let display = self.document.display_text();
                self.suggestions.update(
                    Trigger::Explicit,
                    self.document.language(),
                    &real,
                    display,
                    self.selection.end,
                );
                self.suggestions.is_visible()
            }
            SuggestCommand::Next => self.suggestions.next(),
            SuggestCommand::Previous => self.suggestions.previous(),
            SuggestCommand::Accept => {
                let Some((range, text)) = self.suggestions.accept() else {
                    return CommandResult::Unchanged;
                };
                return self.apply_intent(EditIntent::Replace { range, text }, now);
            }
            SuggestCommand::Dismiss => {
                let visible = self.suggestions.is_visible();
                self.suggestions.dismiss();
                visible
            }
        };
        if changed {
            CommandResult::Success
        } else {
            CommandResult::Unchanged
        }
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("config", &self.config)
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("history", &self.history)
            .field("suggestions", &self.suggestions)
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
