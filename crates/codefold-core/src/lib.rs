#![warn(missing_docs)]
//! Codefold Core - Headless Code Editing Engine with Folding
//!
//! # Overview
//!
//! `codefold-core` is an embeddable editing engine for source code. It keeps one canonical
//! ("real") text buffer and derives a user-visible ("display") text in which collapsed blocks are
//! shown as a single summarized line. Every edit arrives in display coordinates and is mapped into
//! the real buffer before it is applied, so hidden content is never lost by accident.
//!
//! It does not render anything; hosts show [`EditorSession::display_text`] and feed input back as
//! [`Command`] values.
//!
//! # Core Features
//!
//! - **Rope Buffer**: based on `ropey`, char-offset addressing
//! - **Fold Detection**: brace blocks, or matching HTML tags, rescanned after every change
//! - **Display Projection**: collapsed blocks render as `"<first line> ... <last line>"`
//! - **Offset Mapping**: display/real conversion with fold expansion for ranges
//! - **Two-phase Edits**: [`Document::plan`] is pure; [`Document::commit`] installs the result
//! - **History**: bounded undo/redo snapshots with debounced typing bursts
//! - **Autocomplete**: vocabulary plus identifiers scraped from the buffer
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorSession (commands, history, notify)  │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Document::plan / commit                    │  ← Edit Operations
//! ├─────────────────────────────────────────────┤
//! │  OffsetMapper                               │  ← Display ↔ Real
//! ├─────────────────────────────────────────────┤
//! │  DisplayProjection + FoldState              │  ← Folding
//! ├─────────────────────────────────────────────┤
//! │  detect_fold_ranges                         │  ← Fold Detection
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (Rope)                          │  ← Text Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use codefold_core::{Command, CursorCommand, EditCommand, EditorConfig, EditorSession};
//!
//! let mut session = EditorSession::new("", EditorConfig::default());
//!
//! session.execute(Command::Edit(EditCommand::Type { text: "(".to_string() }));
//! assert_eq!(session.text(), "()");
//! assert_eq!(session.selection().start, 1);
//!
//! session.execute(Command::Cursor(CursorCommand::SelectAll));
//! session.execute(Command::Edit(EditCommand::ToggleComment));
//! assert_eq!(session.text(), "// ()");
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - Rope-backed text buffer
//! - [`detect`] - Fold range detection
//! - [`folding`] - Collapsed-range state
//! - [`display`] - Display projection
//! - [`mapping`] - Display/real offset mapping
//! - [`edit`] - Two-phase edit planning
//! - [`history`] - Undo/redo and debounce
//! - [`autocomplete`] - Suggestion list
//! - [`session`] - Command interface and state object
//!
//! # Coordinates
//!
//! All offsets are char offsets (Unicode scalar values). Lines are separated by `\n` only; `\r`
//! is ordinary content.

pub mod autocomplete;
pub mod buffer;
pub mod clipboard;
pub mod comment;
pub mod config;
pub mod detect;
pub mod display;
pub mod edit;
pub mod folding;
pub mod history;
pub mod mapping;
pub mod processing;
pub mod selection;
pub mod session;
mod text;

pub use autocomplete::{SuggestionState, Trigger};
pub use buffer::TextBuffer;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, UnavailableClipboard};
pub use comment::{CommentEdit, plan_toggle};
pub use config::EditorConfig;
pub use detect::{FoldRanges, detect_fold_ranges};
pub use display::{DisplayLine, DisplayProjection, FOLD_MARKER};
pub use edit::{Document, EditIntent, EditOptions, EditOutcome};
pub use folding::{FoldRange, FoldState};
pub use history::{Debounce, History, HistoryEntry};
pub use mapping::{Bias, OffsetMapper};
pub use processing::DisplayProcessor;
pub use selection::Selection;
pub use session::{
    Command, CommandResult, ContentChanged, ContentChangedCallback, CursorCommand, EditCommand,
    EditorSession, FoldCommand, SuggestCommand,
};
