use codefold_core::{
    Clipboard, ClipboardError, Command, CommandResult, CursorCommand, EditCommand, EditorConfig,
    EditorSession, FoldCommand, UnavailableClipboard,
};
use std::sync::{Arc, Mutex};

/// Host clipboard that the test can inspect after handing it to a session.
#[derive(Clone, Default)]
struct SharedClipboard(Arc<Mutex<Vec<String>>>);

impl SharedClipboard {
    fn writes(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Clipboard for SharedClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.0.lock().unwrap().last().cloned().unwrap_or_default())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[test]
fn test_cut_still_edits_when_clipboard_fails() {
    let mut s =
        EditorSession::with_clipboard("one\ntwo", EditorConfig::default(), UnavailableClipboard);
    s.execute(Command::Cursor(CursorCommand::SetSelection { start: 0, end: 4 }));
    assert_eq!(
        s.execute(Command::Edit(EditCommand::Cut)),
        CommandResult::Text("one\n".to_string())
    );
    assert_eq!(s.text(), "two");
}

#[test]
fn test_host_clipboard_receives_copies_and_cuts() {
    let clipboard = SharedClipboard::default();
    let text = "a\nif (x) {\n  y();\n}\nb";
    let mut s = EditorSession::with_clipboard(text, EditorConfig::default(), clipboard.clone());
    s.execute(Command::Fold(FoldCommand::Toggle { line: 1 }));

    // Caret on the collapsed line: line copy takes the real line only.
    s.execute(Command::Cursor(CursorCommand::SetSelection { start: 4, end: 4 }));
    s.execute(Command::Edit(EditCommand::Copy));

    s.execute(Command::Cursor(CursorCommand::SetSelection { start: 0, end: 1 }));
    s.execute(Command::Edit(EditCommand::Cut));

    assert_eq!(clipboard.writes(), ["if (x) {\n", "a"]);
    assert_eq!(s.text(), "\nif (x) {\n  y();\n}\nb");
}

#[test]
fn test_copy_without_text_change_keeps_history_untouched() {
    let clipboard = SharedClipboard::default();
    let mut s = EditorSession::with_clipboard("abc", EditorConfig::default(), clipboard.clone());
    s.execute(Command::Cursor(CursorCommand::SelectAll));
    s.execute(Command::Edit(EditCommand::Copy));

    assert_eq!(clipboard.writes(), ["abc"]);
    assert_eq!(s.history().undo_depth(), 1);
    assert!(!s.has_pending_snapshot());
}
