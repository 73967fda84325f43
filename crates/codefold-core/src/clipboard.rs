//! System clipboard boundary.
//!
//! The host supplies a [`Clipboard`]. Failures are logged by the session and never abort the edit
//! that produced the text.

use thiserror::Error;

/// Errors reported by a clipboard backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The host refused access.
    #[error("clipboard access denied")]
    PermissionDenied,
    /// No clipboard exists on this host.
    #[error("clipboard unavailable")]
    Unavailable,
    /// Backend-specific failure.
    #[error("clipboard error: {0}")]
    Other(String),
}

/// Read/write access to a text clipboard.
pub trait Clipboard {
    /// Read the clipboard contents.
    fn read_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the clipboard contents.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents.
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Ok(self.contents.clone())
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = text.to_string();
        Ok(())
    }
}

/// A clipboard that always fails, for hosts without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable)
    }

    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}
