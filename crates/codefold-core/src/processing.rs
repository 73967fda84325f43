//! Generic display processing interface.
//!
//! Processors derive presentation data (such as highlighting markup) from a [`Document`]'s
//! display text. Hidden folded content is never passed to them.
//!
//! External crates (`codefold-*`) implement [`DisplayProcessor`]; the session never depends on a
//! concrete processor.

use crate::edit::Document;
use codefold_lang::Language;

/// Produces derived output for a document's current display text.
pub trait DisplayProcessor {
    /// The derived output.
    type Output;
    /// The error type returned by [`DisplayProcessor::process`].
    type Error;

    /// Process `display_text` written in `language`.
    fn process_text(
        &mut self,
        display_text: &str,
        language: Language,
    ) -> Result<Self::Output, Self::Error>;

    /// Process the current display text of `document`.
    fn process(&mut self, document: &Document) -> Result<Self::Output, Self::Error> {
        self.process_text(document.display_text(), document.language())
    }
}
