//! Session configuration.

use crate::edit::EditOptions;
use crate::history::{DEFAULT_DEBOUNCE, DEFAULT_HISTORY_LIMIT};
use codefold_lang::Language;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for an [`EditorSession`](crate::EditorSession).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use codefold_core::EditorConfig;
/// use codefold_lang::Language;
///
/// let config: EditorConfig = serde_json::from_str(r#"{"language": "python"}"#).unwrap();
/// assert_eq!(config.language, Language::Python);
/// assert_eq!(config.tab_text, "  ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Language used for folding, comments, highlighting and completion.
    pub language: Language,
    /// Text inserted by the tab command.
    pub tab_text: String,
    /// Maximum number of undo snapshots.
    pub history_limit: usize,
    /// Idle time in milliseconds before a typing burst is snapshotted.
    pub debounce_ms: u64,
    /// Insert matching closers for brackets, quotes and HTML tags.
    pub auto_close: bool,
    /// Carry indentation over on newline.
    pub auto_indent: bool,
    /// Offer completions while typing.
    pub suggestions: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            tab_text: "  ".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            auto_close: true,
            auto_indent: true,
            suggestions: true,
        }
    }
}

impl EditorConfig {
    /// Default configuration for `language`.
    pub fn for_language(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    /// Debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Options for the edit planner.
    pub fn edit_options(&self) -> EditOptions {
        EditOptions {
            tab_text: self.tab_text.clone(),
            auto_close: self.auto_close,
            auto_indent: self.auto_indent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.language, Language::JavaScript);
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.debounce(), Duration::from_millis(1000));
        assert_eq!(config.edit_options(), EditOptions::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"language": "html", "auto_close": false}"#).unwrap();
        assert_eq!(config.language, Language::Html);
        assert!(!config.auto_close);
        assert!(config.auto_indent);

        let round = serde_json::to_string(&config).unwrap();
        let back: EditorConfig = serde_json::from_str(&round).unwrap();
        assert_eq!(back, config);
    }
}
