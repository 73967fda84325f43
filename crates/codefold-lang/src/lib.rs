#![warn(missing_docs)]
//! `codefold-lang` - data-driven language configuration for `codefold-core`.
//!
//! This crate intentionally stays free of editing logic. It answers small questions the engine
//! asks per language: which comment tokens to use, how collapsible blocks are detected, which
//! characters auto-close, and which words to offer as completions.

mod vocab;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use vocab::{CSS_PROPERTIES, HTML_TAGS, JAVASCRIPT_KEYWORDS, PYTHON_KEYWORDS, TYPESCRIPT_KEYWORDS};

/// Languages understood by the editor engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// HTML markup (tag folding, `<!-- -->` comments).
    Html,
    /// CSS stylesheets (`/* */` comments).
    Css,
    /// JavaScript.
    #[default]
    JavaScript,
    /// TypeScript.
    TypeScript,
    /// Python (`#` comments).
    Python,
    /// JSON documents.
    Json,
    /// Plain text: brace folding, default line comments, no highlighting rules.
    PlainText,
}

/// Error returned when a language id is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown language id `{0}`")]
pub struct LanguageParseError(pub String);

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 7] = [
        Language::Html,
        Language::Css,
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Json,
        Language::PlainText,
    ];

    /// Canonical lowercase id.
    pub fn id(self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Json => "json",
            Language::PlainText => "plaintext",
        }
    }

    /// How collapsible regions are detected for this language.
    pub fn fold_mode(self) -> FoldMode {
        match self {
            Language::Html => FoldMode::Tags,
            _ => FoldMode::Braces,
        }
    }

    /// Comment tokens used by comment toggling.
    ///
    /// HTML and CSS only have block comments; Python uses `#`; everything else falls back to `//`.
    pub fn comment_config(self) -> CommentConfig {
        match self {
            Language::Html => CommentConfig::block("<!--", "-->"),
            Language::Css => CommentConfig::block("/*", "*/"),
            Language::Python => CommentConfig::line("#"),
            _ => CommentConfig::line("//"),
        }
    }

    /// Whether buffer identifiers are merged into completion candidates.
    pub fn is_code(self) -> bool {
        matches!(
            self,
            Language::JavaScript | Language::TypeScript | Language::Python
        )
    }

    /// Fixed completion vocabulary.
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Language::Html => HTML_TAGS,
            Language::Css => CSS_PROPERTIES,
            Language::JavaScript => JAVASCRIPT_KEYWORDS,
            Language::TypeScript => TYPESCRIPT_KEYWORDS,
            Language::Python => PYTHON_KEYWORDS,
            Language::Json | Language::PlainText => &[],
        }
    }

    /// Returns `true` if `c` belongs to a word for completion purposes.
    ///
    /// Markup and stylesheet words may contain `-` (`background-color`, custom elements).
    pub fn is_word_char(self, c: char) -> bool {
        c.is_alphanumeric()
            || c == '_'
            || match self {
                Language::Html | Language::Css => c == '-',
                Language::JavaScript | Language::TypeScript => c == '$',
                _ => false,
            }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Language {
    type Err = LanguageParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Language::Html),
            "css" => Ok(Language::Css),
            "javascript" | "js" | "jsx" => Ok(Language::JavaScript),
            "typescript" | "ts" | "tsx" => Ok(Language::TypeScript),
            "python" | "py" => Ok(Language::Python),
            "json" => Ok(Language::Json),
            "plaintext" | "text" | "txt" => Ok(Language::PlainText),
            _ => Err(LanguageParseError(s.to_string())),
        }
    }
}

/// Strategy used to find collapsible regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldMode {
    /// A line ending in `{` opens a region; a line starting with `}` closes it.
    Braces,
    /// Matching open/close tag pairs spanning more than one line.
    Tags,
}

/// Comment tokens for a given language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentConfig {
    /// Line comment token (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment start token (e.g. `/*`).
    pub block_start: Option<String>,
    /// Block comment end token (e.g. `*/`).
    pub block_end: Option<String>,
}

impl CommentConfig {
    /// A config that supports only line comments.
    pub fn line(token: impl Into<String>) -> Self {
        Self {
            line: Some(token.into()),
            block_start: None,
            block_end: None,
        }
    }

    /// A config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: None,
            block_start: Some(start.into()),
            block_end: Some(end.into()),
        }
    }

    /// The line token, if one is configured and non-empty.
    pub fn line_token(&self) -> Option<&str> {
        self.line.as_deref().filter(|s| !s.is_empty())
    }

    /// The block token pair, if both halves are configured and non-empty.
    pub fn block_tokens(&self) -> Option<(&str, &str)> {
        let start = self.block_start.as_deref().filter(|s| !s.is_empty())?;
        let end = self.block_end.as_deref().filter(|s| !s.is_empty())?;
        Some((start, end))
    }
}

/// Elements that never have a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns `true` for HTML void elements (case-insensitive).
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Characters that insert a matching closer when typed.
pub const AUTO_CLOSE_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
];

/// The closer for an auto-closing opener.
pub fn closing_pair(open: char) -> Option<char> {
    AUTO_CLOSE_PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, c)| *c)
}
