//! Per-language regex rule sets.
//!
//! Rules are listed in priority order: comment, string, keyword, number, operator. When two
//! candidates start at the same offset the earlier rule wins.

use crate::{HighlightError, TokenKind};
use codefold_lang::{CSS_PROPERTIES, Language};
use regex::Regex;

/// A single regex highlighting rule.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    kind: TokenKind,
    capture_group: Option<usize>,
}

impl RegexRule {
    /// Compile a rule producing `kind` tokens.
    pub fn new(pattern: &str, kind: TokenKind) -> Result<Self, HighlightError> {
        let regex = Regex::new(pattern).map_err(|source| HighlightError::InvalidRule {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            kind,
            capture_group: None,
        })
    }

    /// Highlight only a capture group of each match.
    ///
    /// Example (CSS property):
    /// - pattern: `(?m)(?:^|[\s{;])(color)\s*:`
    /// - capture_group: `1` (the property name)
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    /// Kind of token this rule produces.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Byte ranges matched in `text`.
    pub fn matches(&self, text: &str) -> Vec<(usize, usize)> {
        match self.capture_group {
            Some(group) => self
                .regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(group))
                .map(|m| (m.start(), m.end()))
                .collect(),
            None => self
                .regex
                .find_iter(text)
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }
}

const C_COMMENT: &str = r"//[^\n]*|(?s:/\*.*?\*/)";
const BLOCK_COMMENT: &str = r"(?s:/\*.*?\*/)";
const HASH_COMMENT: &str = r"#[^\n]*";

const QUOTED: &str = r#""(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'"#;
const JS_STRING: &str = r#""(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'|`(?:\\.|[^`\\])*`"#;
const PY_STRING: &str = r#"(?s:""".*?"""|'''.*?''')|"(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'"#;
const JSON_STRING: &str = r#""(?:\\.|[^"\\\n])*""#;

const NUMBER: &str = r"\b(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)\b";
const JSON_NUMBER: &str = r"-?(?:0|[1-9]\d*)(?:\.\d+)?(?:[eE][+-]?\d+)?";
const CSS_NUMBER: &str = r"-?\b\d+(?:\.\d+)?(?:[a-zA-Z]+|%)?";

const C_OPERATOR: &str = r"[+\-*/%=<>!&|^~?:]+";
const PY_OPERATOR: &str = r"[+\-*/%=<>!&|^~@]+";

/// `a|b|c` over `words`, longest first so no word shadows a longer one.
fn word_alternation(words: &[&str]) -> String {
    let mut sorted: Vec<&str> = words.to_vec();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    sorted
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}

fn keywords(words: &[&str]) -> Result<RegexRule, HighlightError> {
    RegexRule::new(
        &format!(r"\b(?:{})\b", word_alternation(words)),
        TokenKind::Keyword,
    )
}

/// Ordered rule set for a non-markup language.
pub fn rules_for(language: Language) -> Result<Vec<RegexRule>, HighlightError> {
    let rules = match language {
        Language::JavaScript | Language::TypeScript => vec![
            RegexRule::new(C_COMMENT, TokenKind::Comment)?,
            RegexRule::new(JS_STRING, TokenKind::String)?,
            keywords(language.vocabulary())?,
            RegexRule::new(NUMBER, TokenKind::Number)?,
            RegexRule::new(C_OPERATOR, TokenKind::Operator)?,
        ],
        Language::Python => vec![
            RegexRule::new(HASH_COMMENT, TokenKind::Comment)?,
            RegexRule::new(PY_STRING, TokenKind::String)?,
            keywords(language.vocabulary())?,
            RegexRule::new(NUMBER, TokenKind::Number)?,
            RegexRule::new(PY_OPERATOR, TokenKind::Operator)?,
        ],
        Language::Css => vec![
            RegexRule::new(BLOCK_COMMENT, TokenKind::Comment)?,
            RegexRule::new(QUOTED, TokenKind::String)?,
            RegexRule::new(
                &format!(
                    r"(?m)(?:^|[\s{{;])({})\s*:",
                    word_alternation(CSS_PROPERTIES)
                ),
                TokenKind::Keyword,
            )?
            .with_capture_group(1),
            RegexRule::new(CSS_NUMBER, TokenKind::Number)?,
            RegexRule::new(r"[:;>+~*]", TokenKind::Operator)?,
        ],
        Language::Json => vec![
            RegexRule::new(JSON_STRING, TokenKind::String)?,
            keywords(&["true", "false", "null"])?,
            RegexRule::new(JSON_NUMBER, TokenKind::Number)?,
            RegexRule::new(r"[:,]", TokenKind::Operator)?,
        ],
        Language::Html | Language::PlainText => Vec::new(),
    };
    Ok(rules)
}
