//! `codefold-highlight` - Regex-based syntax tokenizer and markup renderer for `codefold-core`.
//!
//! The tokenizer runs over *display* text, so hidden folded content is never tokenized.
//!
//! - Code languages: every rule of the language produces candidate matches over the whole text;
//!   candidates are sorted by start offset, then rule priority, and accepted first-fit when they
//!   begin at or after the end of the last accepted token.
//! - HTML: tag runs and comment runs are found first, then tag runs are split into punctuation,
//!   tag names, attribute names and values.
//!
//! Gaps between styled tokens are emitted as [`TokenKind::Plain`] tokens, so concatenating every
//! token's text reconstructs the input exactly. Output is deterministic.

mod html;
mod rules;

pub use html::HtmlGrammar;
pub use rules::{RegexRule, rules_for};

use codefold_core::processing::DisplayProcessor;
use codefold_lang::Language;
use thiserror::Error;
use tracing::trace;

/// Errors from building a highlighter.
#[derive(Debug, Error)]
pub enum HighlightError {
    /// A rule pattern failed to compile.
    #[error("invalid highlight rule `{pattern}`: {source}")]
    InvalidRule {
        /// The offending pattern.
        pattern: String,
        /// Compiler error.
        source: regex::Error,
    },
}

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Line or block comment.
    Comment,
    /// String literal or attribute value.
    String,
    /// Keyword, literal constant or CSS property.
    Keyword,
    /// Numeric literal.
    Number,
    /// Operator.
    Operator,
    /// HTML tag name.
    Tag,
    /// HTML attribute name.
    AttrName,
    /// HTML tag punctuation (`<`, `</`, `>`, `/>`, `=`).
    Punctuation,
    /// Unstyled text.
    Plain,
}

impl TokenKind {
    /// CSS class suffix used by [`render`]; `None` for plain text.
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            TokenKind::Comment => Some("comment"),
            TokenKind::String => Some("string"),
            TokenKind::Keyword => Some("keyword"),
            TokenKind::Number => Some("number"),
            TokenKind::Operator => Some("operator"),
            TokenKind::Tag => Some("tag"),
            TokenKind::AttrName => Some("attr-name"),
            TokenKind::Punctuation => Some("punctuation"),
            TokenKind::Plain => None,
        }
    }
}

/// A classified span of display text (char offsets, half-open).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Start char offset.
    pub start: usize,
    /// End char offset.
    pub end: usize,
    /// Classification.
    pub kind: TokenKind,
    /// Covered text.
    pub text: String,
}

/// A styled byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) kind: TokenKind,
}

impl Span {
    pub(crate) fn new(start: usize, end: usize, kind: TokenKind) -> Self {
        Self { start, end, kind }
    }
}

#[derive(Debug, Clone)]
enum Grammar {
    Rules(Vec<RegexRule>),
    Html(HtmlGrammar),
}

/// Tokenizer for one language.
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter {
    language: Language,
    grammar: Grammar,
}

impl SyntaxHighlighter {
    /// Build the highlighter for `language`.
    pub fn new(language: Language) -> Result<Self, HighlightError> {
        let grammar = match language {
            Language::Html => Grammar::Html(HtmlGrammar::new()?),
            _ => Grammar::Rules(rules_for(language)?),
        };
        Ok(Self { language, grammar })
    }

    /// Language
    pub fn language(&self) -> Language {
        self.language
    }

    /// Contiguous token stream covering all of `text`.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let spans = match &self.grammar {
            Grammar::Rules(rules) => accept_greedy(rules, text),
            Grammar::Html(html) => html.spans(text),
        };
        trace!(language = %self.language, styled = spans.len(), "tokenized");
        fill_gaps(text, &spans)
    }

    /// Tokenize and render `text` as markup.
    pub fn highlight(&self, text: &str) -> String {
        render(&self.tokenize(text))
    }
}

/// Candidate matches from every rule, accepted first-fit by `(start, priority)`.
fn accept_greedy(rules: &[RegexRule], text: &str) -> Vec<Span> {
    let mut candidates: Vec<(usize, usize, usize, TokenKind)> = Vec::new();
    for (priority, rule) in rules.iter().enumerate() {
        candidates.extend(
            rule.matches(text)
                .into_iter()
                .map(|(start, end)| (start, end, priority, rule.kind())),
        );
    }
    candidates.sort_by_key(|&(start, _, priority, _)| (start, priority));

    let mut accepted = Vec::new();
    let mut last_end = 0;
    for (start, end, _, kind) in candidates {
        if start >= last_end && start < end {
            accepted.push(Span::new(start, end, kind));
            last_end = end;
        }
    }
    accepted
}

/// Convert ascending byte spans to char-offset tokens, inserting plain gap tokens.
fn fill_gaps(text: &str, spans: &[Span]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(spans.len() * 2 + 1);
    let mut byte = 0;
    let mut chars = 0;

    let mut push = |tokens: &mut Vec<Token>, start: usize, end: usize, kind: TokenKind| {
        let slice = &text[start..end];
        let len = slice.chars().count();
        tokens.push(Token {
            start: chars,
            end: chars + len,
            kind,
            text: slice.to_string(),
        });
        chars += len;
    };

    for span in spans {
        if span.start > byte {
            push(&mut tokens, byte, span.start, TokenKind::Plain);
        }
        push(&mut tokens, span.start, span.end, span.kind);
        byte = span.end;
    }
    if byte < text.len() {
        push(&mut tokens, byte, text.len(), TokenKind::Plain);
    }
    tokens
}

/// Escape `& < > " '` for markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render tokens as escaped markup: styled tokens become `<span class="tok-<kind>">` elements,
/// plain tokens are emitted as escaped text.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        let text = escape_html(&token.text);
        match token.kind.class_name() {
            Some(class) => {
                out.push_str("<span class=\"tok-");
                out.push_str(class);
                out.push_str("\">");
                out.push_str(&text);
                out.push_str("</span>");
            }
            None => out.push_str(&text),
        }
    }
    out
}

/// Tokenize and render `text` written in `language`.
pub fn highlight(text: &str, language: Language) -> Result<String, HighlightError> {
    Ok(SyntaxHighlighter::new(language)?.highlight(text))
}

impl DisplayProcessor for SyntaxHighlighter {
    type Output = String;
    type Error = HighlightError;

    fn process_text(
        &mut self,
        display_text: &str,
        language: Language,
    ) -> Result<String, Self::Error> {
        if language != self.language {
            *self = SyntaxHighlighter::new(language)?;
        }
        Ok(self.highlight(display_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(language: Language, text: &str) -> Vec<(String, TokenKind)> {
        SyntaxHighlighter::new(language)
            .unwrap()
            .tokenize(text)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Plain)
            .map(|t| (t.text, t.kind))
            .collect()
    }

    #[test]
    fn test_comment_outranks_operator_and_keyword() {
        assert_eq!(
            kinds(Language::JavaScript, "// if x"),
            vec![("// if x".to_string(), TokenKind::Comment)]
        );
    }

    #[test]
    fn test_keyword_inside_string_is_not_split() {
        assert_eq!(
            kinds(Language::JavaScript, "let s = \"return\";"),
            vec![
                ("let".to_string(), TokenKind::Keyword),
                ("=".to_string(), TokenKind::Operator),
                ("\"return\"".to_string(), TokenKind::String),
            ]
        );
    }

    #[test]
    fn test_keywords_respect_word_boundaries() {
        let tokens = kinds(Language::Python, "define = 1");
        assert!(!tokens.iter().any(|(_, kind)| *kind == TokenKind::Keyword));
        assert!(tokens.contains(&("1".to_string(), TokenKind::Number)));
    }

    #[test]
    fn test_css_property_uses_capture_group() {
        let tokens = kinds(Language::Css, "a { background-color: red; }");
        assert!(tokens.contains(&("background-color".to_string(), TokenKind::Keyword)));
    }

    #[test]
    fn test_tokens_are_contiguous_char_offsets() {
        let text = "const é = 'ü'; // ok";
        let tokens = SyntaxHighlighter::new(Language::JavaScript)
            .unwrap()
            .tokenize(text);
        let mut expected_start = 0;
        for token in &tokens {
            assert_eq!(token.start, expected_start);
            assert_eq!(token.end - token.start, token.text.chars().count());
            expected_start = token.end;
        }
        assert_eq!(expected_start, text.chars().count());
    }

    #[test]
    fn test_render_escapes_markup() {
        let out = highlight("a < b && c", Language::PlainText).unwrap();
        assert_eq!(out, "a &lt; b &amp;&amp; c");

        let out = highlight("<b class='x'>", Language::Html).unwrap();
        assert_eq!(
            out,
            "<span class=\"tok-punctuation\">&lt;</span>\
             <span class=\"tok-tag\">b</span> \
             <span class=\"tok-attr-name\">class</span>\
             <span class=\"tok-punctuation\">=</span>\
             <span class=\"tok-string\">&#39;x&#39;</span>\
             <span class=\"tok-punctuation\">&gt;</span>"
        );
    }

    #[test]
    fn test_processor_switches_language() {
        let mut highlighter = SyntaxHighlighter::new(Language::PlainText).unwrap();
        let out = highlighter.process_text("# hi", Language::Python).unwrap();
        assert_eq!(out, "<span class=\"tok-comment\"># hi</span>");
        assert_eq!(highlighter.language(), Language::Python);
    }
}
