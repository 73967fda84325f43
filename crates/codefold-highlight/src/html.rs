//! Two-phase HTML tokenization.
//!
//! Phase one splits the text into comment runs, tag runs and text runs. Phase two re-tokenizes each
//! tag run into punctuation, the tag name, attribute names and attribute values.

use crate::{HighlightError, Span, TokenKind};
use regex::Regex;

const RUN_PATTERN: &str = r"(?s:<!--.*?-->)|<[!/]?[A-Za-z][^<>]*>";
const PART_PATTERN: &str =
    r#"(?P<string>"[^"]*"|'[^']*')|(?P<open></?)|(?P<close>/?>)|(?P<eq>=)|(?P<word>[^\s"'<>/=]+)"#;

/// Compiled HTML patterns.
#[derive(Debug, Clone)]
pub struct HtmlGrammar {
    run: Regex,
    part: Regex,
}

impl HtmlGrammar {
    /// Compile the run and tag-part patterns.
    pub fn new() -> Result<Self, HighlightError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| HighlightError::InvalidRule {
                pattern: pattern.to_string(),
                source,
            })
        };
        Ok(Self {
            run: compile(RUN_PATTERN)?,
            part: compile(PART_PATTERN)?,
        })
    }

    /// Styled byte spans, ascending and non-overlapping. Gaps are plain text.
    pub(crate) fn spans(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for run in self.run.find_iter(text) {
            if run.as_str().starts_with("<!--") {
                spans.push(Span::new(run.start(), run.end(), TokenKind::Comment));
            } else {
                self.tag_spans(run.as_str(), run.start(), &mut spans);
            }
        }
        spans
    }

    fn tag_spans(&self, tag: &str, offset: usize, spans: &mut Vec<Span>) {
        let mut seen_name = false;
        let mut after_eq = false;

        for caps in self.part.captures_iter(tag) {
            let Some(m) = caps.get(0) else {
                continue;
            };
            let kind = if caps.name("string").is_some() {
                TokenKind::String
            } else if ["open", "close", "eq"]
                .iter()
                .any(|name| caps.name(name).is_some())
            {
                TokenKind::Punctuation
            } else if !seen_name {
                seen_name = true;
                TokenKind::Tag
            } else if after_eq {
                // Unquoted attribute value.
                TokenKind::String
            } else {
                TokenKind::AttrName
            };
            after_eq = caps.name("eq").is_some();
            spans.push(Span::new(offset + m.start(), offset + m.end(), kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(&str, TokenKind)> {
        HtmlGrammar::new()
            .unwrap()
            .spans(text)
            .into_iter()
            .map(|s| (&text[s.start..s.end], s.kind))
            .collect()
    }

    #[test]
    fn test_tag_run_parts() {
        assert_eq!(
            kinds(r#"<a href="x" hidden>"#),
            vec![
                ("<", TokenKind::Punctuation),
                ("a", TokenKind::Tag),
                ("href", TokenKind::AttrName),
                ("=", TokenKind::Punctuation),
                ("\"x\"", TokenKind::String),
                ("hidden", TokenKind::AttrName),
                (">", TokenKind::Punctuation),
            ]
        );
    }

    #[test]
    fn test_closing_and_self_closing_tags() {
        assert_eq!(
            kinds("</p><br/>"),
            vec![
                ("</", TokenKind::Punctuation),
                ("p", TokenKind::Tag),
                (">", TokenKind::Punctuation),
                ("<", TokenKind::Punctuation),
                ("br", TokenKind::Tag),
                ("/>", TokenKind::Punctuation),
            ]
        );
    }

    #[test]
    fn test_comment_is_one_run() {
        assert_eq!(
            kinds("a<!-- <b> -->c"),
            vec![("<!-- <b> -->", TokenKind::Comment)]
        );
    }

    #[test]
    fn test_unquoted_value() {
        let parts = kinds("<input type=text>");
        assert!(parts.contains(&("text", TokenKind::String)));
    }
}
