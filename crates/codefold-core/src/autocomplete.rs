//! Autocomplete Engine
//!
//! Candidates are the language's fixed vocabulary plus, for code languages, identifiers scraped
//! from the real buffer. The list is filtered to words that start with (and differ from) the
//! partial word before the caret, ordered shortest first, and refiltered on every keystroke while
//! it is visible.

use crate::selection::Selection;
use crate::text::byte_index;
use codefold_lang::Language;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*").expect("valid identifier regex")
});

/// Shortest identifier worth offering from the buffer.
const MIN_IDENTIFIER_LEN: usize = 2;

/// The partial word ending at display offset `caret`, plus its start offset.
pub fn partial_word(display: &str, caret: usize, language: Language) -> (usize, String) {
    let prefix = &display[..byte_index(display, caret)];
    let mut word: Vec<char> = prefix
        .chars()
        .rev()
        .take_while(|c| language.is_word_char(*c))
        .collect();
    word.reverse();
    let start = caret.saturating_sub(word.len());
    (start, word.into_iter().collect())
}

/// Identifiers of at least two chars found in `text`, deduplicated.
pub fn scrape_identifiers(text: &str) -> BTreeSet<String> {
    IDENTIFIER_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|word| word.chars().count() >= MIN_IDENTIFIER_LEN)
        .map(str::to_string)
        .collect()
}

/// All candidates for `language` over the real buffer `text`.
pub fn candidates(language: Language, text: &str) -> BTreeSet<String> {
    let mut words: BTreeSet<String> = language
        .vocabulary()
        .iter()
        .map(|word| word.to_string())
        .collect();
    if language.is_code() {
        words.extend(scrape_identifiers(text));
    }
    words
}

/// Filter `words` to those extending `partial`, shortest first then lexical.
pub fn rank<'a>(words: impl IntoIterator<Item = &'a String>, partial: &str) -> Vec<String> {
    let mut ranked: Vec<String> = words
        .into_iter()
        .filter(|word| word.starts_with(partial) && word.as_str() != partial)
        .cloned()
        .collect();
    ranked.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    ranked.dedup();
    ranked
}

/// How the list was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Opened by typing a word character.
    Auto,
    /// Opened on request; an empty partial word shows everything.
    Explicit,
}

/// Suggestion list state owned by one session.
#[derive(Debug, Clone, Default)]
pub struct SuggestionState {
    items: Vec<String>,
    selected: usize,
    anchor: usize,
    partial: String,
    trigger: Option<Trigger>,
}

impl SuggestionState {
    /// Create a hidden list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while the list is shown.
    pub fn is_visible(&self) -> bool {
        self.trigger.is_some()
    }

    /// Current items, best first.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Index of the highlighted item.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The highlighted item.
    pub fn selected(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    /// The partial word the list was filtered with.
    pub fn partial(&self) -> &str {
        &self.partial
    }

    /// Recompute the list for the caret. Hides it when nothing matches, or when an automatic
    /// trigger has no partial word.
    pub fn update(
        &mut self,
        trigger: Trigger,
        language: Language,
        real_text: &str,
        display: &str,
        caret: usize,
    ) {
        let (anchor, partial) = partial_word(display, caret, language);
        if partial.is_empty() && trigger == Trigger::Auto {
            self.dismiss();
            return;
        }

        let words = candidates(language, real_text);
        let items = rank(&words, &partial);
        if items.is_empty() {
            self.dismiss();
            return;
        }

        debug!(partial = %partial, count = items.len(), "suggestions");
        let keep = self.selected().map(str::to_string);
        self.selected = keep
            .and_then(|item| items.iter().position(|i| *i == item))
            .unwrap_or(0);
        self.items = items;
        self.anchor = anchor;
        self.partial = partial;
        self.trigger = Some(trigger);
    }

    /// Refilter after a keystroke if the list is visible.
    pub fn refilter(&mut self, language: Language, real_text: &str, display: &str, caret: usize) {
        if let Some(trigger) = self.trigger {
            self.update(trigger, language, real_text, display, caret);
        }
    }

    /// Highlight the next item, wrapping around.
    pub fn next(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.selected = (self.selected + 1) % self.items.len();
        true
    }

    /// Highlight the previous item, wrapping around.
    pub fn previous(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let len = self.items.len();
        self.selected = (self.selected % len + len - 1) % len;
        true
    }

    /// The display range to replace and the word to insert, then hide the list.
    pub fn accept(&mut self) -> Option<(Selection, String)> {
        let item = self.selected()?.to_string();
        let range = Selection::new(self.anchor, self.anchor + self.partial.chars().count());
        self.dismiss();
        Some((range, item))
    }

    /// Hide the list.
    pub fn dismiss(&mut self) {
        self.items.clear();
        self.selected = 0;
        self.partial.clear();
        self.trigger = None;
    }
}
