//! Dictionary-based misspelling counts.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

/// Tokens containing any of these characters are not spell-checked.
fn punctuation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[.,'"!?\-:\[\]]"#).expect("static regex"))
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// One word per line; a trailing frequency column is ignored.
    pub fn parse(content: &str) -> Self {
        Dictionary {
            words: content
                .lines()
                .filter_map(|line| line.split_whitespace().next())
                .map(str::to_lowercase)
                .collect(),
        }
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Dictionary {
            words: words.into_iter().map(str::to_lowercase).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn knows(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Distinct lower-cased tokens the dictionary does not know.
    ///
    /// Tokens with no letter or digit, tokens with punctuation and purely
    /// numeric tokens are skipped.
    pub fn unknown<'a>(&self, tokens: &'a [String]) -> BTreeSet<&'a str> {
        tokens
            .iter()
            .map(String::as_str)
            .filter(|t| t.chars().any(char::is_alphanumeric))
            .filter(|t| !punctuation().is_match(t))
            .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
            .filter(|t| !self.knows(t))
            .collect()
    }

    pub fn misspellings(&self, tokens: &[String]) -> usize {
        self.unknown(tokens).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }

    #[test]
    fn test_counts_distinct_unknown_words() {
        let dict = Dictionary::parse("the 100\ncat 20\nsat\non\nmat\n");
        let text = tokens("teh cat sat on teh matt . 42 don't");
        assert_eq!(dict.unknown(&text).into_iter().collect::<Vec<_>>(), vec!["matt", "teh"]);
        assert_eq!(dict.misspellings(&text), 2);
    }

    #[test]
    fn test_symbol_tokens_are_not_misspellings() {
        use crate::features::tokenize::{lowercase, tokenize};

        let dict = Dictionary::from_words(["hello", "world", "ok"]);
        let text = lowercase(&tokenize("Hello (world); ok / ok & ok"));
        assert!(dict.unknown(&text).is_empty());
        assert_eq!(dict.misspellings(&tokens("; ( ) / & wrold")), 1);
    }

    #[test]
    fn test_empty() {
        assert_eq!(Dictionary::default().misspellings(&[]), 0);
    }
}
