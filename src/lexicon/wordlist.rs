//! Plain word lists, one entry per line.
//!
//! Entries may be multi-word phrases ("according to"); those are matched as
//! consecutive tokens.

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
    phrases: Vec<Vec<String>>,
}

impl WordList {
    /// Build a list from in-memory entries.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = WordList::default();
        for entry in entries {
            list.insert(entry.as_ref());
        }
        list
    }

    /// Parse a word-list file. Blank lines and `;` comment lines are ignored.
    pub fn parse(content: &str) -> Self {
        Self::from_entries(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with(';')),
        )
    }

    fn insert(&mut self, entry: &str) {
        let parts: Vec<String> = entry.split_whitespace().map(str::to_lowercase).collect();
        match parts.len() {
            0 => {}
            1 => {
                self.words.extend(parts);
            }
            _ => self.phrases.push(parts),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len() + self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of list hits in a lower-cased token sequence.
    ///
    /// Matching is greedy left to right with the longest phrase first; tokens
    /// consumed by a phrase are not counted again as single words.
    pub fn count(&self, tokens: &[String]) -> usize {
        let mut hits = 0;
        let mut i = 0;
        while i < tokens.len() {
            let rest = &tokens[i..];
            let phrase = self
                .phrases
                .iter()
                .filter(|phrase| rest.starts_with(phrase.as_slice()))
                .map(Vec::len)
                .max();
            match phrase {
                Some(len) => {
                    hits += 1;
                    i += len;
                }
                None => {
                    hits += usize::from(self.words.contains(tokens[i].as_str()));
                    i += 1;
                }
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_lowercase).collect()
    }

    #[test]
    fn test_parse_skips_comments() {
        let list = WordList::parse(";;; Liu lexicon header\n\ngood\n  great \n");
        assert_eq!(list.len(), 2);
        assert!(list.contains("great"));
    }

    #[test]
    fn test_counts_words_and_phrases() {
        let list = WordList::from_entries(["evidence", "according to", "show"]);
        let text = tokens("According to the evidence the numbers show growth according to me");
        assert_eq!(list.count(&text), 4);
    }

    #[test]
    fn test_phrase_tokens_are_not_recounted() {
        let list = WordList::from_entries(["according", "according to", "to", "in my view", "in my"]);
        assert_eq!(list.count(&tokens("according to them")), 1);
        assert_eq!(list.count(&tokens("according to in my view")), 2);
        assert_eq!(list.count(&tokens("according , to")), 2);
    }

    #[test]
    fn test_empty_tokens() {
        let list = WordList::from_entries(["a b"]);
        assert_eq!(list.count(&[]), 0);
    }
}
