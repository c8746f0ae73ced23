//! Word tokenizer used by every text feature.
//!
//! Words, numbers and single punctuation marks become separate tokens.
//! Contractions are split the Treebank way: `don't` -> `do`, `n't` and
//! `it's` -> `it`, `'s`.

use regex::Regex;
use std::sync::OnceLock;

fn token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\d+(?:[.,]\d+)+|\w+(?:'\w+)?|[^\w\s]").expect("static regex")
    })
}

/// Split text into tokens, keeping the original case.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in token_pattern().find_iter(text) {
        let word = m.as_str();
        match split_contraction(word) {
            Some((head, tail)) => {
                if !head.is_empty() {
                    tokens.push(head.to_string());
                }
                tokens.push(tail.to_string());
            }
            None => tokens.push(word.to_string()),
        }
    }
    tokens
}

fn split_contraction(word: &str) -> Option<(&str, &str)> {
    let apostrophe = word.find('\'')?;
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("n't") && word.len() >= 3 {
        let split = word.len() - 3;
        return Some((&word[..split], &word[split..]));
    }
    Some((&word[..apostrophe], &word[apostrophe..]))
}

/// Lower-case every token.
pub fn lowercase(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|t| t.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_is_separate() {
        assert_eq!(
            tokenize("Really?! Yes, 3.5 percent."),
            vec!["Really", "?", "!", "Yes", ",", "3.5", "percent", "."]
        );
    }

    #[test]
    fn test_contractions() {
        assert_eq!(tokenize("I don't know"), vec!["I", "do", "n't", "know"]);
        assert_eq!(tokenize("it's mine"), vec!["it", "'s", "mine"]);
    }

    #[test]
    fn test_empty() {
        assert!(tokenize("   ").is_empty());
    }
}
