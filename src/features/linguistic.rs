//! Linguistic features of a debate's two sides.
//!
//! Each side yields the same fixed sequence of counts and ratios; the
//! debate vector is the pro side followed by the con side.

use crate::features::tokenize::{lowercase, tokenize};
use crate::lexicon::{Lexicons, Polarity, Strength, WordList};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Per-side values that do not come from the argument pattern lexicons.
pub const BASE_FEATURES: usize = 32;

const OPPONENT_WORDS: &[&str] = &["opponent", "contendor", "pro", "con"];

const HEDGES: &[&str] = &[
    "think", "thought", "thinking", "almost", "apparent", "apparently", "appear",
    "appeared", "appears", "approximately", "around", "assume", "assumed",
    "certain amount", "certain extent", "certain level", "claim", "claimed", "doubt",
    "doubtful", "essentially", "estimate", "estimated", "feel", "felt", "frequently",
    "from our perspective", "generally", "guess", "in general", "in most cases",
    "in most instances", "in our view", "indicate", "indicated", "largely", "likely",
    "mainly", "may", "maybe", "might", "mostly", "often", "on the whole", "ought",
    "perhaps", "plausible", "plausibly", "possible", "possibly", "postulate",
    "postulated", "presumable", "probable", "probably", "relatively", "roughly",
    "seems", "should", "sometimes", "somewhat", "suggest", "suggested", "suppose",
    "suspect", "tend to", "tends to", "typical", "typically", "uncertain",
    "uncertainly", "unclear", "unclearly", "unlikely", "usually", "broadly",
    "tended to", "presumably", "suggests", "from this perspective",
    "from my perspective", "in my view", "in this view", "in our opinion",
    "in my opinion", "to my knowledge", "fairly", "quite", "rather", "argue",
    "argues", "argued", "claims", "feels", "indicates", "supposed", "supposes",
    "suspects", "postulates",
];

const EVIDENCE_WORDS: &[&str] = &[
    "evidence", "show", "shows", "say", "says", "state", "states", "according to",
    "showed", "stated", "according",
];

const FIRST_PERSON: &[&str] = &["i", "me", "my", "mine", "myself", "we", "us", "our", "ourselves"];

const SECOND_PERSON: &[&str] = &["you", "your", "yours", "yourself", "yourselves"];

const THIRD_PERSON: &[&str] = &[
    "he", "she", "his", "her", "hers", "him", "himself", "herself", "they", "them",
    "themselves",
];

/// Counted individually, in feature order.
pub const MODALS: [&str; 9] = [
    "could", "can", "would", "shall", "should", "will", "must", "may", "might",
];

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://(?:[-\w.]|(?:%[\da-fA-F]{2}))+").expect("static regex")
    })
}

/// Unique tokens over tokens, 0 for an empty text.
pub fn type_token_ratio(tokens: &[String]) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    unique.len() as f64 / tokens.len() as f64
}

/// `?` tokens not directly preceded by another `?`.
pub fn question_count(tokens: &[String]) -> usize {
    tokens
        .windows(2)
        .filter(|pair| pair[1] == "?" && pair[0] != "?")
        .count()
}

fn count_in(tokens: &[String], words: &[&str]) -> usize {
    tokens.iter().filter(|t| words.contains(&t.as_str())).count()
}

pub struct LinguisticExtractor<'a> {
    lexicons: &'a Lexicons,
    opponent: WordList,
    hedges: WordList,
    evidence: WordList,
}

impl<'a> LinguisticExtractor<'a> {
    pub fn new(lexicons: &'a Lexicons) -> Self {
        LinguisticExtractor {
            lexicons,
            opponent: WordList::from_entries(OPPONENT_WORDS),
            hedges: WordList::from_entries(HEDGES),
            evidence: WordList::from_entries(EVIDENCE_WORDS),
        }
    }

    /// Values produced for one side.
    pub fn side_width(&self) -> usize {
        BASE_FEATURES + self.lexicons.patterns.len()
    }

    /// Features of both sides, pro first.
    pub fn text_to_features(&self, pro: &str, con: &str) -> Vec<f64> {
        let mut features = self.side_features(pro);
        features.extend(self.side_features(con));
        features
    }

    pub fn side_features(&self, text: &str) -> Vec<f64> {
        let lex = self.lexicons;
        let tokens = tokenize(text);
        let lower = lowercase(&tokens);
        let mut features: Vec<f64> = Vec::with_capacity(self.side_width());

        let mut push = |n: usize| features.push(n as f64);
        push(tokens.len());
        push(self.opponent.count(&lower));
        push(self.hedges.count(&lower));
        push(self.evidence.count(&lower));

        let sentiment = lex.sentiment.polarity_scores(text);
        features.extend(sentiment.to_vec());

        for (strength, polarity) in [
            (Strength::Strong, Polarity::Positive),
            (Strength::Weak, Polarity::Positive),
            (Strength::Strong, Polarity::Negative),
            (Strength::Weak, Polarity::Negative),
        ] {
            features.push(lex.subjectivity.count(&lower, strength, polarity) as f64);
        }

        features.push(lex.offensive.count(&lower) as f64);
        features.push(lex.positive.count(&lower) as f64);
        features.push(lex.negative.count(&lower) as f64);

        for person in [FIRST_PERSON, SECOND_PERSON, THIRD_PERSON] {
            features.push(count_in(&lower, person) as f64);
        }
        for modal in MODALS {
            features.push(lower.iter().filter(|t| *t == modal).count() as f64);
        }

        features.push(lex.dictionary.misspellings(&lower) as f64);
        features.push(
            tokens
                .iter()
                .filter(|t| t.chars().all(|c| c.is_ascii_digit()))
                .count() as f64,
        );
        features.push(tokens.iter().filter(|t| *t == "!").count() as f64);
        features.push(question_count(&tokens) as f64);
        features.push(type_token_ratio(&tokens));
        features.push(url_pattern().find_iter(text).count() as f64);

        for lexicon in &lex.patterns {
            features.push(lexicon.count(text) as f64);
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::tests::write_fixture;

    fn lexicons() -> (tempfile::TempDir, Lexicons) {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_fixture(dir.path());
        let lex = Lexicons::load(&paths).unwrap();
        (dir, lex)
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_type_token_ratio() {
        assert_eq!(type_token_ratio(&[]), 0.0);
        assert_eq!(type_token_ratio(&words("a b c")), 1.0);
        assert_eq!(type_token_ratio(&words("a a b b")), 0.5);
    }

    #[test]
    fn test_question_count_collapses_runs() {
        assert_eq!(question_count(&words("why ? ? really ?")), 2);
        assert_eq!(question_count(&words("? start")), 0);
    }

    #[test]
    fn test_width_and_order() {
        let (_dir, lex) = lexicons();
        let extractor = LinguisticExtractor::new(&lex);
        assert_eq!(extractor.side_width(), 49);

        let text = "I think my opponent is wrong! According to the evidence, we must act now. \
                    You are not sure? See https://example.com for 42 reasons, clearly.";
        let f = extractor.side_features(text);
        assert_eq!(f.len(), 49);

        assert_eq!(f[1], 1.0); // opponent
        assert_eq!(f[2], 1.0); // think
        assert_eq!(f[3], 2.0); // according to, evidence
        assert_eq!(f[10], 1.0); // weak negative: wrong
        assert_eq!(f[11], 0.0); // offensive
        assert_eq!(f[12], 0.0); // positive
        assert_eq!(f[13], 1.0); // negative: wrong
        assert_eq!(f[14], 3.0); // i, my, we
        assert_eq!(f[15], 1.0); // you
        assert_eq!(f[17 + 6], 1.0); // must
        assert_eq!(f[27], 1.0); // 42
        assert_eq!(f[28], 1.0); // !
        assert_eq!(f[29], 1.0); // ?
        assert_eq!(f[31], 1.0); // url
        assert_eq!(f[32 + 1], 1.0); // doubt: "are not sure"
        assert_eq!(f[32 + 3], 1.0); // emphasis: clearly
        assert_eq!(f[32 + 4], 1.0); // necessity: must
    }

    #[test]
    fn test_empty_side() {
        let (_dir, lex) = lexicons();
        let f = LinguisticExtractor::new(&lex).side_features("");
        assert_eq!(f.len(), 49);
        assert!(f.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_both_sides_are_concatenated_deterministically() {
        let (_dir, lex) = lexicons();
        let extractor = LinguisticExtractor::new(&lex);
        let a = extractor.text_to_features("good ideas win", "bad ideas fail");
        let b = extractor.text_to_features("good ideas win", "bad ideas fail");
        assert_eq!(a.len(), 98);
        assert_eq!(a, b);
        assert_eq!(a[12], 2.0); // good, win
        assert_eq!(a[49 + 13], 2.0); // bad, fail
    }
}
