//! Lexicon-based sentiment proportions.
//!
//! Follows the VADER scoring scheme: every word gets a valence from the
//! lexicon (0 when absent), adjusted by preceding booster and negation words,
//! by capitalisation and by a contrastive "but". The positive, neutral and
//! negative proportions are each word's contribution normalised over the
//! total, rounded to three decimals.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::OnceLock;

const BOOST: f64 = 0.293;
const CAPS_BOOST: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_BOOST: f64 = 0.292;

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "awfully", "completely", "considerably", "decidedly",
    "deeply", "enormously", "entirely", "especially", "exceptionally", "extremely",
    "fabulously", "greatly", "hella", "highly", "hugely", "incredibly", "intensely",
    "majorly", "more", "most", "particularly", "purely", "quite", "really",
    "remarkably", "so", "substantially", "thoroughly", "totally", "tremendously",
    "uber", "unbelievably", "unusually", "utterly", "very",
];

const BOOSTERS_DOWN: &[&str] = &[
    "almost", "barely", "hardly", "kind", "less", "little", "marginally",
    "occasionally", "partly", "scarcely", "slightly", "somewhat", "sort",
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt",
    "dont", "hadnt", "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither",
    "never", "none", "nope", "nor", "not", "nothing", "nowhere", "oughtnt",
    "shant", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
];

fn set(words: &'static [&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

fn boosters_up() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| set(BOOSTERS_UP))
}

fn boosters_down() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| set(BOOSTERS_DOWN))
}

fn is_negation(word: &str) -> bool {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    let negations = SET.get_or_init(|| set(NEGATIONS));
    let plain: String = word.chars().filter(|&c| c != '\'').collect();
    negations.contains(plain.as_str()) || word.ends_with("n't")
}

/// Sentiment proportions, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SentimentScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentScores {
    pub fn to_vec(self) -> Vec<f64> {
        vec![self.positive, self.neutral, self.negative]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer {
    valence: HashMap<String, f64>,
}

impl SentimentAnalyzer {
    /// Parse a `word<TAB>mean-valence[<TAB>...]` lexicon.
    pub fn parse(content: &str, source: &Path) -> Result<Self> {
        let mut valence = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = if line.contains('\t') {
                line.split('\t').collect()
            } else {
                line.split_whitespace().collect()
            };

            let word = fields[0].trim().to_lowercase();
            let score = fields
                .get(1)
                .and_then(|s| s.trim().parse::<f64>().ok())
                .ok_or_else(|| Error::lexicon(source, idx + 1, "expected `word<TAB>valence`"))?;
            valence.insert(word, score);
        }
        Ok(SentimentAnalyzer { valence })
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        SentimentAnalyzer {
            valence: pairs
                .into_iter()
                .map(|(w, v)| (w.to_lowercase(), v))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.valence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valence.is_empty()
    }

    /// Score untokenized text.
    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let words: Vec<&str> = text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|w| w.chars().count() > 1)
            .collect();
        if words.is_empty() {
            return SentimentScores::default();
        }

        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let mixed_case = words.iter().any(|w| is_shouting(w)) && words.iter().any(|w| !is_shouting(w));

        let mut sentiments: Vec<f64> = Vec::with_capacity(words.len());
        for (i, word) in lower.iter().enumerate() {
            let mut v = match self.valence.get(word) {
                Some(&v) if !boosters_up().contains(word.as_str()) => v,
                _ => 0.0,
            };
            if v != 0.0 {
                if mixed_case && is_shouting(words[i]) {
                    v += CAPS_BOOST * v.signum();
                }
                for (distance, damp) in [(1usize, 1.0), (2, 0.95), (3, 0.9)] {
                    let Some(prev) = i.checked_sub(distance).map(|j| lower[j].as_str()) else {
                        break;
                    };
                    if boosters_up().contains(prev) {
                        v += BOOST * v.signum() * damp;
                    } else if boosters_down().contains(prev) {
                        v -= BOOST * v.signum() * damp;
                    }
                    if is_negation(prev) {
                        v *= NEGATION_SCALAR;
                    }
                }
            }
            sentiments.push(v);
        }

        if let Some(but) = lower.iter().position(|w| w == "but") {
            for (i, v) in sentiments.iter_mut().enumerate() {
                if i < but {
                    *v *= 0.5;
                } else if i > but {
                    *v *= 1.5;
                }
            }
        }

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neutral = 0.0;
        for &v in &sentiments {
            if v > 0.0 {
                pos_sum += v + 1.0;
            } else if v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neutral += 1.0;
            }
        }

        let emphasis = text.matches('!').count().min(4) as f64 * EXCLAMATION_BOOST;
        if pos_sum > neg_sum.abs() {
            pos_sum += emphasis;
        } else if pos_sum < neg_sum.abs() {
            neg_sum -= emphasis;
        }

        let total = pos_sum + neg_sum.abs() + neutral;
        if total == 0.0 {
            return SentimentScores::default();
        }
        SentimentScores {
            positive: round3(pos_sum.abs() / total),
            neutral: round3(neutral / total),
            negative: round3(neg_sum.abs() / total),
        }
    }
}

fn is_shouting(word: &str) -> bool {
    word.chars().any(char::is_alphabetic) && !word.chars().any(char::is_lowercase)
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
