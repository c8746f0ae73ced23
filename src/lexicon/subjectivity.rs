//! MPQA-style subjectivity lexicon.
//!
//! Each line is a list of `key=value` pairs, e.g.
//! `type=strongsubj len=1 word1=abandon pos1=verb stemmed1=y priorpolarity=negative`.
//! Entries are keyed by word; a token counts as a hit when any entry for it
//! has the requested strength and polarity.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Strong,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    strength: Strength,
    polarity: Polarity,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectivityLexicon {
    entries: HashMap<String, Vec<Entry>>,
}

impl SubjectivityLexicon {
    pub fn parse(content: &str, source: &Path) -> Result<Self> {
        let mut entries: HashMap<String, Vec<Entry>> = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: HashMap<&str, &str> =
                line.split_whitespace().filter_map(|kv| kv.split_once('=')).collect();

            let field = |key: &str| {
                fields
                    .get(key)
                    .copied()
                    .ok_or_else(|| Error::lexicon(source, idx + 1, format!("missing `{key}`")))
            };

            let strength = match field("type")? {
                "strongsubj" => Strength::Strong,
                "weaksubj" => Strength::Weak,
                other => {
                    return Err(Error::lexicon(source, idx + 1, format!("unknown type `{other}`")))
                }
            };
            let polarity = match field("priorpolarity")? {
                "positive" => Polarity::Positive,
                "negative" => Polarity::Negative,
                "both" => Polarity::Both,
                _ => Polarity::Neutral,
            };
            let word = field("word1")?.to_lowercase();

            let bucket = entries.entry(word).or_default();
            let entry = Entry { strength, polarity };
            if !bucket.contains(&entry) {
                bucket.push(entry);
            }
        }

        Ok(SubjectivityLexicon { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lower-cased tokens with an entry of the given kind.
    pub fn count(&self, tokens: &[String], strength: Strength, polarity: Polarity) -> usize {
        tokens
            .iter()
            .filter(|t| {
                self.entries.get(t.as_str()).is_some_and(|bucket| {
                    bucket
                        .iter()
                        .any(|e| e.strength == strength && e.polarity == polarity)
                })
            })
            .count()
    }
}
