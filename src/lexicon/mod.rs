//! External lexicons used by the linguistic feature extractor.
//!
//! All lexicons are plain-text files read once at startup. Any missing or
//! unparseable file aborts the run, since every debate's feature vector
//! depends on them.
//!
//! - [`wordlist`] - one-word-per-line lists (positive, negative, offensive)
//! - [`subjectivity`] - MPQA subjectivity clues
//! - [`sentiment`] - valence lexicon for sentiment proportions
//! - [`spelling`] - dictionary for misspelling counts
//! - [`patterns`] - argument pattern rules with macro expansion

pub mod patterns;
pub mod sentiment;
pub mod spelling;
pub mod subjectivity;
pub mod wordlist;

pub use patterns::{MacroTable, PatternLexicon};
pub use sentiment::{SentimentAnalyzer, SentimentScores};
pub use spelling::Dictionary;
pub use subjectivity::{Polarity, Strength, SubjectivityLexicon};
pub use wordlist::WordList;

use crate::error::{read_to_string, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Argument lexicon rule files, in feature order.
pub const ARGUMENT_LEXICONS: [&str; 17] = [
    "assessments",
    "doubt",
    "authority",
    "emphasis",
    "necessity",
    "causation",
    "generalization",
    "structure",
    "conditionals",
    "inconsistency",
    "possibility",
    "wants",
    "contrast",
    "priority",
    "difficulty",
    "inyourshoes",
    "rhetoricalquestion",
];

/// Macro definition files shared by all rule files.
pub const MACRO_FILES: [&str; 5] = ["modals", "spoken", "wordclasses", "pronoun", "intensifiers"];

/// Where each lexicon lives. Relative paths are resolved against `dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LexiconPaths {
    pub dir: PathBuf,
    pub positive: PathBuf,
    pub negative: PathBuf,
    pub offensive: PathBuf,
    pub subjectivity: PathBuf,
    pub sentiment: PathBuf,
    pub dictionary: PathBuf,
    /// Directory of `.tff` macro and rule files
    pub argument_dir: PathBuf,
    pub macro_files: Vec<String>,
    pub rule_files: Vec<String>,
}

impl Default for LexiconPaths {
    fn default() -> Self {
        LexiconPaths {
            dir: PathBuf::from("lexicons"),
            positive: PathBuf::from("liu-positive-words.txt"),
            negative: PathBuf::from("liu-negative-words.txt"),
            offensive: PathBuf::from("offensive.txt"),
            subjectivity: PathBuf::from("mpqa_lexicon.tff"),
            sentiment: PathBuf::from("vader_lexicon.txt"),
            dictionary: PathBuf::from("dictionary.txt"),
            argument_dir: PathBuf::from("argument_lexicons"),
            macro_files: MACRO_FILES.iter().map(|s| s.to_string()).collect(),
            rule_files: ARGUMENT_LEXICONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LexiconPaths {
    fn resolve(&self, path: &Path) -> PathBuf {
        self.dir.join(path)
    }

    fn argument_file(&self, name: &str) -> PathBuf {
        self.dir.join(&self.argument_dir).join(format!("{name}.tff"))
    }
}

/// Every lexicon the linguistic extractor needs.
#[derive(Debug, Clone)]
pub struct Lexicons {
    pub positive: WordList,
    pub negative: WordList,
    pub offensive: WordList,
    pub subjectivity: SubjectivityLexicon,
    pub sentiment: SentimentAnalyzer,
    pub dictionary: Dictionary,
    /// One entry per argument rule file, in feature order
    pub patterns: Vec<PatternLexicon>,
    /// Digest of every file read, used to key cached feature vectors
    pub fingerprint: String,
}

/// Reads files and feeds their bytes into the fingerprint as it goes.
struct FingerprintReader {
    hasher: Sha256,
}

impl FingerprintReader {
    fn read(&mut self, path: &Path) -> Result<String> {
        let content = read_to_string(path)?;
        self.hasher.update(path.to_string_lossy().as_bytes());
        self.hasher.update([0u8]);
        self.hasher.update(content.as_bytes());
        self.hasher.update([0u8]);
        Ok(content)
    }
}

impl Lexicons {
    pub fn load(paths: &LexiconPaths) -> Result<Self> {
        let mut reader = FingerprintReader {
            hasher: Sha256::new(),
        };

        let positive = WordList::parse(&reader.read(&paths.resolve(&paths.positive))?);
        let negative = WordList::parse(&reader.read(&paths.resolve(&paths.negative))?);
        let offensive = WordList::parse(&reader.read(&paths.resolve(&paths.offensive))?);

        let subjectivity_path = paths.resolve(&paths.subjectivity);
        let subjectivity =
            SubjectivityLexicon::parse(&reader.read(&subjectivity_path)?, &subjectivity_path)?;

        let sentiment_path = paths.resolve(&paths.sentiment);
        let sentiment = SentimentAnalyzer::parse(&reader.read(&sentiment_path)?, &sentiment_path)?;

        let dictionary = Dictionary::parse(&reader.read(&paths.resolve(&paths.dictionary))?);

        let mut macros = MacroTable::new();
        for name in &paths.macro_files {
            let path = paths.argument_file(name);
            macros.extend_from(&reader.read(&path)?, &path)?;
        }

        let mut patterns = Vec::with_capacity(paths.rule_files.len());
        for name in &paths.rule_files {
            let path = paths.argument_file(name);
            patterns.push(PatternLexicon::compile(name, &reader.read(&path)?, &macros, &path)?);
        }

        let fingerprint = format!("{:x}", reader.hasher.finalize());

        tracing::info!(
            positive = positive.len(),
            negative = negative.len(),
            offensive = offensive.len(),
            subjectivity = subjectivity.len(),
            sentiment = sentiment.len(),
            dictionary = dictionary.len(),
            macros = macros.len(),
            rules = patterns.iter().map(PatternLexicon::len).sum::<usize>(),
            "lexicons loaded"
        );

        Ok(Lexicons {
            positive,
            negative,
            offensive,
            subjectivity,
            sentiment,
            dictionary,
            patterns,
            fingerprint,
        })
    }
}
