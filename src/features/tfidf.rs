//! TF-IDF vectorizer over word n-grams.
//!
//! Fitted once on every side text of the surviving debates, then used to
//! turn each side into a fixed-width vector:
//!
//! - tokens are lower-cased `\b\w\w+\b` matches with English stop words removed
//! - terms are 1- to `max_ngram`-grams of consecutive tokens
//! - the vocabulary is the `max_features` most frequent terms (ties by term)
//! - `idf = ln((1 + n) / (1 + df)) + 1`, weights are raw counts times idf,
//!   L2-normalised

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below",
    "beside", "besides", "between", "beyond", "both", "but", "by", "can", "cannot",
    "could", "did", "do", "does", "doing", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "else", "elsewhere", "enough", "etc", "even", "ever", "every",
    "everyone", "everything", "everywhere", "except", "few", "first", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how",
    "however", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just",
    "last", "latter", "least", "less", "ltd", "many", "may", "me", "meanwhile", "might",
    "mine", "more", "moreover", "most", "mostly", "much", "must", "my", "myself",
    "namely", "neither", "never", "nevertheless", "next", "no", "nobody", "none",
    "noone", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
    "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "per", "perhaps", "please", "rather", "re",
    "same", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since",
    "so", "some", "somehow", "someone", "something", "sometime", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "them", "themselves",
    "then", "thence", "there", "thereafter", "thereby", "therefore", "therein",
    "thereupon", "these", "they", "this", "those", "though", "through", "throughout",
    "thru", "thus", "to", "together", "too", "toward", "towards", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein",
    "whereupon", "wherever", "whether", "which", "while", "who", "whoever", "whole",
    "whom", "whose", "why", "will", "with", "within", "without", "would", "yet", "you",
    "your", "yours", "yourself", "yourselves",
];

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static regex"))
}

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// TF-IDF vectorizer for converting side texts to fixed-width features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term to feature index mapping
    pub vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index
    pub idf: Vec<f64>,
    pub max_features: usize,
    pub max_ngram: usize,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize, max_ngram: usize) -> Self {
        TfidfVectorizer {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            max_features,
            max_ngram: max_ngram.max(1),
        }
    }

    /// Width of every transformed vector.
    pub fn width(&self) -> usize {
        self.max_features
    }

    fn terms(&self, document: &str) -> Vec<String> {
        let lower = document.to_lowercase();
        let words: Vec<&str> = word_pattern()
            .find_iter(&lower)
            .map(|m| m.as_str())
            .filter(|w| !stop_words().contains(w))
            .collect();

        let mut terms = Vec::new();
        for n in 1..=self.max_ngram {
            for window in words.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Build the vocabulary and idf weights.
    pub fn fit(&mut self, documents: &[String]) {
        let mut doc_count: HashMap<String, usize> = HashMap::new();
        let mut term_freq: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let terms = self.terms(doc);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_count.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_freq.entry(term).or_insert(0) += 1;
            }
        }

        // Most frequent first; the BTreeMap order breaks ties by term
        let mut ranked: Vec<(String, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let mut selected: Vec<String> = ranked
            .into_iter()
            .take(self.max_features)
            .map(|(term, _)| term)
            .collect();
        selected.sort();

        let n_docs = documents.len() as f64;
        self.vocabulary.clear();
        self.idf = Vec::with_capacity(selected.len());
        for (idx, term) in selected.into_iter().enumerate() {
            let df = doc_count.get(&term).copied().unwrap_or(0) as f64;
            self.idf.push(((1.0 + n_docs) / (1.0 + df)).ln() + 1.0);
            self.vocabulary.insert(term, idx);
        }

        tracing::debug!(
            documents = documents.len(),
            vocabulary = self.vocabulary.len(),
            "fitted tf-idf vocabulary"
        );
    }

    /// Transform one document into an L2-normalised vector of `width()`
    /// values. Unused slots (a vocabulary smaller than `max_features`) are 0.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut tfidf = vec![0.0; self.max_features];
        for term in self.terms(document) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                tfidf[idx] += self.idf[idx];
            }
        }

        let norm = tfidf.iter().map(|&x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for val in &mut tfidf {
                *val /= norm;
            }
        }
        tfidf
    }
}
