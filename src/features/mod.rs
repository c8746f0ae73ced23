//! Feature extraction for debates and voters.
//!
//! - [`linguistic`] - lexicon counts and text statistics per debate side
//! - [`tfidf`] - n-gram TF-IDF vectors per debate side
//! - [`user`] - voter/debater similarity, demographics and persuadability

pub mod linguistic;
pub mod tfidf;
pub mod tokenize;
pub mod user;

pub use linguistic::LinguisticExtractor;
pub use tfidf::TfidfVectorizer;
pub use user::{Ideology, PersuadeCounts};
