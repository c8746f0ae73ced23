//! Error types for the persuasion pipeline.
//!
//! Environment problems (missing inputs, broken lexicons, bad configuration)
//! abort the run. Data-quality problems in individual records never surface
//! here: they are skipped and counted in a [`SkipLog`](crate::SkipLog).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required input file does not exist
    #[error("missing file: {}", path.display())]
    MissingFile { path: PathBuf },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed into records
    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A lexicon or pattern rule file could not be parsed
    #[error("lexicon error in {}:{line}: {message}", path.display())]
    Lexicon {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file is not valid TOML
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Assembled matrices are not row-aligned
    #[error("dataset rows are misaligned: {rows} feature rows, {labels} labels, {voters} voters")]
    DatasetMismatch {
        rows: usize,
        labels: usize,
        voters: usize,
    },

    /// CSV report could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Cache entry could not be serialized
    #[error("cache error: {0}")]
    Cache(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap an I/O error, mapping `NotFound` to [`Error::MissingFile`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::MissingFile { path }
        } else {
            Error::Io { path, source }
        }
    }

    pub fn lexicon(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::Lexicon {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

/// Read a whole file, reporting the path on failure.
pub fn read_to_string(path: impl AsRef<std::path::Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}
