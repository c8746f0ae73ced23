//! Configuration for the persuasion pipeline.
//!
//! Everything is read from one TOML file. Every section and field is
//! optional; missing values fall back to [`Config::default`].

use crate::error::{read_to_string, Error, Result};
use crate::lexicon::LexiconPaths;
use crate::stats::FickleRule;
use crate::votes::{ChangePolicy, ChangeRule};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub lexicons: LexiconPaths,
    pub votes: VotesConfig,
    pub dataset: DatasetConfig,
    pub training: TrainingConfig,
    pub stats: StatsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub debates: PathBuf,
    pub users: PathBuf,
    /// Restrict to one debate category; empty means all
    pub category: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            debates: PathBuf::from("data/debates.json"),
            users: PathBuf::from("data/users.json"),
            category: None,
        }
    }
}

/// Which outcome rule labels dataset rows and which one drives the stats.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct VotesConfig {
    pub dataset: ChangePolicy,
    pub stats: ChangePolicy,
}

impl Default for VotesConfig {
    fn default() -> Self {
        VotesConfig {
            dataset: ChangePolicy::new(ChangeRule::Winner, 0),
            stats: ChangePolicy::new(ChangeRule::Stance, 3),
        }
    }
}

/// One entry of the feature selection list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureToggle {
    pub name: String,
    #[serde(default = "default_true")]
    pub include: bool,
    /// Expected block width; checked against the canonical width when set
    #[serde(default)]
    pub width: Option<usize>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Debates with fewer qualifying voters are skipped
    pub min_voters: usize,
    /// Drop debaters' votes on their own debate
    pub exclude_participants: bool,
    /// Down-sample label 0 so label 1 makes up at least this share
    pub balance_threshold: Option<f64>,
    pub max_tfidf_features: usize,
    pub max_ngram: usize,
    pub features: Vec<FeatureToggle>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            min_voters: 1,
            exclude_participants: true,
            balance_threshold: None,
            max_tfidf_features: 50,
            max_ngram: 3,
            features: Vec::new(),
        }
    }
}

/// When the standardizer is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    /// On each training fold
    PerFold,
    /// Once on the whole dataset before splitting
    Full,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub folds: usize,
    pub seed: u64,
    pub scaling: Scaling,
    /// Inverse L2 regularisation strength
    pub c: f64,
    pub learning_rate: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            folds: 5,
            seed: 1,
            scaling: Scaling::PerFold,
            c: 1.0,
            learning_rate: 0.5,
            max_iter: 1000,
            tol: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    pub fickle_threshold: f64,
    pub min_votes: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        let rule = FickleRule::default();
        StatsConfig {
            fickle_threshold: rule.threshold,
            min_votes: rule.min_votes,
        }
    }
}

impl StatsConfig {
    pub fn fickle_rule(&self) -> FickleRule {
        FickleRule {
            threshold: self.fickle_threshold,
            min_votes: self.min_votes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Name written to the results CSV
    pub model_name: String,
    /// Results CSV that each training run appends a row to
    pub results_csv: Option<PathBuf>,
    /// Directory for stats tables
    pub report_dir: PathBuf,
    /// Feature cache directory; no caching when unset
    pub cache_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            model_name: "logistic_regression".to_string(),
            results_csv: None,
            report_dir: PathBuf::from("reports"),
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file is
    /// [`Error::MissingFile`] naming the path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.training.folds < 2 {
            return Err(Error::Config(format!(
                "training.folds must be at least 2, got {}",
                self.training.folds
            )));
        }
        if self.training.c <= 0.0 {
            return Err(Error::Config("training.c must be positive".into()));
        }
        if let Some(t) = self.dataset.balance_threshold {
            if !(0.0..1.0).contains(&t) {
                return Err(Error::Config(format!(
                    "dataset.balance_threshold must be in [0, 1), got {t}"
                )));
            }
        }
        Ok(())
    }

    /// Category filter with empty strings treated as "all".
    pub fn category(&self) -> Option<&str> {
        self.data.category.as_deref().filter(|c| !c.is_empty())
    }
}
