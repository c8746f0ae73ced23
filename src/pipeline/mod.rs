//! Dataset assembly, classifier evaluation and reporting.
//!
//! A training run goes load → filter → extract → assemble → cross-validate
//! → report:
//!
//! - [`config`] - TOML configuration
//! - [`selection`] - named feature blocks and toggles
//! - [`dataset`] - one row per (debate, voter)
//! - [`scaler`], [`logistic`], [`crossval`] - the model and its evaluation
//! - [`evaluate`] - k-fold accuracy, majority baseline, results CSV
//! - [`report`] - printed summaries and CSV tables
//! - [`train`] - end-to-end runs
//!
//! ```toml
//! [data]
//! debates = "data/debates.json"
//! users = "data/users.json"
//! category = "Politics"
//!
//! [votes.dataset]
//! rule = "winner"
//!
//! [[dataset.features]]
//! name = "tfidf"
//! include = false
//!
//! [training]
//! folds = 5
//! scaling = "per_fold"
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod crossval;
pub mod dataset;
pub mod evaluate;
pub mod logistic;
pub mod report;
pub mod scaler;
pub mod selection;
pub mod train;

pub use config::Config;
pub use dataset::{Dataset, DatasetBuilder};
pub use evaluate::{cross_validate, majority_baseline, EvaluationResult};
pub use train::{run_average, run_stats, run_training};
