//! # Persuasion - debate vote-change analysis
//!
//! Predicts whether a voter on an online debate platform changed their mind
//! after reading a debate, from what the two debaters wrote and who the voter
//! is, and aggregates vote outcomes by debate, category and demographic group.
//!
//! ## Pipeline
//!
//! 1. Load `debates.json` and `users.json` ([`data`]) and optionally keep a
//!    single category ([`filter`]).
//! 2. Label every vote as changed or unchanged ([`votes`]).
//! 3. Extract linguistic, TF-IDF and user features ([`features`], backed by
//!    the [`lexicon`] files).
//! 4. Assemble one row per (debate, voter) and cross-validate an
//!    L2-regularised logistic regression against the majority baseline
//!    ([`pipeline`]).
//! 5. Aggregate changed/unchanged counts and fickle/rigid demographics
//!    ([`stats`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use persuasion::pipeline::{run_training, Config};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     let result = run_training(&config)?;
//!     println!("accuracy {:.3} vs baseline {:.3}", result.accuracy, result.baseline);
//!     Ok(())
//! }
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! persuasion train --config config.toml --results results/run.csv
//! persuasion stats --category Politics
//! persuasion average results/
//! ```
//!
//! Set `RUST_LOG=debug` to see every skipped record.

pub mod cache;
pub mod data;
pub mod error;
pub mod features;
pub mod filter;
pub mod lexicon;
pub mod pipeline;
pub mod stats;
pub mod votes;

pub use data::{Debate, Debates, SkipLog, User, Users, Vote};
pub use error::{Error, Result};
pub use filter::filter_category;
pub use lexicon::{LexiconPaths, Lexicons};
pub use votes::{ChangePolicy, ChangeRule};
