//! Debate and user records, and the JSON loaders that read them.
//!
//! Both collections are keyed maps in the raw dumps (`topic -> debate`,
//! `username -> user`). They are held in `BTreeMap`s so every pass over them
//! visits records in the same order.

use crate::error::{read_to_string, Error, Result};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

/// Side name used for the "neither debater" option of a vote.
pub const TIED: &str = "Tied";

/// Position string marking the affirmative debater.
pub const PRO: &str = "Pro";

/// All debates, keyed by topic.
pub type Debates = BTreeMap<String, Debate>;

/// All users, keyed by username.
pub type Users = BTreeMap<String, User>;

/// Agreement flags one voter recorded for one side of a debate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideVote {
    #[serde(rename = "Agreed with before the debate", default)]
    pub before: Option<bool>,
    #[serde(rename = "Agreed with after the debate", default)]
    pub after: Option<bool>,
}

impl SideVote {
    pub fn new(before: bool, after: bool) -> Self {
        SideVote {
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn agreed_before(&self) -> bool {
        self.before.unwrap_or(false)
    }

    pub fn agreed_after(&self) -> bool {
        self.after.unwrap_or(false)
    }

    /// Both flags were present in the raw record.
    pub fn is_complete(&self) -> bool {
        self.before.is_some() && self.after.is_some()
    }
}

/// One user's vote on one debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user_name: String,
    /// Side name (debater username or [`TIED`]) to agreement flags
    pub votes_map: BTreeMap<String, SideVote>,
}

impl Vote {
    pub fn has_tie_option(&self) -> bool {
        self.votes_map.contains_key(TIED)
    }
}

/// A side-tagged block of text inside a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBlock {
    pub side: String,
    #[serde(default)]
    pub text: String,
}

/// A recorded debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debate {
    pub title: String,
    pub category: String,
    pub participant_1_name: String,
    pub participant_1_position: String,
    pub participant_2_name: String,
    #[serde(default)]
    pub participant_2_position: Option<String>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub rounds: Vec<Vec<RoundBlock>>,
}

impl Debate {
    pub fn is_participant(&self, user_name: &str) -> bool {
        self.participant_1_name == user_name || self.participant_2_name == user_name
    }

    /// Returns `(pro debater, con debater)`.
    pub fn pro_con(&self) -> (&str, &str) {
        if self.participant_1_position == PRO {
            (&self.participant_1_name, &self.participant_2_name)
        } else {
            (&self.participant_2_name, &self.participant_1_name)
        }
    }

    /// Concatenated text of all rounds, split into `(pro, con)`.
    ///
    /// Blocks not tagged `Pro` count as con text.
    pub fn side_texts(&self) -> (String, String) {
        let mut pro = String::new();
        let mut con = String::new();
        for block in self.rounds.iter().flatten() {
            if block.side == PRO {
                pro.push_str(&block.text);
            } else {
                con.push_str(&block.text);
            }
        }
        (pro, con)
    }
}

/// Stance on one of the "big issues".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Stance {
    Pro,
    Con,
    Undecided,
    NotOpinioned,
    /// Any value outside the four recognised stances
    Unknown,
}

impl From<String> for Stance {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "Pro" => Stance::Pro,
            "Con" => Stance::Con,
            "Und" | "Undecided" => Stance::Undecided,
            "N/O" | "Not Opinioned" | "No Opinion" => Stance::NotOpinioned,
            _ => Stance::Unknown,
        }
    }
}

impl Stance {
    /// Position in the one-hot encoding, `None` for [`Stance::Unknown`].
    pub fn index(self) -> Option<usize> {
        match self {
            Stance::Pro => Some(0),
            Stance::Con => Some(1),
            Stance::Undecided => Some(2),
            Stance::NotOpinioned => Some(3),
            Stance::Unknown => None,
        }
    }
}

/// A platform user with demographic attributes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub political_ideology: String,
    #[serde(default)]
    pub religious_ideology: String,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub number_of_voted_debates: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub num_of_all_debates: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub num_of_opinion_arguments: u64,
    #[serde(default)]
    pub big_issues_dict: BTreeMap<String, Stance>,
}

/// Accept counts written as numbers or numeric strings.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Float(f64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Float(f) if f >= 0.0 => Ok(f as u64),
        Raw::Float(f) => Err(D::Error::custom(format!("negative count {f}"))),
        Raw::Text(s) if s.trim().is_empty() => Ok(0),
        Raw::Text(s) => s.trim().parse().map_err(D::Error::custom),
        Raw::Null(()) => Ok(0),
    }
}

/// Counts of records skipped for data-quality reasons, by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipLog {
    counts: BTreeMap<String, usize>,
}

impl SkipLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, reason: &str, detail: impl Display) {
        tracing::debug!(reason, %detail, "skipping record");
        *self.counts.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, reason: &str) -> usize {
        self.counts.get(reason).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Emit one warning per reason so dropped data is visible in the logs.
    pub fn log_summary(&self, stage: &str) {
        for (reason, count) in self.iter() {
            tracing::warn!(stage, reason, count, "records skipped");
        }
    }
}

/// Load the debate collection from a JSON file.
///
/// Debates that do not match the record shape are skipped and counted under
/// `"malformed debate"`.
pub fn load_debates(path: impl AsRef<Path>, skips: &mut SkipLog) -> Result<Debates> {
    load_records(path.as_ref(), "malformed debate", skips)
}

/// Load the user collection from a JSON file.
pub fn load_users(path: impl AsRef<Path>, skips: &mut SkipLog) -> Result<Users> {
    load_records(path.as_ref(), "malformed user", skips)
}

fn load_records<T: DeserializeOwned>(
    path: &Path,
    reason: &str,
    skips: &mut SkipLog,
) -> Result<BTreeMap<String, T>> {
    let content = read_to_string(path)?;
    let raw: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let total = raw.len();
    let mut records = BTreeMap::new();
    for (key, value) in raw {
        match serde_json::from_value::<T>(value) {
            Ok(record) => {
                records.insert(key, record);
            }
            Err(e) => skips.record(reason, format_args!("{key}: {e}")),
        }
    }

    tracing::info!(
        path = %path.display(),
        loaded = records.len(),
        skipped = total - records.len(),
        "loaded records"
    );
    Ok(records)
}
