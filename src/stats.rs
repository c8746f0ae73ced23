//! Vote-outcome aggregation by debate, category and voter.
//!
//! [`StanceStats`] counts changed and unchanged votes; [`Demographics`] and
//! [`ParticipationSummary`] split the voters with enough counted votes into
//! "fickle" and "rigid" groups and summarise each group.

use crate::data::{Debates, SkipLog, Users};
use crate::votes::ChangePolicy;
use serde::Serialize;
use std::collections::BTreeMap;

/// Religious ideologies kept as their own bucket; everything else is "Other".
const KNOWN_RELIGIONS: &[&str] = &["Christian", "Agnostic", "Buddhist", "Atheist", "Not Saying"];

/// Gender values kept as their own bucket.
const KNOWN_GENDERS: &[&str] = &["Male", "Female", "Prefer not to say"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub changed: u64,
    pub unchanged: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, changed: bool) {
        if changed {
            self.changed += 1;
        } else {
            self.unchanged += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.changed + self.unchanged
    }

    /// Changed share of counted votes, 0 when nothing was counted.
    pub fn changed_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.changed as f64 / total as f64,
        }
    }
}

/// Changed/unchanged counters keyed by debate title, category and voter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StanceStats {
    pub debates: BTreeMap<String, OutcomeCounts>,
    pub categories: BTreeMap<String, OutcomeCounts>,
    pub users: BTreeMap<String, OutcomeCounts>,
}

impl StanceStats {
    /// Count every vote in `debates` under `policy`.
    ///
    /// Every debate, category and voter gets an entry, possibly empty.
    /// Participants' votes on their own debate and votes the policy cannot
    /// classify are skipped.
    pub fn from_debates(debates: &Debates, policy: &ChangePolicy, skips: &mut SkipLog) -> Self {
        let mut stats = StanceStats::default();
        for debate in debates.values() {
            stats.debates.entry(debate.title.clone()).or_default();
            stats.categories.entry(debate.category.clone()).or_default();
            for vote in &debate.votes {
                let user = stats.users.entry(vote.user_name.clone()).or_default();
                if debate.is_participant(&vote.user_name) {
                    skips.record("participant vote", &vote.user_name);
                    continue;
                }
                let changed = match policy.classify(vote) {
                    Ok(changed) => changed,
                    Err(skip) => {
                        skips.record(skip.reason(), format_args!("{} on {}", vote.user_name, debate.title));
                        continue;
                    }
                };
                user.record(changed);
                stats.debates.entry(debate.title.clone()).or_default().record(changed);
                stats.categories.entry(debate.category.clone()).or_default().record(changed);
            }
        }
        tracing::info!(
            debates = stats.debates.len(),
            categories = stats.categories.len(),
            voters = stats.users.len(),
            "aggregated vote outcomes"
        );
        stats
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FickleCounts {
    pub fickle: u64,
    pub rigid: u64,
}

impl FickleCounts {
    fn record(&mut self, fickle: bool) {
        if fickle {
            self.fickle += 1;
        } else {
            self.rigid += 1;
        }
    }
}

/// Settings for splitting voters into fickle and rigid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FickleRule {
    /// Changed share above which a voter is fickle
    pub threshold: f64,
    /// Voters with fewer counted votes are left out
    pub min_votes: u64,
}

impl Default for FickleRule {
    fn default() -> Self {
        FickleRule {
            threshold: 0.6,
            min_votes: 2,
        }
    }
}

impl FickleRule {
    /// `None` when the voter has too few counted votes.
    pub fn classify(&self, counts: &OutcomeCounts) -> Option<bool> {
        if counts.total() < self.min_votes || counts.total() == 0 {
            return None;
        }
        Some(counts.changed_ratio() > self.threshold)
    }
}

pub fn gender_bucket(gender: &str) -> &str {
    if KNOWN_GENDERS.contains(&gender) {
        gender
    } else {
        "Other"
    }
}

pub fn religion_bucket(religion: &str) -> &str {
    let first = match religion.split_whitespace().next() {
        Some(word) if religion != "Not Saying" => word,
        _ => religion,
    };
    if KNOWN_RELIGIONS.contains(&first) {
        first
    } else {
        "Other"
    }
}

/// Fickle/rigid voter counts by gender, political and religious ideology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Demographics {
    /// Voters with enough counted votes and a user profile
    pub relevant_users: u64,
    pub gender: BTreeMap<String, FickleCounts>,
    pub political: BTreeMap<String, FickleCounts>,
    pub religious: BTreeMap<String, FickleCounts>,
}

impl Demographics {
    pub fn from_users(users: &Users, stats: &StanceStats, rule: &FickleRule) -> Self {
        let mut demo = Demographics::default();
        for (name, counts) in &stats.users {
            let (Some(user), Some(fickle)) = (users.get(name), rule.classify(counts)) else {
                continue;
            };
            demo.relevant_users += 1;
            demo.gender
                .entry(gender_bucket(&user.gender).to_string())
                .or_default()
                .record(fickle);
            demo.political
                .entry(user.political_ideology.clone())
                .or_default()
                .record(fickle);
            demo.religious
                .entry(religion_bucket(&user.religious_ideology).to_string())
                .or_default()
                .record(fickle);
        }
        demo
    }
}

/// Head count and summed activity of one group of voters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParticipationTotals {
    pub users: u64,
    pub debates: u64,
    pub votes: u64,
    pub arguments: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticipationSummary {
    pub fickle: ParticipationTotals,
    pub rigid: ParticipationTotals,
}

impl ParticipationSummary {
    pub fn from_users(users: &Users, stats: &StanceStats, rule: &FickleRule) -> Self {
        let mut summary = ParticipationSummary::default();
        for (name, counts) in &stats.users {
            let (Some(user), Some(fickle)) = (users.get(name), rule.classify(counts)) else {
                continue;
            };
            let group = if fickle {
                &mut summary.fickle
            } else {
                &mut summary.rigid
            };
            group.users += 1;
            group.debates += user.num_of_all_debates;
            group.votes += user.number_of_voted_debates;
            group.arguments += user.num_of_opinion_arguments;
        }
        summary
    }
}
