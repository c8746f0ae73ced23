//! Vote outcome strategies.
//!
//! The platform records, per vote, which side the voter agreed with before and
//! after reading the debate. Several research hypotheses read that record
//! differently, so each reading is its own function and [`ChangePolicy`]
//! picks one by name.
//!
//! | rule        | "changed" when                                                        |
//! |-------------|-----------------------------------------------------------------------|
//! | `tied`      | a `Tied` option exists and a debater side is agreed after, not before |
//! | `winner`    | any fully-flagged side (tie included) is agreed after, not before     |
//! | `stance`    | the side agreed before differs from the side agreed after             |
//! | `flipped`   | agreement moved from one debater to the other                         |
//! | `convinced` | agreement moved from `Tied` to a debater                              |
//!
//! A vote that only ever agrees with `Tied` is unchanged under every rule
//! except `winner`, which counts a tie that is newly agreed after the debate.

use crate::data::{SideVote, Vote, TIED};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

type VotesMap = BTreeMap<String, SideVote>;

/// True if the vote offers a `Tied` option and some debater side is agreed
/// after the debate but not before it.
pub fn changed_mind(votes: &VotesMap) -> bool {
    if !votes.contains_key(TIED) {
        return false;
    }
    votes
        .iter()
        .filter(|(side, _)| side.as_str() != TIED)
        .any(|(_, v)| v.agreed_after() && !v.agreed_before())
}

/// 1 if any side carrying both flags is agreed after but not before, else 0.
pub fn winner_label(votes: &VotesMap) -> u8 {
    let changed = votes
        .values()
        .filter(|v| v.is_complete())
        .any(|v| v.agreed_after() && !v.agreed_before());
    u8::from(changed)
}

/// Side agreed with before and after the debate. If several sides carry a
/// flag the last one in key order wins.
pub fn agreed_sides(votes: &VotesMap) -> (Option<&str>, Option<&str>) {
    let mut before = None;
    let mut after = None;
    for (side, v) in votes {
        if v.agreed_before() {
            before = Some(side.as_str());
        }
        if v.agreed_after() {
            after = Some(side.as_str());
        }
    }
    (before, after)
}

/// True if the side agreed with before differs from the side agreed after.
pub fn stance_changed(votes: &VotesMap) -> bool {
    let (before, after) = agreed_sides(votes);
    before != after
}

/// True if agreement moved from one debater to the other.
pub fn was_flipped(votes: &VotesMap) -> bool {
    match agreed_sides(votes) {
        (Some(before), Some(after)) => before != TIED && after != TIED && before != after,
        _ => false,
    }
}

/// True if the voter started undecided (`Tied`) and ended agreeing with a
/// debater.
pub fn was_convinced(votes: &VotesMap) -> bool {
    matches!(agreed_sides(votes), (Some(TIED), Some(after)) if after != TIED)
}

/// Named outcome rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeRule {
    Tied,
    Winner,
    Stance,
    Flipped,
    Convinced,
}

impl ChangeRule {
    pub fn apply(self, votes: &VotesMap) -> bool {
        match self {
            ChangeRule::Tied => changed_mind(votes),
            ChangeRule::Winner => winner_label(votes) == 1,
            ChangeRule::Stance => stance_changed(votes),
            ChangeRule::Flipped => was_flipped(votes),
            ChangeRule::Convinced => was_convinced(votes),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChangeRule::Tied => "tied",
            ChangeRule::Winner => "winner",
            ChangeRule::Stance => "stance",
            ChangeRule::Flipped => "flipped",
            ChangeRule::Convinced => "convinced",
        }
    }
}

/// Why a vote was not classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteSkip {
    /// Fewer sides than the policy's threshold
    TooFewSides,
    /// The `tied` rule needs a `Tied` option
    NoTieOption,
}

impl VoteSkip {
    pub fn reason(self) -> &'static str {
        match self {
            VoteSkip::TooFewSides => "too few sides",
            VoteSkip::NoTieOption => "no tie option",
        }
    }
}

/// A rule plus the minimum number of sides a vote must list to be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePolicy {
    pub rule: ChangeRule,
    #[serde(default)]
    pub min_sides: usize,
}

impl ChangePolicy {
    pub fn new(rule: ChangeRule, min_sides: usize) -> Self {
        ChangePolicy { rule, min_sides }
    }

    /// Classify a vote: `Ok(true)` if the voter changed their mind.
    pub fn classify(&self, vote: &Vote) -> Result<bool, VoteSkip> {
        if vote.votes_map.len() < self.min_sides {
            return Err(VoteSkip::TooFewSides);
        }
        if self.rule == ChangeRule::Tied && !vote.has_tie_option() {
            return Err(VoteSkip::NoTieOption);
        }
        Ok(self.rule.apply(&vote.votes_map))
    }
}

impl Default for ChangePolicy {
    fn default() -> Self {
        ChangePolicy::new(ChangeRule::Tied, 0)
    }
}
