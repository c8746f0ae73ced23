//! Features describing a voter and their relation to each debater.

use crate::data::{Debates, User, Users};
use crate::votes::ChangeRule;
use std::collections::{BTreeMap, BTreeSet};

/// Number of "big issues" every user profile is encoded over.
pub const BIG_ISSUES: usize = 48;

/// Ideology value that never matches anything.
pub const NOT_SAYING: &str = "Not Saying";

/// One-hot stance per issue: `[Pro, Con, Undecided, Not Opinioned]`.
pub type IssueMatrix = [[f64; 4]; BIG_ISSUES];

/// Issue names shared by every user, in sorted order. Each name owns one row
/// of an [`IssueMatrix`], so users with different issue sets still line up
/// issue-for-issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueIndex {
    names: Vec<String>,
}

impl IssueIndex {
    /// Sorted union of every user's issue names. Names past the 48th are
    /// dropped with a warning.
    pub fn from_users(users: &Users) -> Self {
        let names: BTreeSet<&str> = users
            .values()
            .flat_map(|u| u.big_issues_dict.keys().map(String::as_str))
            .collect();
        if names.len() > BIG_ISSUES {
            tracing::warn!(issues = names.len(), kept = BIG_ISSUES, "more big issues than slots");
        }
        IssueIndex {
            names: names.into_iter().take(BIG_ISSUES).map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// One-hot encode `user`'s stances. Issues the user did not answer, and
    /// unrecognised stances, encode as a zero row.
    pub fn matrix(&self, user: &User) -> IssueMatrix {
        let mut matrix = [[0.0; 4]; BIG_ISSUES];
        for (row, name) in matrix.iter_mut().zip(&self.names) {
            if let Some(idx) = user.big_issues_dict.get(name).and_then(|s| s.index()) {
                row[idx] = 1.0;
            }
        }
        matrix
    }
}

fn cosine(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

/// Mean per-issue cosine similarity of two users' stances, in `[-1, 1]`.
pub fn big_issues_similarity(voter: &IssueMatrix, debater: &IssueMatrix) -> f64 {
    let total: f64 = voter.iter().zip(debater).map(|(v, d)| cosine(v, d)).sum();
    total / BIG_ISSUES as f64
}

/// Which ideology to compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ideology {
    Politics,
    Religion,
}

/// 1 when both users state the same ideology, 0 when they differ or either
/// is "Not Saying".
pub fn ideology_match(voter: &User, debater: &User, ideology: Ideology) -> f64 {
    let (a, b) = match ideology {
        Ideology::Politics => (&voter.political_ideology, &debater.political_ideology),
        Ideology::Religion => (&voter.religious_ideology, &debater.religious_ideology),
    };
    if a == NOT_SAYING || b == NOT_SAYING {
        return 0.0;
    }
    f64::from(u8::from(a == b))
}

/// `(decided, undecided)`: issues with a Pro/Con stance and issues marked
/// Undecided/Not Opinioned.
pub fn decidedness(issues: &IssueMatrix) -> (f64, f64) {
    issues.iter().fold((0.0, 0.0), |(decided, undecided), row| {
        (decided + row[0] + row[1], undecided + row[2] + row[3])
    })
}

/// `[female, male, matches debater 1, matches debater 2]`; all zero when the
/// voter is neither Female nor Male.
pub fn gender_features(voter: &User, debater_1: &User, debater_2: &User) -> [f64; 4] {
    let one_hot = match voter.gender.as_str() {
        "Female" => [1.0, 0.0],
        "Male" => [0.0, 1.0],
        _ => return [0.0; 4],
    };
    let matches = |d: &User| f64::from(u8::from(d.gender == voter.gender));
    [one_hot[0], one_hot[1], matches(debater_1), matches(debater_2)]
}

/// Share of a user's votes that changed their mind in the given rows.
///
/// `voters` and `labels` are row-aligned; only rows labelled 1 count. The
/// denominator is the user's `number_of_voted_debates`, so a user who never
/// voted (or is unknown) scores 0.
pub fn persuadability(users: &Users, voters: &[String], labels: &[u8], user_name: &str) -> f64 {
    let Some(user) = users.get(user_name) else {
        return 0.0;
    };
    if user.number_of_voted_debates == 0 {
        return 0.0;
    }
    let changed = voters
        .iter()
        .zip(labels)
        .filter(|(v, &l)| l == 1 && v.as_str() == user_name)
        .count();
    changed as f64 / user.number_of_voted_debates as f64
}

/// Per-user, per-category counts of votes cast and minds changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersuadeCounts {
    pub persuaded: BTreeMap<String, BTreeMap<String, u64>>,
    pub participated: BTreeMap<String, BTreeMap<String, u64>>,
}

impl PersuadeCounts {
    /// Count every vote in `debates`, classifying it with `rule`.
    pub fn from_debates(debates: &Debates, rule: ChangeRule) -> Self {
        let mut counts = PersuadeCounts::default();
        for debate in debates.values() {
            for vote in &debate.votes {
                let user = vote.user_name.clone();
                *counts
                    .participated
                    .entry(user.clone())
                    .or_default()
                    .entry(debate.category.clone())
                    .or_insert(0) += 1;
                if rule.apply(&vote.votes_map) {
                    *counts
                        .persuaded
                        .entry(user)
                        .or_default()
                        .entry(debate.category.clone())
                        .or_insert(0) += 1;
                }
            }
        }
        counts
    }

    /// Changed / voted for one category, or over all categories when
    /// `category` is `None`. 0 for users never persuaded.
    pub fn persuadability_in(&self, user: &str, category: Option<&str>) -> f64 {
        let (Some(persuaded), Some(participated)) =
            (self.persuaded.get(user), self.participated.get(user))
        else {
            return 0.0;
        };
        let (changed, total) = match category {
            None => (persuaded.values().sum::<u64>(), participated.values().sum::<u64>()),
            Some(c) => match (persuaded.get(c), participated.get(c)) {
                (Some(&p), Some(&t)) => (p, t),
                _ => return 0.0,
            },
        };
        if total == 0 {
            0.0
        } else {
            changed as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Debate, Stance};
    use crate::votes::tests::vote;
    use proptest::prelude::*;

    fn user(gender: &str, politics: &str, religion: &str, stances: &[Stance]) -> User {
        User {
            gender: gender.into(),
            political_ideology: politics.into(),
            religious_ideology: religion.into(),
            birthday: None,
            number_of_voted_debates: 4,
            num_of_all_debates: 1,
            num_of_opinion_arguments: 0,
            big_issues_dict: stances
                .iter()
                .enumerate()
                .map(|(i, &s)| (format!("issue {i:02}"), s))
                .collect(),
        }
    }

    fn issue_matrix(u: &User) -> IssueMatrix {
        let mut users = Users::new();
        users.insert("u".into(), u.clone());
        IssueIndex::from_users(&users).matrix(u)
    }

    #[test]
    fn test_identical_users_are_similar() {
        let stances = vec![Stance::Pro; BIG_ISSUES];
        let a = issue_matrix(&user("Male", "Liberal", "Atheist", &stances));
        assert!((big_issues_similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vectors_give_zero() {
        let empty = issue_matrix(&user("Male", "", "", &[]));
        assert_eq!(big_issues_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_issues_line_up_by_name() {
        let mut a = user("Male", "", "", &[]);
        a.big_issues_dict = [("Abortion".to_string(), Stance::Pro), ("Gun Rights".to_string(), Stance::Con)]
            .into_iter()
            .collect();
        let mut b = user("Female", "", "", &[]);
        b.big_issues_dict = [("Gun Rights".to_string(), Stance::Con)].into_iter().collect();
        let mut users = Users::new();
        users.insert("a".into(), a.clone());
        users.insert("b".into(), b.clone());

        let index = IssueIndex::from_users(&users);
        assert_eq!(index.len(), 2);
        let (ma, mb) = (index.matrix(&a), index.matrix(&b));
        assert_eq!(mb[0], [0.0; 4]);
        assert_eq!(mb[1], [0.0, 1.0, 0.0, 0.0]);
        assert!((big_issues_similarity(&ma, &mb) - 1.0 / 48.0).abs() < 1e-12);
    }

    #[test]
    fn test_index_caps_at_big_issues() {
        let mut users = Users::new();
        users.insert("u".into(), user("", "", "", &vec![Stance::Pro; BIG_ISSUES + 5]));
        assert_eq!(IssueIndex::from_users(&users).len(), BIG_ISSUES);
    }

    #[test]
    fn test_ideology_match() {
        let a = user("Male", "Liberal", "Christian", &[]);
        let b = user("Female", "Liberal", "Atheist", &[]);
        let hidden = user("Female", NOT_SAYING, NOT_SAYING, &[]);
        assert_eq!(ideology_match(&a, &b, Ideology::Politics), 1.0);
        assert_eq!(ideology_match(&a, &b, Ideology::Religion), 0.0);
        assert_eq!(ideology_match(&hidden, &hidden, Ideology::Politics), 0.0);
        assert_eq!(ideology_match(&hidden, &hidden, Ideology::Religion), 0.0);
    }

    #[test]
    fn test_decidedness() {
        let u = user(
            "Male",
            "",
            "",
            &[Stance::Pro, Stance::Con, Stance::Undecided, Stance::NotOpinioned, Stance::Unknown],
        );
        assert_eq!(decidedness(&issue_matrix(&u)), (2.0, 2.0));
    }

    #[test]
    fn test_gender_features() {
        let f = user("Female", "", "", &[]);
        let m = user("Male", "", "", &[]);
        let other = user("Prefer not to say", "", "", &[]);
        assert_eq!(gender_features(&f, &f, &m), [1.0, 0.0, 1.0, 0.0]);
        assert_eq!(gender_features(&m, &f, &m), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(gender_features(&other, &other, &other), [0.0; 4]);
    }

    #[test]
    fn test_persuadability() {
        let mut users = Users::new();
        users.insert("carol".into(), user("Female", "", "", &[]));
        let mut quiet = user("Male", "", "", &[]);
        quiet.number_of_voted_debates = 0;
        users.insert("dave".into(), quiet);

        let voters = vec!["carol".to_string(), "carol".into(), "dave".into(), "carol".into()];
        let labels = vec![1, 0, 1, 1];
        assert_eq!(persuadability(&users, &voters, &labels, "carol"), 0.5);
        assert_eq!(persuadability(&users, &voters, &labels, "dave"), 0.0);
        assert_eq!(persuadability(&users, &voters, &labels, "nobody"), 0.0);
    }

    #[test]
    fn test_persuade_counts_by_category() {
        let mut debates = Debates::new();
        for (key, category, changed) in [("a", "Politics", true), ("b", "Politics", false), ("c", "Religion", true)] {
            let after = if changed { (false, true) } else { (true, true) };
            debates.insert(
                key.into(),
                Debate {
                    title: key.into(),
                    category: category.into(),
                    participant_1_name: "alice".into(),
                    participant_1_position: "Pro".into(),
                    participant_2_name: "bob".into(),
                    participant_2_position: None,
                    votes: vec![vote("carol", &[("alice", after.0, after.1), ("Tied", false, false)])],
                    rounds: Vec::new(),
                },
            );
        }
        let counts = PersuadeCounts::from_debates(&debates, ChangeRule::Tied);
        assert_eq!(counts.persuadability_in("carol", Some("Politics")), 0.5);
        assert_eq!(counts.persuadability_in("carol", Some("Religion")), 1.0);
        assert!((counts.persuadability_in("carol", None) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(counts.persuadability_in("carol", Some("Sports")), 0.0);
        assert_eq!(counts.persuadability_in("alice", None), 0.0);
    }

    proptest! {
        #[test]
        fn prop_similarity_is_bounded(a in prop::collection::vec(0usize..5, 0..60),
                                      b in prop::collection::vec(0usize..5, 0..60)) {
            let to_stances = |v: &[usize]| -> Vec<Stance> {
                v.iter().map(|&i| [Stance::Pro, Stance::Con, Stance::Undecided, Stance::NotOpinioned, Stance::Unknown][i]).collect()
            };
            let ua = issue_matrix(&user("", "", "", &to_stances(&a)));
            let ub = issue_matrix(&user("", "", "", &to_stances(&b)));
            let s = big_issues_similarity(&ua, &ub);
            prop_assert!(s.is_finite());
            prop_assert!((-1.0..=1.0).contains(&s));
        }
    }
}
