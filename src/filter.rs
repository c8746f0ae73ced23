//! Category filter over the debate collection.

use crate::data::Debates;

/// Debates of the given category that received at least one vote.
///
/// With no category (or an empty one) every debate is returned. The result is
/// always an owned copy, so callers may mutate it without touching `debates`.
pub fn filter_category(debates: &Debates, category: Option<&str>) -> Debates {
    match category {
        None | Some("") => debates.clone(),
        Some(category) => debates
            .iter()
            .filter(|(_, d)| d.category == category && !d.votes.is_empty())
            .map(|(k, d)| (k.clone(), d.clone()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Debate;
    use crate::votes::tests::vote;

    fn debate(category: &str, with_votes: bool) -> Debate {
        Debate {
            title: format!("{category} debate"),
            category: category.to_string(),
            participant_1_name: "alice".into(),
            participant_1_position: "Pro".into(),
            participant_2_name: "bob".into(),
            participant_2_position: None,
            votes: if with_votes {
                vec![vote("carol", &[("alice", true, true)])]
            } else {
                Vec::new()
            },
            rounds: Vec::new(),
        }
    }

    fn collection() -> Debates {
        let mut debates = Debates::new();
        debates.insert("a".into(), debate("Politics", true));
        debates.insert("b".into(), debate("Politics", false));
        debates.insert("c".into(), debate("Religion", true));
        debates
    }

    #[test]
    fn test_no_category_returns_independent_copy() {
        let debates = collection();
        let mut copy = filter_category(&debates, None);
        assert_eq!(copy, debates);

        copy.get_mut("a").unwrap().category = "Changed".into();
        assert_eq!(debates["a"].category, "Politics");
        assert_eq!(filter_category(&debates, Some("")), debates);
    }

    #[test]
    fn test_category_keeps_only_voted_matches() {
        let filtered = filter_category(&collection(), Some("Politics"));
        assert_eq!(filtered.keys().collect::<Vec<_>>(), vec!["a"]);
        assert!(filtered
            .values()
            .all(|d| d.category == "Politics" && !d.votes.is_empty()));
    }
}
