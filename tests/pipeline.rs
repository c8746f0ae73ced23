//! End-to-end runs over a small on-disk fixture.

use persuasion::cache::{MemoryCache, NoCache};
use persuasion::lexicon::{LexiconPaths, Lexicons, ARGUMENT_LEXICONS};
use persuasion::pipeline::config::FeatureToggle;
use persuasion::pipeline::train::{build_dataset, feature_selection, load_inputs};
use persuasion::pipeline::{run_stats, run_training, Config};
use persuasion::SkipLog;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn side(before: bool, after: bool) -> Value {
    json!({
        "Agreed with before the debate": before,
        "Agreed with after the debate": after,
    })
}

/// A vote that moved from the tie to `to`.
fn changed(user: &str, to: &str, other: &str) -> Value {
    json!({
        "user_name": user,
        "votes_map": { to: side(false, true), other: side(false, false), "Tied": side(true, false) }
    })
}

fn unchanged(user: &str, pro: &str, con: &str) -> Value {
    json!({
        "user_name": user,
        "votes_map": { pro: side(true, true), con: side(false, false), "Tied": side(false, false) }
    })
}

fn debate(title: &str, category: &str, pro: &str, con: &str, votes: Vec<Value>) -> Value {
    json!({
        "title": title,
        "category": category,
        "participant_1_name": pro,
        "participant_1_position": "Pro",
        "participant_2_name": con,
        "participant_2_position": "Con",
        "votes": votes,
        "rounds": [
            [
                { "side": "Pro", "text": format!("I think {title} is good. The evidence shows we must act now! See http://example.org") },
                { "side": "Con", "text": "My opponent is wrong. You are not sure, are you? It is bad and 42 ideas fail." }
            ],
            [
                { "side": "Pro", "text": "Clearly good ideas win." },
                { "side": "Con", "text": "He should know that stupid ideas fail." }
            ]
        ]
    })
}

fn user(gender: &str, politics: &str, religion: &str, issues: Value) -> Value {
    json!({
        "gender": gender,
        "political_ideology": politics,
        "religious_ideology": religion,
        "number_of_voted_debates": 4,
        "num_of_all_debates": 1,
        "num_of_opinion_arguments": "2",
        "big_issues_dict": issues,
    })
}

fn write_lexicons(root: &Path) -> LexiconPaths {
    let paths = LexiconPaths {
        dir: root.to_path_buf(),
        ..LexiconPaths::default()
    };
    let arg_dir = root.join(&paths.argument_dir);
    fs::create_dir_all(&arg_dir).unwrap();

    fs::write(root.join(&paths.positive), "good\ngreat\nwin\n").unwrap();
    fs::write(root.join(&paths.negative), "bad\nwrong\nfail\n").unwrap();
    fs::write(root.join(&paths.offensive), "stupid\n").unwrap();
    fs::write(
        root.join(&paths.subjectivity),
        "type=weaksubj len=1 word1=good pos1=adj stemmed1=n priorpolarity=positive\n\
         type=strongsubj len=1 word1=stupid pos1=adj stemmed1=n priorpolarity=negative\n",
    )
    .unwrap();
    fs::write(root.join(&paths.sentiment), "good\t1.9\t0.9\t[2]\nbad\t-2.5\t0.6\t[-2]\n").unwrap();
    fs::write(root.join(&paths.dictionary), "i\nthink\nis\ngood\nthe\nevidence\nshows\n").unwrap();

    fs::write(arg_dir.join("modals.tff"), "@BE={is,are}\n").unwrap();
    for name in ["spoken", "wordclasses", "pronoun", "intensifiers"] {
        fs::write(arg_dir.join(format!("{name}.tff")), "# none\n").unwrap();
    }
    for name in ARGUMENT_LEXICONS {
        let rules = match name {
            "doubt" => "\\b(@BE) not sure\\b\n",
            "necessity" => "\\bmust\\b\n\\bshould\\b\n",
            _ => "# empty\n",
        };
        fs::write(arg_dir.join(format!("{name}.tff")), rules).unwrap();
    }
    paths
}

/// Fixture directory with debates, users and lexicons, plus a config
/// pointing at it.
fn fixture(root: &Path) -> Config {
    let debates = json!({
        "abortion-debate": debate(
            "Abortion should be legal", "Politics", "alice", "bob",
            vec![
                changed("alice", "alice", "bob"),
                changed("carol", "alice", "bob"),
                changed("dave", "bob", "alice"),
                unchanged("erin", "alice", "bob"),
            ],
        ),
        "god-debate": debate(
            "God exists", "Religion", "bob", "alice",
            vec![
                unchanged("carol", "bob", "alice"),
                changed("dave", "alice", "bob"),
                unchanged("erin", "bob", "alice"),
                changed("ghost", "bob", "alice"),
            ],
        ),
        "sport-debate": debate(
            "Football beats cricket", "Sports", "bob", "alice",
            vec![changed("frank", "bob", "alice"), unchanged("erin", "bob", "alice")],
        ),
        "tax-debate": debate(
            "Taxes are too high", "Politics", "alice", "zed",
            vec![changed("carol", "alice", "zed")],
        ),
        "broken-debate": { "title": "no participants" },
    });
    let users = json!({
        "alice": user("Female", "Liberal", "Atheist", json!({"Abortion": "Pro", "Gun Rights": "Con"})),
        "bob": user("Male", "Conservative", "Christian - Catholic", json!({"Abortion": "Con"})),
        "carol": user("Female", "Liberal", "Atheist", json!({"Abortion": "Pro"})),
        "dave": user("Male", "Not Saying", "Not Saying", json!({"Abortion": "Und"})),
        "erin": user("Prefer not to say", "Conservative", "Christian - Protestant", json!({})),
        "frank": user("Male", "Liberal", "Agnostic", json!({"Gun Rights": "N/O"})),
    });

    fs::write(root.join("debates.json"), debates.to_string()).unwrap();
    fs::write(root.join("users.json"), users.to_string()).unwrap();

    let mut config = Config::default();
    config.data.debates = root.join("debates.json");
    config.data.users = root.join("users.json");
    config.lexicons = write_lexicons(&root.join("lexicons"));
    config.training.folds = 2;
    config.output.report_dir = root.join("reports");
    config
}

#[test]
fn test_dataset_rows_labels_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());

    let mut skips = SkipLog::new();
    let (debates, users) = load_inputs(&config, &mut skips).unwrap();
    assert_eq!(skips.count("malformed debate"), 1);

    let lexicons = Lexicons::load(&config.lexicons).unwrap();
    let selection = feature_selection(&config, &lexicons).unwrap();
    let data = build_dataset(&config, &debates, &users, &lexicons, &selection, &mut NoCache, &mut skips)
        .unwrap();

    assert_eq!(data.x.nrows(), data.y.len());
    assert_eq!(data.y.len(), data.voters.len());
    assert_eq!(data.x.ncols(), selection.width());
    assert_eq!(data.voters, vec!["carol", "dave", "erin", "carol", "dave", "erin", "frank", "erin"]);
    assert_eq!(data.y, vec![1, 1, 0, 0, 1, 0, 1, 0]);

    assert_eq!(skips.count("participant vote"), 1);
    assert_eq!(skips.count("voter not found"), 1);
    assert_eq!(skips.count("debater not found"), 1);
}

#[test]
fn test_dataset_is_deterministic_and_cache_transparent() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());

    let mut skips = SkipLog::new();
    let (debates, users) = load_inputs(&config, &mut skips).unwrap();
    let lexicons = Lexicons::load(&config.lexicons).unwrap();
    let selection = feature_selection(&config, &lexicons).unwrap();

    let build = |cache: &mut dyn persuasion::cache::Cache| {
        build_dataset(&config, &debates, &users, &lexicons, &selection, cache, &mut SkipLog::new()).unwrap()
    };
    let uncached = build(&mut NoCache);
    let mut memory = MemoryCache::new();
    let cold = build(&mut memory);
    assert_eq!(memory.len(), 3);
    let warm = build(&mut memory);

    assert_eq!(uncached, cold);
    assert_eq!(cold, warm);
}

#[test]
fn test_feature_exclusion_drops_columns() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path());
    config.dataset.features = vec![
        FeatureToggle { name: "tfidf".into(), include: false, width: None },
        FeatureToggle { name: "gender".into(), include: false, width: Some(4) },
    ];

    let mut skips = SkipLog::new();
    let (debates, users) = load_inputs(&config, &mut skips).unwrap();
    let lexicons = Lexicons::load(&config.lexicons).unwrap();
    let selection = feature_selection(&config, &lexicons).unwrap();
    let data = build_dataset(&config, &debates, &users, &lexicons, &selection, &mut NoCache, &mut skips)
        .unwrap();
    assert_eq!(data.x.ncols(), 8 + 2 * 49);
}

#[test]
fn test_training_run_appends_result() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path());
    config.output.results_csv = Some(dir.path().join("results").join("run.csv"));

    let result = run_training(&config).unwrap();
    assert_eq!(result.samples, 8);
    assert_eq!(result.baseline, 0.5);
    assert!((0.0..=1.0).contains(&result.accuracy));

    let written = fs::read_to_string(dir.path().join("results").join("run.csv")).unwrap();
    assert!(written.starts_with("model,samples,accuracy,baseline\nlogistic_regression,8,"));
}

#[test]
fn test_stats_counts_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let config = fixture(dir.path());

    let stats = run_stats(&config).unwrap();
    let abortion = stats.debates["Abortion should be legal"];
    assert_eq!((abortion.changed, abortion.unchanged), (2, 1));
    let politics = stats.categories["Politics"];
    assert_eq!((politics.changed, politics.unchanged), (3, 1));
    assert_eq!(stats.users["carol"].total(), 3);

    for table in ["categories.csv", "demographics.csv", "participation.csv", "persuadability.csv"] {
        assert!(dir.path().join("reports").join(table).exists());
    }
}

#[test]
fn test_category_filter_narrows_stats() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = fixture(dir.path());
    config.data.category = Some("Religion".into());

    let stats = run_stats(&config).unwrap();
    assert_eq!(stats.categories.len(), 1);
    assert_eq!(stats.debates["God exists"].changed, 2);
}
