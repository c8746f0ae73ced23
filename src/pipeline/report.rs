//! Printed summaries and CSV tables.

use super::dataset::Dataset;
use super::evaluate::EvaluationResult;
use crate::data::SkipLog;
use crate::error::{Error, Result};
use crate::features::PersuadeCounts;
use crate::stats::{Demographics, FickleCounts, OutcomeCounts, ParticipationSummary, StanceStats};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const RULE: &str = "===================================================================";

pub fn print_skips(skips: &SkipLog) {
    if skips.is_empty() {
        return;
    }
    println!("Skipped records: {}", skips.total());
    for (reason, count) in skips.iter() {
        println!("  {reason:<24} {count}");
    }
    println!();
}

pub fn print_dataset(data: &Dataset, columns: usize) {
    println!("\n{RULE}\n");
    println!("Dataset\n");
    println!("  Rows:     {}", data.len());
    println!("  Columns:  {columns}");
    println!(
        "  Changed:  {} ({:.2}%)",
        data.positives(),
        if data.is_empty() {
            0.0
        } else {
            data.positives() as f64 / data.len() as f64 * 100.0
        }
    );
    println!();
}

pub fn print_evaluation(result: &EvaluationResult) {
    println!("{RULE}\n");
    println!("Evaluation ({} folds)\n", result.fold_accuracies.len());
    for (fold, accuracy) in result.fold_accuracies.iter().enumerate() {
        println!("  Fold {}: {:.2}%", fold + 1, accuracy * 100.0);
    }
    println!();
    println!("  Model:     {}", result.model);
    println!("  Samples:   {}", result.samples);
    println!("  Accuracy:  {:.2}%", result.accuracy * 100.0);
    println!("  Baseline:  {:.2}%", result.baseline * 100.0);
    println!(
        "  vs Baseline: {:+.2} points",
        (result.accuracy - result.baseline) * 100.0
    );
    println!("\n{RULE}\n");
}

pub fn print_averages(averages: &BTreeMap<String, f64>) {
    println!("{RULE}\n");
    println!("Average accuracy\n");
    for (model, accuracy) in averages {
        println!("  {model:<32} {:.2}%", accuracy * 100.0);
    }
    println!("\n{RULE}\n");
}

fn print_counts(title: &str, counts: &BTreeMap<String, OutcomeCounts>) {
    println!("{title}:");
    for (name, c) in counts {
        println!(
            "  {name:<32} changed {:>6}  unchanged {:>6}  ({:.2}%)",
            c.changed,
            c.unchanged,
            c.changed_ratio() * 100.0
        );
    }
    println!();
}

fn print_fickle(title: &str, table: &BTreeMap<String, FickleCounts>) {
    println!("{title}:");
    for (name, c) in table {
        println!("  {name:<32} fickle {:>6}  rigid {:>6}", c.fickle, c.rigid);
    }
    println!();
}

pub fn print_stats(stats: &StanceStats, demo: &Demographics, participation: &ParticipationSummary) {
    println!("\n{RULE}\n");
    println!("Vote outcomes\n");
    let total = stats
        .categories
        .values()
        .fold(OutcomeCounts::default(), |acc, c| OutcomeCounts {
            changed: acc.changed + c.changed,
            unchanged: acc.unchanged + c.unchanged,
        });
    println!("  Debates:   {}", stats.debates.len());
    println!("  Voters:    {}", stats.users.len());
    println!(
        "  Changed:   {} of {} ({:.2}%)\n",
        total.changed,
        total.total(),
        total.changed_ratio() * 100.0
    );
    print_counts("By category", &stats.categories);

    println!("{RULE}\n");
    println!("Demographics ({} voters)\n", demo.relevant_users);
    print_fickle("Gender", &demo.gender);
    print_fickle("Political ideology", &demo.political);
    print_fickle("Religious ideology", &demo.religious);

    println!("{RULE}\n");
    println!("Participation\n");
    for (name, group) in [("fickle", &participation.fickle), ("rigid", &participation.rigid)] {
        println!(
            "  {name:<8} users {:>6}  debates {:>8}  votes {:>8}  arguments {:>8}",
            group.users, group.debates, group.votes, group.arguments
        );
    }
    println!("\n{RULE}\n");
}

#[derive(Serialize)]
struct CategoryRow<'a> {
    category: &'a str,
    changed: u64,
    unchanged: u64,
    changed_ratio: f64,
}

#[derive(Serialize)]
struct DemographicRow<'a> {
    dimension: &'a str,
    group: &'a str,
    fickle: u64,
    rigid: u64,
}

#[derive(Serialize)]
struct ParticipationRow<'a> {
    group: &'a str,
    users: u64,
    debates: u64,
    votes: u64,
    arguments: u64,
}

#[derive(Serialize)]
struct PersuadabilityRow<'a> {
    user: &'a str,
    category: &'a str,
    persuaded: u64,
    participated: u64,
    persuadability: f64,
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Write `categories.csv`, `demographics.csv` and `participation.csv` into
/// `dir`, returning the written paths.
pub fn write_stats_tables(
    dir: &Path,
    stats: &StanceStats,
    demo: &Demographics,
    participation: &ParticipationSummary,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let categories = dir.join("categories.csv");
    write_rows(
        &categories,
        stats.categories.iter().map(|(name, c)| CategoryRow {
            category: name.as_str(),
            changed: c.changed,
            unchanged: c.unchanged,
            changed_ratio: c.changed_ratio(),
        }),
    )?;

    let demographics = dir.join("demographics.csv");
    let tables = [
        ("gender", &demo.gender),
        ("political", &demo.political),
        ("religious", &demo.religious),
    ];
    write_rows(
        &demographics,
        tables.iter().flat_map(|&(dimension, table)| {
            table.iter().map(move |(group, c)| DemographicRow {
                dimension,
                group: group.as_str(),
                fickle: c.fickle,
                rigid: c.rigid,
            })
        }),
    )?;

    let participation_path = dir.join("participation.csv");
    write_rows(
        &participation_path,
        [("fickle", &participation.fickle), ("rigid", &participation.rigid)]
            .into_iter()
            .map(|(group, t)| ParticipationRow {
                group,
                users: t.users,
                debates: t.debates,
                votes: t.votes,
                arguments: t.arguments,
            }),
    )?;

    tracing::info!(dir = %dir.display(), "wrote stats tables");
    Ok(vec![categories, demographics, participation_path])
}

/// Write `persuadability.csv`: one row per user and category voted in.
pub fn write_persuadability(dir: &Path, counts: &PersuadeCounts) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let path = dir.join("persuadability.csv");
    write_rows(
        &path,
        counts.participated.iter().flat_map(|(user, categories)| {
            categories.iter().map(move |(category, &participated)| PersuadabilityRow {
                user: user.as_str(),
                category: category.as_str(),
                persuaded: counts
                    .persuaded
                    .get(user)
                    .and_then(|c| c.get(category))
                    .copied()
                    .unwrap_or(0),
                participated,
                persuadability: counts.persuadability_in(user, Some(category)),
            })
        }),
    )?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ParticipationTotals;

    #[test]
    fn test_write_stats_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut stats = StanceStats::default();
        stats
            .categories
            .insert("Politics".into(), OutcomeCounts { changed: 1, unchanged: 3 });
        let mut demo = Demographics::default();
        demo.gender.insert("Female".into(), FickleCounts { fickle: 2, rigid: 1 });
        demo.religious.insert("Other".into(), FickleCounts { fickle: 0, rigid: 4 });
        let participation = ParticipationSummary {
            fickle: ParticipationTotals { users: 1, debates: 2, votes: 3, arguments: 4 },
            rigid: ParticipationTotals::default(),
        };

        let paths = write_stats_tables(&dir.path().join("out"), &stats, &demo, &participation).unwrap();
        assert_eq!(paths.len(), 3);

        let categories = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(categories, "category,changed,unchanged,changed_ratio\nPolitics,1,3,0.25\n");

        let demographics = std::fs::read_to_string(&paths[1]).unwrap();
        assert!(demographics.contains("gender,Female,2,1\n"));
        assert!(demographics.contains("religious,Other,0,4\n"));

        let participation = std::fs::read_to_string(&paths[2]).unwrap();
        assert!(participation.contains("fickle,1,2,3,4\n"));
        assert!(participation.contains("rigid,0,0,0,0\n"));
    }

    #[test]
    fn test_write_persuadability() {
        let dir = tempfile::tempdir().unwrap();
        let mut counts = PersuadeCounts::default();
        counts
            .participated
            .entry("carol".into())
            .or_default()
            .extend([("Politics".to_string(), 2), ("Sports".to_string(), 1)]);
        counts
            .persuaded
            .entry("carol".into())
            .or_default()
            .insert("Politics".into(), 1);

        let path = write_persuadability(dir.path(), &counts).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            content,
            "user,category,persuaded,participated,persuadability\n\
             carol,Politics,1,2,0.5\n\
             carol,Sports,0,1,0.0\n"
        );
    }
}
