//! End-to-end runs: training/evaluation, stats and result averaging.

use super::config::Config;
use super::crossval::KFold;
use super::dataset::{Dataset, DatasetBuilder, RowFilter};
use super::evaluate::{append_result, average_results, cross_validate, EvaluationOptions, EvaluationResult};
use super::logistic::LogisticParams;
use super::report;
use super::selection::FeatureSelection;
use crate::cache::{Cache, JsonFileCache, NoCache};
use crate::data::{load_debates, load_users, Debates, SkipLog, Users};
use crate::error::Result;
use crate::features::PersuadeCounts;
use crate::filter::filter_category;
use crate::lexicon::Lexicons;
use crate::stats::{Demographics, ParticipationSummary, StanceStats};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// Load debates (narrowed to the configured category) and users.
pub fn load_inputs(config: &Config, skips: &mut SkipLog) -> Result<(Debates, Users)> {
    let debates = load_debates(&config.data.debates, skips)?;
    let users = load_users(&config.data.users, skips)?;
    let debates = filter_category(&debates, config.category());
    tracing::info!(
        debates = debates.len(),
        users = users.len(),
        category = config.category().unwrap_or("all"),
        "loaded inputs"
    );
    Ok((debates, users))
}

pub fn open_cache(config: &Config) -> Result<Box<dyn Cache>> {
    Ok(match &config.output.cache_dir {
        Some(dir) => Box::new(JsonFileCache::open(dir)?),
        None => Box::new(NoCache),
    })
}

/// Resolve the feature toggles against the loaded lexicons.
pub fn feature_selection(config: &Config, lexicons: &Lexicons) -> Result<FeatureSelection> {
    FeatureSelection::new(
        &config.dataset.features,
        lexicons.patterns.len(),
        config.dataset.max_tfidf_features,
    )
}

/// Assemble the dataset and apply the optional down-sampling.
pub fn build_dataset(
    config: &Config,
    debates: &Debates,
    users: &Users,
    lexicons: &Lexicons,
    selection: &FeatureSelection,
    cache: &mut dyn Cache,
    skips: &mut SkipLog,
) -> Result<Dataset> {
    let builder = DatasetBuilder {
        users,
        lexicons,
        selection,
        filter: RowFilter {
            policy: config.votes.dataset,
            min_voters: config.dataset.min_voters,
            exclude_participants: config.dataset.exclude_participants,
        },
        max_tfidf_features: config.dataset.max_tfidf_features,
        max_ngram: config.dataset.max_ngram,
    };
    let data = builder.build(debates, cache, skips)?;
    Ok(match config.dataset.balance_threshold {
        Some(threshold) => data.balance(threshold),
        None => data,
    })
}

pub fn evaluation_options(config: &Config, selection: &FeatureSelection) -> EvaluationOptions {
    EvaluationOptions {
        folds: KFold::new(config.training.folds, config.training.seed),
        scaling: config.training.scaling,
        model: LogisticParams::from(&config.training),
        persuade: selection.includes("persuade"),
    }
}

/// Load, assemble, cross-validate and report.
pub fn run_training(config: &Config) -> Result<EvaluationResult> {
    let start = Instant::now();
    let mut skips = SkipLog::new();

    let (debates, users) = load_inputs(config, &mut skips)?;
    let lexicons = Lexicons::load(&config.lexicons)?;
    let selection = feature_selection(config, &lexicons)?;
    tracing::debug!(columns = ?selection.column_names(), "feature layout");
    let mut cache = open_cache(config)?;

    let data = build_dataset(config, &debates, &users, &lexicons, &selection, cache.as_mut(), &mut skips)?;
    skips.log_summary("dataset");
    report::print_skips(&skips);
    report::print_dataset(&data, selection.width());

    let options = evaluation_options(config, &selection);
    let result = cross_validate(&config.output.model_name, &data, &users, &options)?;
    report::print_evaluation(&result);

    if let Some(path) = &config.output.results_csv {
        append_result(path, &result)?;
        println!("  ✓ Result appended to {}", path.display());
    }
    println!("Total time: {:.2}s\n", start.elapsed().as_secs_f64());
    Ok(result)
}

/// Vote-outcome statistics, demographics and participation tables.
pub fn run_stats(config: &Config) -> Result<StanceStats> {
    let mut skips = SkipLog::new();
    let (debates, users) = load_inputs(config, &mut skips)?;

    let stats = StanceStats::from_debates(&debates, &config.votes.stats, &mut skips);
    let rule = config.stats.fickle_rule();
    let demo = Demographics::from_users(&users, &stats, &rule);
    let participation = ParticipationSummary::from_users(&users, &stats, &rule);
    let persuade = PersuadeCounts::from_debates(&debates, config.votes.stats.rule);
    skips.log_summary("stats");

    report::print_skips(&skips);
    report::print_stats(&stats, &demo, &participation);
    let mut written = report::write_stats_tables(&config.output.report_dir, &stats, &demo, &participation)?;
    written.push(report::write_persuadability(&config.output.report_dir, &persuade)?);
    for path in written {
        println!("  ✓ Wrote {}", path.display());
    }
    Ok(stats)
}

/// Average the accuracy column of every results CSV in `dir`.
pub fn run_average(dir: &Path) -> Result<BTreeMap<String, f64>> {
    let averages = average_results(dir)?;
    report::print_averages(&averages);
    Ok(averages)
}
