//! K-fold evaluation of the logistic model and the results CSV.

use super::config::Scaling;
use super::crossval::KFold;
use super::dataset::Dataset;
use super::logistic::{LogisticParams, LogisticRegression};
use super::scaler::Standardizer;
use crate::data::Users;
use crate::error::{Error, Result};
use crate::features::user::persuadability;
use ndarray::{concatenate, s, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::path::Path;

/// Accuracy of always predicting the more frequent label; 0 for no rows.
pub fn majority_baseline(y: &[u8]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let mean = y.iter().map(|&l| f64::from(l)).sum::<f64>() / y.len() as f64;
    mean.max(1.0 - mean)
}

/// Settings for one cross-validation run.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationOptions {
    pub folds: KFold,
    pub scaling: Scaling,
    pub model: LogisticParams,
    /// Prepend each voter's persuadability, computed from the training fold
    pub persuade: bool,
}

/// One line of the results CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub model: String,
    pub samples: usize,
    pub accuracy: f64,
    pub baseline: f64,
    #[serde(skip)]
    pub fold_accuracies: Vec<f64>,
}

/// Persuadability column for `rows`, counted over the training rows only.
fn persuade_column(users: &Users, data: &Dataset, train: &[usize], rows: &[usize]) -> Array2<f64> {
    let voters: Vec<String> = train.iter().map(|&i| data.voters[i].clone()).collect();
    let labels: Vec<u8> = train.iter().map(|&i| data.y[i]).collect();
    let mut cache: BTreeMap<&str, f64> = BTreeMap::new();
    let values: Vec<f64> = rows
        .iter()
        .map(|&i| {
            let name = data.voters[i].as_str();
            *cache
                .entry(name)
                .or_insert_with(|| persuadability(users, &voters, &labels, name))
        })
        .collect();
    Array1::from(values).insert_axis(Axis(1))
}

/// `column` followed by the columns of `x`.
fn prepend(column: Array2<f64>, x: Array2<f64>) -> Result<Array2<f64>> {
    concatenate(Axis(1), &[column.view(), x.view()]).map_err(|e| Error::Config(e.to_string()))
}

/// Run k-fold cross-validation and report mean held-out accuracy.
pub fn cross_validate(
    model_name: &str,
    data: &Dataset,
    users: &Users,
    options: &EvaluationOptions,
) -> Result<EvaluationResult> {
    let splits = options.folds.split(data.len())?;

    let base = match options.scaling {
        Scaling::Full => Standardizer::fit_transform(&data.x).1,
        Scaling::PerFold => data.x.clone(),
    };

    let mut fold_accuracies = Vec::with_capacity(splits.len());
    for (fold, (train, test)) in splits.iter().enumerate() {
        let mut x_train = base.select(Axis(0), train);
        let mut x_test = base.select(Axis(0), test);
        if options.persuade {
            let p_train = persuade_column(users, data, train, train);
            let p_test = persuade_column(users, data, train, test);
            x_train = prepend(p_train, x_train)?;
            x_test = prepend(p_test, x_test)?;
        }

        let scaler = match options.scaling {
            Scaling::PerFold => Standardizer::fit(&x_train),
            // Only the per-fold column is still unscaled
            Scaling::Full if options.persuade => Standardizer::fit(&x_train.slice(s![.., ..1]).to_owned()),
            Scaling::Full => Standardizer { means: Vec::new(), stds: Vec::new() },
        };
        scaler.transform_inplace(&mut x_train);
        scaler.transform_inplace(&mut x_test);

        let y_train: Vec<u8> = train.iter().map(|&i| data.y[i]).collect();
        let y_test: Vec<u8> = test.iter().map(|&i| data.y[i]).collect();

        let mut model = LogisticRegression::new(options.model);
        let iterations = model.fit(&x_train, &y_train);
        let accuracy = model.accuracy(&x_test, &y_test);
        tracing::info!(fold, iterations, accuracy, "fold evaluated");
        fold_accuracies.push(accuracy);
    }

    let accuracy = fold_accuracies.iter().sum::<f64>() / fold_accuracies.len() as f64;
    Ok(EvaluationResult {
        model: model_name.to_string(),
        samples: data.len(),
        accuracy,
        baseline: majority_baseline(&data.y),
        fold_accuracies,
    })
}

/// Append `result` to the CSV at `path`, writing a header for new files.
pub fn append_result(path: &Path, result: &EvaluationResult) -> Result<()> {
    let exists = path.exists();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    let mut writer = csv::WriterBuilder::new().has_headers(!exists).from_writer(file);
    writer.serialize(result)?;
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Mean accuracy per model name over every `*.csv` file in `dir`.
pub fn average_results(dir: &Path) -> Result<BTreeMap<String, f64>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut files: Vec<_> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    files.sort();

    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for file in &files {
        let mut reader = csv::Reader::from_path(file)?;
        for row in reader.deserialize::<EvaluationResult>() {
            let row = row?;
            let entry = sums.entry(row.model).or_insert((0.0, 0));
            entry.0 += row.accuracy;
            entry.1 += 1;
        }
    }
    tracing::info!(files = files.len(), models = sums.len(), "averaged results");
    Ok(sums
        .into_iter()
        .map(|(model, (sum, n))| (model, sum / n as f64))
        .collect())
}
