//! Dataset assembly: one row per (debate, voter).
//!
//! Debates are visited in key order, voters in vote order, so the same
//! inputs always give the same matrix.

use super::selection::FeatureSelection;
use crate::cache::{self, Cache};
use crate::data::{Debate, Debates, SkipLog, Users};
use crate::error::{Error, Result};
use crate::features::user::{
    big_issues_similarity, decidedness, gender_features, ideology_match, Ideology, IssueIndex,
};
use crate::features::{LinguisticExtractor, TfidfVectorizer};
use crate::lexicon::Lexicons;
use crate::votes::ChangePolicy;
use ndarray::Array2;

/// Feature matrix with row-aligned labels and voters.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub x: Array2<f64>,
    /// 1 when the voter changed their mind
    pub y: Vec<u8>,
    pub voters: Vec<String>,
    /// Debate key of each row
    pub debates: Vec<String>,
}

impl Dataset {
    /// Build from rows, checking that everything lines up.
    pub fn from_rows(
        rows: Vec<Vec<f64>>,
        width: usize,
        y: Vec<u8>,
        voters: Vec<String>,
        debates: Vec<String>,
    ) -> Result<Self> {
        if rows.len() != y.len() || rows.len() != voters.len() || rows.len() != debates.len() {
            return Err(Error::DatasetMismatch {
                rows: rows.len(),
                labels: y.len(),
                voters: voters.len(),
            });
        }
        let mut flat = Vec::with_capacity(rows.len() * width);
        for row in &rows {
            if row.len() != width {
                return Err(Error::Config(format!(
                    "feature row has {} columns, expected {width}",
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }
        let x = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| Error::Config(e.to_string()))?;
        Ok(Dataset { x, y, voters, debates })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn positives(&self) -> usize {
        self.y.iter().filter(|&&l| l == 1).count()
    }

    /// Rows at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(ndarray::Axis(0), indices),
            y: indices.iter().map(|&i| self.y[i]).collect(),
            voters: indices.iter().map(|&i| self.voters[i].clone()).collect(),
            debates: indices.iter().map(|&i| self.debates[i].clone()).collect(),
        }
    }

    /// Down-sample label 0 so label 1 makes up at least `threshold` of the
    /// rows: every label-1 row is kept, plus label-0 rows in order while
    /// fewer than `ones / (1 - threshold) - ones` have been kept (so a
    /// fractional target rounds up).
    pub fn balance(&self, threshold: f64) -> Dataset {
        let ones = self.positives() as f64;
        let target = ones / (1.0 - threshold) - ones;
        let mut zeros = 0usize;
        let indices: Vec<usize> = (0..self.len())
            .filter(|&i| {
                if self.y[i] == 1 {
                    true
                } else if (zeros as f64) < target {
                    zeros += 1;
                    true
                } else {
                    false
                }
            })
            .collect();
        tracing::info!(before = self.len(), after = indices.len(), "balanced dataset");
        self.subset(&indices)
    }
}

/// Rules deciding which debates and votes become rows.
#[derive(Debug, Clone, Copy)]
pub struct RowFilter {
    pub policy: ChangePolicy,
    pub min_voters: usize,
    pub exclude_participants: bool,
}

/// A debate that passed the filters, with its labelled voters.
struct Candidate<'d> {
    key: &'d str,
    debate: &'d Debate,
    pro: &'d str,
    con: &'d str,
    voters: Vec<(&'d str, u8)>,
}

pub struct DatasetBuilder<'a> {
    pub users: &'a Users,
    pub lexicons: &'a Lexicons,
    pub selection: &'a FeatureSelection,
    pub filter: RowFilter,
    pub max_tfidf_features: usize,
    pub max_ngram: usize,
}

impl<'a> DatasetBuilder<'a> {
    fn candidates<'d>(&self, debates: &'d Debates, skips: &mut SkipLog) -> Vec<Candidate<'d>> {
        let mut out = Vec::new();
        for (key, debate) in debates {
            let (pro, con) = debate.pro_con();
            if !self.users.contains_key(pro) || !self.users.contains_key(con) {
                skips.record("debater not found", key);
                continue;
            }

            let mut voters = Vec::new();
            for vote in &debate.votes {
                if self.filter.exclude_participants && debate.is_participant(&vote.user_name) {
                    skips.record("participant vote", &vote.user_name);
                    continue;
                }
                if !self.users.contains_key(&vote.user_name) {
                    skips.record("voter not found", &vote.user_name);
                    continue;
                }
                match self.filter.policy.classify(vote) {
                    Ok(changed) => voters.push((vote.user_name.as_str(), u8::from(changed))),
                    Err(skip) => skips.record(skip.reason(), format_args!("{} on {key}", vote.user_name)),
                }
            }

            if voters.len() < self.filter.min_voters {
                skips.record("too few voters", key);
                continue;
            }
            out.push(Candidate {
                key,
                debate,
                pro,
                con,
                voters,
            });
        }
        out
    }

    /// Linguistic vector of both sides, read from or written to `cache`.
    fn linguistic(
        &self,
        extractor: &LinguisticExtractor,
        candidate: &Candidate,
        texts: &(String, String),
        cache: &mut dyn Cache,
    ) -> Result<Vec<f64>> {
        let key = format!("linguistic:{}:{}", self.lexicons.fingerprint, candidate.key);
        if let Some(features) = cache::fetch::<Vec<f64>>(cache, &key) {
            if features.len() == 2 * extractor.side_width() {
                return Ok(features);
            }
        }
        let features = extractor.text_to_features(&texts.0, &texts.1);
        cache::store(cache, &key, &features)?;
        Ok(features)
    }

    pub fn build(&self, debates: &Debates, cache: &mut dyn Cache, skips: &mut SkipLog) -> Result<Dataset> {
        let candidates = self.candidates(debates, skips);
        let texts: Vec<(String, String)> = candidates.iter().map(|c| c.debate.side_texts()).collect();

        let use_tfidf = self.selection.includes("tfidf");
        let mut tfidf = TfidfVectorizer::new(self.max_tfidf_features, self.max_ngram);
        if use_tfidf {
            let documents: Vec<String> = texts
                .iter()
                .flat_map(|(pro, con)| [pro.clone(), con.clone()])
                .collect();
            tfidf.fit(&documents);
        }

        let extractor = LinguisticExtractor::new(self.lexicons);
        let side_width = extractor.side_width();
        if side_width != self.selection.linguistic_width() {
            return Err(Error::Config(format!(
                "lexicons produce {side_width} linguistic values per side, layout expects {}",
                self.selection.linguistic_width()
            )));
        }

        let issues = IssueIndex::from_users(self.users);
        let width = self.selection.width();
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        let mut voters = Vec::new();
        let mut keys = Vec::new();

        for (candidate, text) in candidates.iter().zip(&texts) {
            let linguistic = self.linguistic(&extractor, candidate, text, cache)?;
            let sides = [
                (&linguistic[..side_width], &text.0),
                (&linguistic[side_width..], &text.1),
            ];
            let side_vectors: Vec<Vec<f64>> = sides
                .iter()
                .map(|(ling, doc)| {
                    let mut v = Vec::new();
                    self.selection.select_linguistic(ling, &mut v);
                    if use_tfidf {
                        v.extend(tfidf.transform(doc));
                    }
                    v
                })
                .collect();

            let pro = &self.users[candidate.pro];
            let con = &self.users[candidate.con];
            let pro_issues = issues.matrix(pro);
            let con_issues = issues.matrix(con);

            for &(voter_name, label) in &candidate.voters {
                let voter = &self.users[voter_name];
                let voter_issues = issues.matrix(voter);
                let mut row = Vec::with_capacity(width);

                for block in self.selection.user.iter().filter(|b| b.include) {
                    match block.name {
                        "opinion" => row.extend([
                            big_issues_similarity(&voter_issues, &pro_issues),
                            big_issues_similarity(&voter_issues, &con_issues),
                        ]),
                        "pol_ideology" => row.extend([
                            ideology_match(voter, pro, Ideology::Politics),
                            ideology_match(voter, con, Ideology::Politics),
                        ]),
                        "rel_ideology" => row.extend([
                            ideology_match(voter, pro, Ideology::Religion),
                            ideology_match(voter, con, Ideology::Religion),
                        ]),
                        "decidedness" => row.push(decidedness(&voter_issues).0),
                        "undecidedness" => row.push(decidedness(&voter_issues).1),
                        "gender" => row.extend(gender_features(voter, pro, con)),
                        _ => {}
                    }
                }
                for side in &side_vectors {
                    row.extend_from_slice(side);
                }

                rows.push(row);
                labels.push(label);
                voters.push(voter_name.to_string());
                keys.push(candidate.key.to_string());
            }
        }

        tracing::info!(
            debates = candidates.len(),
            rows = rows.len(),
            columns = width,
            "assembled dataset"
        );
        Dataset::from_rows(rows, width, labels, voters, keys)
    }
}
