//! Exhaustive cross-validated hyperparameter search.
//!
//! [`ParameterGrid`] enumerates every combination of its named dimensions.
//! [`GridSearch::fit`] turns the grid and the cross-validation folds into a
//! flat work list of independent `(combination, fold)` tasks, fits and scores
//! a fresh [`TextPipeline`] per task (sequentially or on the rayon pool),
//! then reduces the fold scores per combination and picks the best mean.
//!
//! A combination whose fit or scoring fails on any fold is recorded as
//! failed and excluded from the comparison; the search itself only fails
//! when the grid is empty or nothing succeeded.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::corpus::Label;
use crate::error::{LectioError, Result};
use crate::ml::cross_validation::CvConfig;
use crate::ml::estimator::Estimator;
use crate::ml::evaluation::auc_scorer;
use crate::ml::pipeline::{PipelineParams, TextPipeline};

/// A single hyperparameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    /// Numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            ParamValue::Int(n) => Some(n as f64),
            ParamValue::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// One assignment of a value to every grid dimension, keyed by name.
pub type ParamSet = BTreeMap<String, ParamValue>;

/// Named dimensions, each with a finite list of candidate values.
///
/// Dimensions are ordered by name. Combinations are enumerated like an
/// odometer: the last dimension varies fastest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterGrid {
    dimensions: BTreeMap<String, Vec<ParamValue>>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a dimension.
    pub fn add<S, I, V>(mut self, name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.dimensions
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// The search grid of the reference experiment: elastic-net SGD over
    /// alpha and l1_ratio, and TF-IDF over both document-frequency bounds.
    pub fn reference() -> Self {
        ParameterGrid::new()
            .add("classifier__penalty", ["elasticnet"])
            .add("classifier__alpha", [1e-3, 1e-4, 1e-5, 1e-6, 1e-7])
            .add(
                "classifier__l1_ratio",
                [0.0, 0.01, 0.05, 0.1, 0.2, 0.3, 0.4, 0.5],
            )
            .add("tfidf__max_df", [0.85, 0.9, 0.95, 1.0])
            .add("tfidf__min_df", [0.01, 0.05, 0.1, 0.15])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dimensions.keys().map(String::as_str)
    }

    pub fn dimensions(&self) -> &BTreeMap<String, Vec<ParamValue>> {
        &self.dimensions
    }

    /// Number of combinations. A grid without dimensions has exactly one,
    /// the empty combination. Fails when the count does not fit in `usize`.
    pub fn len(&self) -> Result<usize> {
        self.dimensions
            .iter()
            .try_fold(1usize, |total, (name, values)| {
                total.checked_mul(values.len()).ok_or_else(|| {
                    LectioError::search(format!(
                        "parameter grid is too large to enumerate (overflow at dimension '{name}')"
                    ))
                })
            })
    }

    /// Whether some dimension has no values, leaving nothing to enumerate.
    pub fn is_empty(&self) -> bool {
        self.dimensions.values().any(Vec::is_empty)
    }

    /// The combination at position `index` of the enumeration.
    pub fn get(&self, index: usize) -> Option<ParamSet> {
        if index >= self.len().ok()? {
            return None;
        }
        let mut rest = index;
        let mut set = ParamSet::new();
        for (name, values) in self.dimensions.iter().rev() {
            set.insert(name.clone(), values[rest % values.len()].clone());
            rest /= values.len();
        }
        Some(set)
    }

    /// All combinations in enumeration order.
    pub fn combinations(&self) -> Result<Vec<ParamSet>> {
        Ok((0..self.len()?).filter_map(|i| self.get(i)).collect())
    }
}

/// Outcome of cross-validating one combination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CombinationStatus {
    Succeeded { mean_score: f64, std_score: f64 },
    Failed { reason: String },
}

/// One row of the search result table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombinationResult {
    /// Position in the grid enumeration.
    pub index: usize,
    pub params: ParamSet,
    /// Held-out score of every fold that completed.
    pub fold_scores: Vec<f64>,
    #[serde(flatten)]
    pub status: CombinationStatus,
}

impl CombinationResult {
    pub fn mean_score(&self) -> Option<f64> {
        match self.status {
            CombinationStatus::Succeeded { mean_score, .. } => Some(mean_score),
            CombinationStatus::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, CombinationStatus::Failed { .. })
    }
}

/// Result of [`GridSearch::fit`].
#[derive(Debug)]
pub struct GridSearchOutcome {
    /// Mean cross-validated score of the winning combination.
    pub best_score: f64,
    pub best_params: ParamSet,
    pub best_index: usize,
    /// Pipeline with the winning params, refit on the whole training set.
    pub best_estimator: TextPipeline,
    /// One entry per combination, in enumeration order.
    pub results: Vec<CombinationResult>,
}

impl GridSearchOutcome {
    pub fn n_failed(&self) -> usize {
        self.results.iter().filter(|r| r.is_failed()).count()
    }
}

/// Training and held-out data of one fold.
struct Fold {
    train_texts: Vec<String>,
    train_labels: Vec<Label>,
    test_texts: Vec<String>,
    test_labels: Vec<Label>,
}

/// Cross-validated grid search over [`TextPipeline`] hyperparameters.
#[derive(Clone, Debug)]
pub struct GridSearch {
    base: PipelineParams,
    grid: ParameterGrid,
    cv: CvConfig,
    parallel: bool,
}

impl GridSearch {
    /// Search `grid`, starting every combination from `base` params.
    pub fn new(base: PipelineParams, grid: ParameterGrid) -> Self {
        GridSearch {
            base,
            grid,
            cv: CvConfig::default(),
            parallel: false,
        }
    }

    pub fn with_cv(mut self, cv: CvConfig) -> Self {
        self.cv = cv;
        self
    }

    /// Run the (combination, fold) tasks on the rayon thread pool.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn grid(&self) -> &ParameterGrid {
        &self.grid
    }

    pub fn cv(&self) -> &CvConfig {
        &self.cv
    }

    /// Search the grid on `texts`/`labels` and refit the winner on all of them.
    pub fn fit(&self, texts: &[String], labels: &[Label]) -> Result<GridSearchOutcome> {
        if texts.len() != labels.len() {
            return Err(LectioError::search(format!(
                "{} documents but {} labels",
                texts.len(),
                labels.len()
            )));
        }
        if self.grid.is_empty() {
            return Err(LectioError::search(
                "parameter grid has a dimension without values",
            ));
        }
        self.grid.len()?;

        let folds: Vec<Fold> = self
            .cv
            .splits(labels)?
            .into_iter()
            .map(|split| Fold {
                train_texts: split.train.iter().map(|&i| texts[i].clone()).collect(),
                train_labels: split.train.iter().map(|&i| labels[i]).collect(),
                test_texts: split.test.iter().map(|&i| texts[i].clone()).collect(),
                test_labels: split.test.iter().map(|&i| labels[i]).collect(),
            })
            .collect();

        let combinations = self.grid.combinations()?;
        let candidates: Vec<Result<PipelineParams>> = combinations
            .iter()
            .map(|set| self.base.with_params(set))
            .collect();

        let tasks: Vec<(usize, usize)> = candidates
            .iter()
            .enumerate()
            .filter(|(_, params)| params.is_ok())
            .flat_map(|(c, _)| (0..folds.len()).map(move |f| (c, f)))
            .collect();

        log::info!(
            "Grid search: {} combinations x {} folds = {} fits{}",
            combinations.len(),
            folds.len(),
            tasks.len(),
            if self.parallel { " (parallel)" } else { "" }
        );

        let run_task = |&(c, f): &(usize, usize)| -> Result<f64> {
            let params = candidates[c]
                .as_ref()
                .map_err(|e| LectioError::search(e.to_string()))?;
            evaluate_fold(params.clone(), &folds[f])
        };
        let scores: Vec<Result<f64>> = if self.parallel {
            tasks.par_iter().map(run_task).collect()
        } else {
            tasks.iter().map(run_task).collect()
        };

        // Reduce per combination; tasks are grouped by combination in order.
        let mut task_scores = tasks.iter().zip(scores).peekable();
        let mut results = Vec::with_capacity(combinations.len());
        for (index, (params, candidate)) in combinations.into_iter().zip(&candidates).enumerate()
        {
            let mut fold_scores = Vec::with_capacity(folds.len());
            let mut failure: Option<String> = candidate.as_ref().err().map(|e| e.to_string());
            while let Some((_, score)) = task_scores.next_if(|((c, _), _)| *c == index) {
                match score {
                    Ok(score) => fold_scores.push(score),
                    Err(e) => {
                        failure.get_or_insert_with(|| e.to_string());
                    }
                }
            }

            let status = match failure {
                Some(reason) => {
                    log::warn!("Combination {index} {} failed: {reason}", format_params(&params));
                    CombinationStatus::Failed { reason }
                }
                None => {
                    let (mean_score, std_score) = mean_std(&fold_scores);
                    log::info!(
                        "Combination {index} {}: mean AUC {mean_score:.4} (+/- {std_score:.4})",
                        format_params(&params)
                    );
                    CombinationStatus::Succeeded {
                        mean_score,
                        std_score,
                    }
                }
            };
            results.push(CombinationResult {
                index,
                params,
                fold_scores,
                status,
            });
        }

        // Argmax with ties going to the first combination enumerated.
        let mut best: Option<(usize, f64)> = None;
        for result in &results {
            let Some(score) = result.mean_score() else {
                continue;
            };
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((result.index, score));
            }
        }
        let Some((best_index, best_score)) = best else {
            let reason = results
                .iter()
                .find_map(|r| match &r.status {
                    CombinationStatus::Failed { reason } => Some(reason.clone()),
                    CombinationStatus::Succeeded { .. } => None,
                })
                .unwrap_or_default();
            return Err(LectioError::search(format!(
                "all {} combinations failed; first failure: {reason}",
                results.len()
            )));
        };

        let best_params = results[best_index].params.clone();
        log::info!(
            "Best combination {best_index} {} with mean AUC {best_score:.4}",
            format_params(&best_params)
        );

        let mut best_estimator = TextPipeline::new(self.base.with_params(&best_params)?)?;
        best_estimator.fit(texts, labels)?;

        Ok(GridSearchOutcome {
            best_score,
            best_params,
            best_index,
            best_estimator,
            results,
        })
    }
}

/// Fit a fresh pipeline on the fold's training part and score the rest.
fn evaluate_fold(params: PipelineParams, fold: &Fold) -> Result<f64> {
    let mut pipeline = TextPipeline::new(params)?;
    pipeline.fit(&fold.train_texts, &fold.train_labels)?;
    auc_scorer(&pipeline, &fold.test_texts, &fold.test_labels)
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// `{name=value, ...}` rendering of a combination.
pub fn format_params(params: &ParamSet) -> String {
    let inner: Vec<String> = params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!("{{{}}}", inner.join(", "))
}
