//! Cross-validation fold assignment.
//!
//! Includes:
//! - K-Fold: contiguous (optionally shuffled) folds over sample indices
//! - Stratified K-Fold: every fold keeps the class proportions of the data

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::corpus::Label;
use crate::error::{LectioError, Result};

/// How samples are assigned to folds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldStrategy {
    KFold,
    #[default]
    Stratified,
}

/// Cross-validation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvConfig {
    /// Number of folds.
    pub n_splits: usize,
    pub strategy: FoldStrategy,
    /// Shuffle sample order before cutting folds.
    pub shuffle: bool,
    /// Seed used when `shuffle` is set.
    pub seed: u64,
}

impl Default for CvConfig {
    fn default() -> Self {
        CvConfig {
            n_splits: 5,
            strategy: FoldStrategy::Stratified,
            shuffle: false,
            seed: 42,
        }
    }
}

/// One train/test split. Indices are sorted and disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl CvConfig {
    pub fn new(n_splits: usize) -> Self {
        CvConfig {
            n_splits,
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: FoldStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    /// Compute the splits for a labeled training set.
    ///
    /// Every sample lands in exactly one test fold.
    pub fn splits(&self, labels: &[Label]) -> Result<Vec<CvSplit>> {
        if self.n_splits < 2 {
            return Err(LectioError::invalid_config(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        let n_samples = labels.len();
        if n_samples < self.n_splits {
            return Err(LectioError::invalid_config(format!(
                "cannot cut {} folds from {} samples",
                self.n_splits, n_samples
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut fold_of = vec![0usize; n_samples];

        match self.strategy {
            FoldStrategy::KFold => {
                let mut indices: Vec<usize> = (0..n_samples).collect();
                if self.shuffle {
                    indices.shuffle(&mut rng);
                }
                self.assign_contiguous(&indices, &mut fold_of);
            }
            FoldStrategy::Stratified => {
                for class in [Label::Interesting, Label::Boring] {
                    let mut members: Vec<usize> =
                        (0..n_samples).filter(|&i| labels[i] == class).collect();
                    if members.len() < self.n_splits {
                        return Err(LectioError::invalid_config(format!(
                            "class '{}' has {} members, fewer than n_splits = {}",
                            class,
                            members.len(),
                            self.n_splits
                        )));
                    }
                    if self.shuffle {
                        members.shuffle(&mut rng);
                    }
                    self.assign_contiguous(&members, &mut fold_of);
                }
            }
        }

        Ok((0..self.n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..n_samples).partition(|&i| fold_of[i] == fold);
                CvSplit { train, test }
            })
            .collect())
    }

    /// Cut `indices` into `n_splits` contiguous chunks; the first
    /// `len % n_splits` chunks get one extra sample.
    fn assign_contiguous(&self, indices: &[usize], fold_of: &mut [usize]) {
        let base = indices.len() / self.n_splits;
        let extra = indices.len() % self.n_splits;
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            for &i in &indices[start..start + size] {
                fold_of[i] = fold;
            }
            start += size;
        }
    }
}
