//! Machine learning for article classification.
//!
//! The pieces compose leaf-first:
//!
//! - [`tfidf`] - vocabulary fitting and TF-IDF term vectors
//! - [`sgd`] - logistic regression trained by stochastic gradient descent
//! - [`evaluation`] - ROC AUC scoring
//! - [`pipeline`] - vectorizer + classifier over raw text
//! - [`cross_validation`] - fold assignment
//! - [`grid_search`] - exhaustive cross-validated hyperparameter search
//!
//! Every model implements [`Estimator`], which fixes the one-way
//! unfit → fit state machine and the probability contract.

pub mod cross_validation;
pub mod estimator;
pub mod evaluation;
pub mod grid_search;
pub mod pipeline;
pub mod sgd;
pub mod tfidf;

pub use cross_validation::{CvConfig, CvSplit, FoldStrategy};
pub use estimator::{Estimator, sigmoid};
pub use evaluation::{auc_scorer, roc_auc_score};
pub use grid_search::{
    CombinationResult, CombinationStatus, GridSearch, GridSearchOutcome, ParamSet, ParamValue,
    ParameterGrid,
};
pub use pipeline::{PipelineParams, TextPipeline};
pub use sgd::{LinearModel, Penalty, SgdClassifier, SgdParams};
pub use tfidf::{DocumentFrequency, TermVector, TfIdfParams, TfIdfVectorizer, Vocabulary};

use crate::error::LectioError;

/// Machine learning error types.
#[derive(Debug, thiserror::Error)]
pub enum MlError {
    #[error("Model not trained: {message}")]
    ModelNotTrained { message: String },

    #[error("Model already trained: {message}")]
    AlreadyTrained { message: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Training data insufficient: need at least {min_samples} samples, got {actual}")]
    InsufficientTrainingData { min_samples: usize, actual: usize },

    #[error("Training data contains a single class: {label}")]
    SingleClass { label: String },

    #[error("Invalid hyperparameter: {message}")]
    InvalidHyperparameter { message: String },
}

impl From<MlError> for LectioError {
    fn from(error: MlError) -> Self {
        match error {
            MlError::AlreadyTrained { .. } => LectioError::InvalidOperation(error.to_string()),
            other => LectioError::Model(other.to_string()),
        }
    }
}
