//! # Lectio
//!
//! Classifies short articles as "interesting" or "boring" from their words.
//!
//! ## Features
//!
//! - Text normalization with part-of-speech filtering through a pluggable
//!   morphological analyzer
//! - TF-IDF features with document-frequency pruning
//! - Logistic regression trained by SGD with elastic-net regularization
//! - ROC AUC scoring
//! - Exhaustive cross-validated grid search, sequential or on rayon

pub mod analysis;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod experiment;
pub mod ml;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
