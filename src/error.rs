//! Error types for the Lectio library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`LectioError`] enum. Variants are grouped by the stage that failed so
//! callers can tell fatal input problems (I/O, configuration) apart from
//! failures that a grid search contains per combination (feature fitting,
//! training, evaluation).
//!
//! # Examples
//!
//! ```
//! use lectio::error::{LectioError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(LectioError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Lectio operations.
#[derive(Error, Debug)]
pub enum LectioError {
    /// I/O errors (list files, documents, configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, morphology, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Feature extraction errors (vocabulary fitting and pruning)
    #[error("Feature error: {0}")]
    Feature(String),

    /// Classifier usage and training errors
    #[error("Model error: {0}")]
    Model(String),

    /// Scoring errors (undefined metric)
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// Hyperparameter search errors
    #[error("Search error: {0}")]
    Search(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with LectioError.
pub type Result<T> = std::result::Result<T, LectioError>;

impl LectioError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        LectioError::Analysis(msg.into())
    }

    /// Create a new feature extraction error.
    pub fn feature<S: Into<String>>(msg: S) -> Self {
        LectioError::Feature(msg.into())
    }

    /// Create a new model error.
    pub fn model<S: Into<String>>(msg: S) -> Self {
        LectioError::Model(msg.into())
    }

    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        LectioError::Evaluation(msg.into())
    }

    /// Create a new search error.
    pub fn search<S: Into<String>>(msg: S) -> Self {
        LectioError::Search(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LectioError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        LectioError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        LectioError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        LectioError::Other(format!("Not found: {}", msg.into()))
    }

    /// Whether this error stems from bad input rather than from a model
    /// or metric that could not be computed for a particular setting.
    pub fn is_fatal_input(&self) -> bool {
        matches!(self, LectioError::Io(_) | LectioError::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = LectioError::analysis("Test analysis error");
        assert_eq!(error.to_string(), "Analysis error: Test analysis error");

        let error = LectioError::feature("empty vocabulary");
        assert_eq!(error.to_string(), "Feature error: empty vocabulary");

        let error = LectioError::invalid_config("border must be positive");
        assert_eq!(
            error.to_string(),
            "Error: Invalid configuration: border must be positive"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let lectio_error = LectioError::from(io_error);

        match lectio_error {
            LectioError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
        assert!(LectioError::from(io::Error::other("x")).is_fatal_input());
        assert!(!LectioError::model("x").is_fatal_input());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let lectio_error: LectioError = json_error.into();
        assert!(matches!(lectio_error, LectioError::Json(_)));
        assert!(lectio_error.is_fatal_input());
    }
}
