//! Core analyzer trait definition.
//!
//! An [`Analyzer`] is a complete text processing pipeline:
//!
//! ```text
//! Raw Text → Analyzer → Token Stream
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 .. Filter N
//! ```
//!
//! # Examples
//!
//! Implementing a custom analyzer:
//!
//! ```
//! use lectio::analysis::analyzer::Analyzer;
//! use lectio::analysis::token::TokenStream;
//! use lectio::error::Result;
//!
//! struct MyAnalyzer;
//!
//! impl Analyzer for MyAnalyzer {
//!     fn analyze(&self, text: &str) -> Result<TokenStream> {
//!         Ok(Box::new(std::iter::empty()))
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "my_analyzer"
//!     }
//! }
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// The trait requires `Send + Sync` so one analyzer can be shared by the
/// parallel grid search workers.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
