//! Text analysis module for Lectio.
//!
//! This module turns raw article text into the token sequence the feature
//! extractor consumes: a regex tokenizer picks out single-script words, and
//! token filters (part-of-speech exclusion, lowercasing) reshape the stream.
//! [`TextNormalizer`](analyzer::TextNormalizer) packages the standard chain.

pub mod analyzer;
pub mod morphology;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

// Re-export commonly used types
pub use analyzer::*;
pub use morphology::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
