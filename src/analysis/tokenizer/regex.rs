//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{LectioError, Result};

/// Default word pattern: a maximal run of Cyrillic letters or a maximal run
/// of Latin letters. Scripts never mix inside one token, and digits or
/// punctuation always break a run.
pub const WORD_PATTERN: &str = "[а-яёА-ЯЁ]+|[a-zA-Z]+";

/// A regex-based tokenizer that extracts every non-overlapping match of a
/// pattern as one token, in order of appearance.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with [`WORD_PATTERN`].
    pub fn new() -> Result<Self> {
        Self::with_pattern(WORD_PATTERN)
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| LectioError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Collect the matched words without building full tokens.
    pub fn words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pattern.find_iter(text).map(|mat| mat.as_str())
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new().expect("Default word pattern should be valid")
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .enumerate()
            .map(|(position, mat)| {
                Token::with_offsets(mat.as_str(), position, mat.start(), mat.end())
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}
