//! Part-of-speech filter.
//!
//! Asks a [`MorphAnalyzer`] for each token's grammatical category and
//! removes tokens whose category is in the excluded set. The token text is
//! never lemmatized: surviving tokens keep their original surface form.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use lectio::analysis::morphology::FunctionWordAnalyzer;
//! use lectio::analysis::token::Token;
//! use lectio::analysis::token_filter::Filter;
//! use lectio::analysis::token_filter::part_of_speech::PartOfSpeechFilter;
//!
//! let filter = PartOfSpeechFilter::new(Arc::new(FunctionWordAnalyzer::new()));
//! let tokens = vec![Token::new("кошка", 0), Token::new("и", 1), Token::new("собака", 2)];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[1].text, "собака");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::analysis::morphology::{MorphAnalyzer, PartOfSpeech};
use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that removes tokens by part of speech.
#[derive(Clone)]
pub struct PartOfSpeechFilter {
    analyzer: Arc<dyn MorphAnalyzer>,
    excluded: HashSet<PartOfSpeech>,
    remove_stopped: bool,
}

impl PartOfSpeechFilter {
    /// Create a filter that drops [`PartOfSpeech::FUNCTION_WORDS`].
    pub fn new(analyzer: Arc<dyn MorphAnalyzer>) -> Self {
        Self::with_excluded(analyzer, PartOfSpeech::FUNCTION_WORDS)
    }

    /// Create a filter that drops the given categories.
    pub fn with_excluded<I>(analyzer: Arc<dyn MorphAnalyzer>, excluded: I) -> Self
    where
        I: IntoIterator<Item = PartOfSpeech>,
    {
        PartOfSpeechFilter {
            analyzer,
            excluded: excluded.into_iter().collect(),
            remove_stopped: true,
        }
    }

    /// Set whether to remove excluded tokens entirely or just mark them as stopped.
    pub fn remove_stopped(mut self, remove: bool) -> Self {
        self.remove_stopped = remove;
        self
    }

    /// The excluded categories.
    pub fn excluded(&self) -> &HashSet<PartOfSpeech> {
        &self.excluded
    }

    /// Check whether `pos` is excluded.
    pub fn is_excluded(&self, pos: PartOfSpeech) -> bool {
        self.excluded.contains(&pos)
    }
}

impl Filter for PartOfSpeechFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let mut filtered_tokens: Vec<Token> = Vec::new();

        for token in tokens {
            if token.is_stopped() {
                filtered_tokens.push(token);
                continue;
            }

            let pos = match token.part_of_speech() {
                Some(pos) => Some(pos),
                None => self.analyzer.part_of_speech(&token.text)?,
            };

            match pos {
                Some(pos) if self.is_excluded(pos) => {
                    if !self.remove_stopped {
                        filtered_tokens.push(token.with_part_of_speech(pos).stop());
                    }
                }
                Some(pos) => filtered_tokens.push(token.with_part_of_speech(pos)),
                None => filtered_tokens.push(token),
            }
        }

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "part_of_speech"
    }
}

impl std::fmt::Debug for PartOfSpeechFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartOfSpeechFilter")
            .field("analyzer", &self.analyzer.name())
            .field("excluded", &self.excluded)
            .field("remove_stopped", &self.remove_stopped)
            .finish()
    }
}
