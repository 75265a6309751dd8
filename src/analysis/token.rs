//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline: the
//! matched text, its ordinal position, byte offsets into the source, and
//! optional metadata recorded by filters (such as the part of speech the
//! morphological analyzer assigned).
//!
//! # Examples
//!
//! ```
//! use lectio::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11);
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.end_offset, 11);
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::morphology::PartOfSpeech;

/// A token represents a single unit of text after tokenization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Whether this token has been marked as stopped (removed) by a filter
    pub stopped: bool,

    /// Additional metadata that can be attached to tokens
    pub metadata: Option<TokenMetadata>,
}

/// Additional metadata that can be attached to tokens
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// The original text before filtering
    pub original_text: Option<String>,

    /// Grammatical category reported by the morphological analyzer
    pub part_of_speech: Option<PartOfSpeech>,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            stopped: false,
            metadata: None,
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset,
            end_offset,
            stopped: false,
            metadata: None,
        }
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Record the part of speech assigned to this token.
    pub fn with_part_of_speech(mut self, pos: PartOfSpeech) -> Self {
        self.metadata
            .get_or_insert_with(TokenMetadata::default)
            .part_of_speech = Some(pos);
        self
    }

    /// The part of speech recorded by a morphology-aware filter, if any.
    pub fn part_of_speech(&self) -> Option<PartOfSpeech> {
        self.metadata.as_ref().and_then(|m| m.part_of_speech)
    }

    /// Replace the text, remembering the first original form.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        let metadata = self.metadata.get_or_insert_with(TokenMetadata::default);
        if metadata.original_text.is_none() {
            metadata.original_text = Some(std::mem::take(&mut self.text));
        }
        self.text = text.into();
        self
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A stream of tokens produced by tokenizers and transformed by filters.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
