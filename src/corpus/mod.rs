//! Labeled article corpora.
//!
//! A [`Corpus`] is an ordered sequence of immutable [`Document`]s. Its order
//! matters: the train/test split is a fixed index boundary applied to the
//! sequence as stored, so shuffling (when wanted) is an explicit, seeded
//! step before splitting.

pub mod document;
pub mod loader;

pub use document::{Corpus, Document, Label};
pub use loader::{CorpusLoader, read_list};
