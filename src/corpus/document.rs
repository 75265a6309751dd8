//! Document, label and corpus types.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{LectioError, Result};

/// Binary article class. [`Label::Interesting`] is the positive class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Interesting,
    Boring,
}

impl Label {
    /// Whether this is the positive class.
    pub fn is_positive(&self) -> bool {
        matches!(self, Label::Interesting)
    }

    /// Regression target: 1.0 for the positive class, 0.0 otherwise.
    pub fn target(&self) -> f64 {
        if self.is_positive() { 1.0 } else { 0.0 }
    }

    /// Signed target used by the logistic loss: +1.0 or -1.0.
    pub fn sign(&self) -> f64 {
        if self.is_positive() { 1.0 } else { -1.0 }
    }

    /// Map a boolean "is positive" flag onto a label.
    pub fn from_positive(positive: bool) -> Self {
        if positive {
            Label::Interesting
        } else {
            Label::Boring
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Interesting => f.write_str("interesting"),
            Label::Boring => f.write_str("boring"),
        }
    }
}

impl FromStr for Label {
    type Err = LectioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interesting" | "1" | "positive" => Ok(Label::Interesting),
            "boring" | "0" | "negative" => Ok(Label::Boring),
            other => Err(LectioError::invalid_argument(format!("unknown label: {other}"))),
        }
    }
}

/// A loaded (and usually normalized) document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    text: String,
    label: Option<Label>,
    path: Option<PathBuf>,
}

impl Document {
    /// Create an unlabeled document without provenance.
    pub fn new<S: Into<String>>(text: S) -> Self {
        Document {
            text: text.into(),
            label: None,
            path: None,
        }
    }

    /// Create a labeled document.
    pub fn labeled<S: Into<String>>(text: S, label: Label) -> Self {
        Document {
            text: text.into(),
            label: Some(label),
            path: None,
        }
    }

    /// Attach the path this document was read from.
    pub fn with_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> Option<Label> {
        self.label
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// An ordered collection of documents.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document.
    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Document texts in corpus order.
    pub fn texts(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.text.clone()).collect()
    }

    /// Labels in corpus order. Fails if any document is unlabeled.
    pub fn labels(&self) -> Result<Vec<Label>> {
        self.documents
            .iter()
            .enumerate()
            .map(|(i, d)| {
                d.label.ok_or_else(|| {
                    LectioError::invalid_argument(format!("document {i} has no label"))
                })
            })
            .collect()
    }

    /// Number of documents carrying `label`.
    pub fn count_label(&self, label: Label) -> usize {
        self.documents
            .iter()
            .filter(|d| d.label == Some(label))
            .count()
    }

    /// A copy with the documents permuted by a generator seeded with `seed`.
    /// The same seed always yields the same order.
    pub fn shuffled(&self, seed: u64) -> Corpus {
        let mut documents = self.documents.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        documents.shuffle(&mut rng);
        Corpus { documents }
    }

    /// Split into a training prefix of `border` documents and the test
    /// suffix. A border past the end yields an empty test part.
    pub fn split_at(&self, border: usize) -> (Corpus, Corpus) {
        let border = border.min(self.documents.len());
        let (train, test) = self.documents.split_at(border);
        (
            Corpus {
                documents: train.to_vec(),
            },
            Corpus {
                documents: test.to_vec(),
            },
        )
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Corpus {
            documents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(n: usize) -> Corpus {
        (0..n)
            .map(|i| Document::labeled(format!("doc {i}"), Label::from_positive(i % 2 == 0)))
            .collect()
    }

    #[test]
    fn test_label_conversions() {
        assert_eq!(Label::Interesting.target(), 1.0);
        assert_eq!(Label::Boring.sign(), -1.0);
        assert_eq!("Interesting".parse::<Label>().unwrap(), Label::Interesting);
        assert_eq!("0".parse::<Label>().unwrap(), Label::Boring);
        assert!("maybe".parse::<Label>().is_err());
        assert_eq!(Label::Boring.to_string(), "boring");
    }

    #[test]
    fn test_split_at_is_order_preserving() {
        let corpus = corpus(5);
        let (train, test) = corpus.split_at(3);
        assert_eq!(train.texts(), vec!["doc 0", "doc 1", "doc 2"]);
        assert_eq!(test.texts(), vec!["doc 3", "doc 4"]);

        let (again_train, again_test) = corpus.split_at(3);
        assert_eq!(train, again_train);
        assert_eq!(test, again_test);
    }

    #[test]
    fn test_split_border_past_end() {
        let (train, test) = corpus(2).split_at(60);
        assert_eq!(train.len(), 2);
        assert!(test.is_empty());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let corpus = corpus(20);
        let a = corpus.shuffled(7);
        let b = corpus.shuffled(7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert_eq!(a.count_label(Label::Interesting), 10);

        let mut sorted = a.texts();
        sorted.sort();
        let mut original = corpus.texts();
        original.sort();
        assert_eq!(sorted, original);
    }

    #[test]
    fn test_labels_require_every_document_labeled() {
        let mut corpus = corpus(2);
        assert_eq!(corpus.labels().unwrap().len(), 2);
        corpus.push(Document::new("unlabeled").with_path("/tmp/x.html"));
        assert!(corpus.labels().is_err());
        assert_eq!(
            corpus.documents()[2].path(),
            Some(Path::new("/tmp/x.html"))
        );
    }
}
