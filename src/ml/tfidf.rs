//! TF-IDF vectorizer for text feature extraction.
//!
//! [`TfIdfVectorizer::fit`] learns a [`Vocabulary`] from a corpus: the set of
//! distinct terms, their document frequencies, and smoothed inverse document
//! frequencies. Terms can be pruned by minimum and maximum document
//! frequency. [`TfIdfVectorizer::transform`] turns one document into an
//! L2-normalized sparse [`TermVector`] over that vocabulary; unknown terms
//! are dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::LowercaseFilter;
use crate::analysis::tokenizer::{RegexTokenizer, WORD_PATTERN};
use crate::error::{LectioError, Result};
use crate::ml::MlError;

/// A document-frequency threshold.
///
/// Integral JSON values are absolute document counts, fractional values are
/// proportions of the corpus size (`1.0` means every document).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentFrequency {
    Count(usize),
    Proportion(f64),
}

impl DocumentFrequency {
    /// Threshold as a document count for a corpus of `n_documents`.
    pub fn resolve(&self, n_documents: usize) -> f64 {
        match *self {
            DocumentFrequency::Count(count) => count as f64,
            DocumentFrequency::Proportion(p) => p * n_documents as f64,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        match *self {
            DocumentFrequency::Proportion(p) if !(0.0..=1.0).contains(&p) || p.is_nan() => {
                Err(LectioError::feature(format!(
                    "{name} proportion must be within [0.0, 1.0], got {p}"
                )))
            }
            _ => Ok(()),
        }
    }
}

/// TF-IDF vectorizer configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TfIdfParams {
    /// Drop terms that appear in fewer documents than this.
    pub min_df: DocumentFrequency,
    /// Drop terms that appear in more documents than this.
    pub max_df: DocumentFrequency,
    /// Lowercase tokens before counting.
    pub lowercase: bool,
    /// Use `1 + ln(tf)` instead of the raw term count.
    pub sublinear_tf: bool,
    /// Token pattern; must match the one used for normalization.
    pub token_pattern: String,
}

impl Default for TfIdfParams {
    fn default() -> Self {
        TfIdfParams {
            min_df: DocumentFrequency::Count(1),
            max_df: DocumentFrequency::Proportion(1.0),
            lowercase: false,
            sublinear_tf: false,
            token_pattern: WORD_PATTERN.to_string(),
        }
    }
}

/// A learned, frozen vocabulary with document-frequency statistics.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    /// Terms in lexicographic order; a term's index is its rank.
    terms: Vec<String>,
    index: AHashMap<String, usize>,
    document_frequency: Vec<usize>,
    idf: Vec<f64>,
    n_documents: usize,
    pruned: usize,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Index of `term`, if it is part of the vocabulary.
    pub fn get(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    pub fn document_frequency(&self, index: usize) -> Option<usize> {
        self.document_frequency.get(index).copied()
    }

    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    /// Number of documents the vocabulary was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Number of distinct terms removed by the document-frequency limits.
    pub fn pruned(&self) -> usize {
        self.pruned
    }
}

/// A sparse, non-negative term-weight vector.
///
/// Entries are `(term index, weight)` pairs sorted by index with no zero
/// weights; `dimension` is the vocabulary size it was built against.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TermVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl TermVector {
    /// The all-zero vector of the given dimension.
    pub fn zeros(dimension: usize) -> Self {
        TermVector {
            dimension,
            entries: Vec::new(),
        }
    }

    /// Build from unordered entries. Duplicate indices are summed, zeros dropped.
    pub fn from_entries(dimension: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Result<Self> {
        let mut merged: BTreeMap<usize, f64> = BTreeMap::new();
        for (index, weight) in entries {
            if index >= dimension {
                return Err(LectioError::feature(format!(
                    "term index {index} out of range for dimension {dimension}"
                )));
            }
            *merged.entry(index).or_insert(0.0) += weight;
        }
        Ok(TermVector {
            dimension,
            entries: merged.into_iter().filter(|(_, w)| *w != 0.0).collect(),
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Weight of the term at `index` (zero when absent).
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product with a dense weight slice of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries.iter().map(|(i, w)| dense[*i] * w).sum()
    }

    /// Dense copy of this vector.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dimension];
        for (i, w) in &self.entries {
            dense[*i] = *w;
        }
        dense
    }

    fn normalize_l2(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }
}

/// TF-IDF vectorizer for text feature extraction.
#[derive(Clone)]
pub struct TfIdfVectorizer {
    params: TfIdfParams,
    vocabulary: Option<Vocabulary>,
    /// Analyzer for tokenization.
    analyzer: Arc<dyn Analyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("params", &self.params)
            .field(
                "vocabulary_size",
                &self.vocabulary.as_ref().map_or(0, Vocabulary::len),
            )
            .field("analyzer", &self.analyzer.name())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create an unfitted vectorizer; the tokenizer is built from the params.
    pub fn new(params: TfIdfParams) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::with_pattern(&params.token_pattern)?);
        let mut analyzer = PipelineAnalyzer::new(tokenizer).with_name("tfidf");
        if params.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        Ok(Self::with_analyzer(params, Arc::new(analyzer)))
    }

    /// Create an unfitted vectorizer that tokenizes with `analyzer`.
    /// `token_pattern` and `lowercase` in `params` are then informational.
    pub fn with_analyzer(params: TfIdfParams, analyzer: Arc<dyn Analyzer>) -> Self {
        TfIdfVectorizer {
            params,
            vocabulary: None,
            analyzer,
        }
    }

    pub fn params(&self) -> &TfIdfParams {
        &self.params
    }

    /// The fitted vocabulary, if any.
    pub fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    /// Get the size of the vocabulary (zero before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, Vocabulary::len)
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Fit the vocabulary on training documents.
    ///
    /// The vocabulary is frozen once fitted; fitting again is an error.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if self.vocabulary.is_some() {
            return Err(MlError::AlreadyTrained {
                message: "construct a new TfIdfVectorizer to fit another vocabulary".to_string(),
            }
            .into());
        }
        self.params.min_df.validate("min_df")?;
        self.params.max_df.validate("max_df")?;

        let n_documents = documents.len();
        if n_documents == 0 {
            return Err(LectioError::feature("cannot fit a vocabulary on zero documents"));
        }

        // Count in how many documents each term appears.
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let mut seen: Vec<String> = self.tokenize(doc)?;
            seen.sort_unstable();
            seen.dedup();
            for token in seen {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        let min_count = self.params.min_df.resolve(n_documents);
        let max_count = self.params.max_df.resolve(n_documents);
        if max_count < min_count {
            return Err(LectioError::feature(format!(
                "max_df ({max_count}) corresponds to fewer documents than min_df ({min_count})"
            )));
        }

        let total_terms = document_frequency.len();
        let kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| (*df as f64) >= min_count && (*df as f64) <= max_count)
            .collect();

        if kept.is_empty() {
            return Err(LectioError::feature(if total_terms == 0 {
                "empty vocabulary; documents contain no tokens".to_string()
            } else {
                format!(
                    "after pruning, no terms remain (all {total_terms} terms outside min_df/max_df)"
                )
            }));
        }

        let mut vocabulary = Vocabulary {
            n_documents,
            pruned: total_terms - kept.len(),
            ..Default::default()
        };
        for (idx, (term, df)) in kept.into_iter().enumerate() {
            // IDF = ln((N + 1) / (df + 1)) + 1
            let idf = ((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0;
            vocabulary.index.insert(term.clone(), idx);
            vocabulary.terms.push(term);
            vocabulary.document_frequency.push(df);
            vocabulary.idf.push(idf);
        }

        log::debug!(
            "Fitted vocabulary of {} terms on {} documents ({} pruned)",
            vocabulary.len(),
            n_documents,
            vocabulary.pruned
        );
        self.vocabulary = Some(vocabulary);
        Ok(())
    }

    /// Transform a document into an L2-normalized TF-IDF vector.
    ///
    /// An unfitted vectorizer yields the zero vector of dimension zero.
    pub fn transform(&self, document: &str) -> Result<TermVector> {
        let Some(vocabulary) = &self.vocabulary else {
            return Ok(TermVector::zeros(0));
        };

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in self.tokenize(document)? {
            if let Some(idx) = vocabulary.get(&token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts.into_iter().map(|(idx, tf)| {
            let tf = if self.params.sublinear_tf {
                1.0 + tf.ln()
            } else {
                tf
            };
            (idx, tf * vocabulary.idf[idx])
        });

        let mut vector = TermVector {
            dimension: vocabulary.len(),
            entries: entries.collect(),
        };
        vector.normalize_l2();
        Ok(vector)
    }

    /// Transform many documents.
    pub fn transform_all(&self, documents: &[String]) -> Result<Vec<TermVector>> {
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    /// Fit on `documents`, then transform them.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<TermVector>> {
        self.fit(documents)?;
        self.transform_all(documents)
    }

    /// Tokenize a document using the configured analyzer.
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyzer.analyze(text)?.map(|token| token.text).collect())
    }
}
