//! End-to-end training experiment.
//!
//! An experiment loads the two labeled document lists, normalizes every
//! document, splits the (optionally shuffled) corpus at a fixed border into
//! a training prefix and a test suffix, scores a baseline model, runs the
//! cross-validated grid search on the training part, and finally scores the
//! refit winner on the untouched test part.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::TextNormalizer;
use crate::analysis::morphology::{
    FunctionWordAnalyzer, LexiconMorphAnalyzer, MorphAnalyzer, PartOfSpeech,
};
use crate::analysis::tokenizer::WORD_PATTERN;
use crate::corpus::{Corpus, CorpusLoader, Label};
use crate::error::{LectioError, Result};
use crate::ml::{
    CvConfig, Estimator, GridSearch, ParamSet, ParameterGrid, PipelineParams, SgdClassifier,
    TfIdfVectorizer, auc_scorer,
};

/// Which documents the baseline vocabulary is fitted on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyScope {
    /// Fit on the training split only.
    #[default]
    TrainOnly,
    /// Fit on every document, test split included. Test vocabulary then
    /// leaks into the baseline features.
    FullCorpus,
}

/// Experiment configuration, usually read from a JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// List of paths to interesting (positive) documents.
    pub interesting_list: Option<PathBuf>,
    /// List of paths to boring (negative) documents.
    pub boring_list: Option<PathBuf>,
    /// Optional `word<TAB>TAG` lexicon for part-of-speech lookup. Words it
    /// does not know fall back to the built-in function-word tables.
    pub lexicon: Option<PathBuf>,
    /// Categories removed during normalization.
    pub excluded_pos: Vec<PartOfSpeech>,
    /// Number of documents in the training prefix.
    pub border: usize,
    /// Shuffle the corpus before splitting.
    pub shuffle: bool,
    pub seed: u64,
    /// Word pattern for normalization and vectorization.
    pub token_pattern: String,
    pub vocabulary_scope: VocabularyScope,
    /// Parameters of the baseline model and starting point of the search.
    pub baseline: PipelineParams,
    pub grid: ParameterGrid,
    pub cv: CvConfig,
    /// Evaluate grid tasks on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            interesting_list: None,
            boring_list: None,
            lexicon: None,
            excluded_pos: PartOfSpeech::FUNCTION_WORDS.to_vec(),
            border: 60,
            shuffle: true,
            seed: 42,
            token_pattern: WORD_PATTERN.to_string(),
            vocabulary_scope: VocabularyScope::TrainOnly,
            baseline: PipelineParams::default(),
            grid: ParameterGrid::reference(),
            cv: CvConfig::default(),
            parallel: false,
        }
    }
}

impl ExperimentConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: ExperimentConfig = serde_json::from_str(&content)?;
        log::info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check settings that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if self.border == 0 {
            return Err(LectioError::invalid_config("border must be at least 1"));
        }
        if self.cv.n_splits < 2 {
            return Err(LectioError::invalid_config(format!(
                "cv.n_splits must be at least 2, got {}",
                self.cv.n_splits
            )));
        }
        if self.grid.is_empty() {
            return Err(LectioError::invalid_config(
                "grid has a dimension without values",
            ));
        }
        self.grid.len()?;
        self.baseline.classifier.validate()?;
        Ok(())
    }

    /// Baseline params with the configured token pattern.
    pub fn pipeline_params(&self) -> PipelineParams {
        let mut params = self.baseline.clone();
        params.tfidf.token_pattern = self.token_pattern.clone();
        params
    }

    /// The morphological analyzer this configuration asks for.
    pub fn morph_analyzer(&self) -> Result<Arc<dyn MorphAnalyzer>> {
        let function_words: Arc<dyn MorphAnalyzer> = Arc::new(FunctionWordAnalyzer::new());
        match &self.lexicon {
            Some(path) => Ok(Arc::new(
                LexiconMorphAnalyzer::load(path)?.with_fallback(function_words),
            )),
            None => Ok(function_words),
        }
    }

    fn list_path(&self, list: &Option<PathBuf>, name: &str) -> Result<PathBuf> {
        list.clone()
            .ok_or_else(|| LectioError::invalid_config(format!("{name} is not set")))
    }
}

/// What an experiment run reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub n_documents: usize,
    pub n_train: usize,
    pub n_test: usize,
    /// Vocabulary size of the baseline vectorizer.
    pub vocabulary_size: usize,
    /// Held-out AUC of the baseline model.
    pub baseline_score: f64,
    /// Mean cross-validated AUC of the best combination.
    pub best_cv_score: f64,
    pub best_params: ParamSet,
    /// Held-out AUC of the best combination refit on the training split.
    pub test_score: f64,
    pub combinations_evaluated: usize,
    pub combinations_failed: usize,
}

/// A configured experiment bound to a morphological analyzer.
#[derive(Debug)]
pub struct Experiment {
    config: ExperimentConfig,
    normalizer: TextNormalizer,
}

impl Experiment {
    pub fn new(config: ExperimentConfig, morph: Arc<dyn MorphAnalyzer>) -> Result<Self> {
        config.validate()?;
        let normalizer = TextNormalizer::with_options(
            morph,
            &config.token_pattern,
            config.excluded_pos.iter().copied(),
        )?;
        Ok(Experiment { config, normalizer })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Load and normalize both configured document lists.
    pub fn load_corpus(&self) -> Result<Corpus> {
        let interesting = self
            .config
            .list_path(&self.config.interesting_list, "interesting_list")?;
        let boring = self.config.list_path(&self.config.boring_list, "boring_list")?;
        CorpusLoader::new(&self.normalizer).load(interesting, boring)
    }

    /// Load the corpus and run the whole experiment on it.
    pub fn run(&self) -> Result<ExperimentReport> {
        let corpus = self.load_corpus()?;
        self.run_on_corpus(&corpus)
    }

    /// Run the experiment on an already normalized corpus.
    pub fn run_on_corpus(&self, corpus: &Corpus) -> Result<ExperimentReport> {
        if corpus.is_empty() {
            return Err(LectioError::evaluation("corpus is empty"));
        }
        let ordered = if self.config.shuffle {
            corpus.shuffled(self.config.seed)
        } else {
            corpus.clone()
        };
        let (train, test) = ordered.split_at(self.config.border);
        log::info!(
            "Split {} documents into {} train / {} test",
            ordered.len(),
            train.len(),
            test.len()
        );

        let train_texts = train.texts();
        let train_labels = train.labels()?;
        let test_texts = test.texts();
        let test_labels = test.labels()?;
        ensure_scorable(&test_labels, "test split")?;

        let params = self.config.pipeline_params();
        let vocabulary_texts = match self.config.vocabulary_scope {
            VocabularyScope::TrainOnly => train_texts.clone(),
            VocabularyScope::FullCorpus => ordered.texts(),
        };
        let (baseline_score, vocabulary_size) = baseline(
            &params,
            &vocabulary_texts,
            &train_texts,
            &train_labels,
            &test_texts,
            &test_labels,
        )?;
        log::info!("Baseline test AUC: {baseline_score:.4} ({vocabulary_size} terms)");

        let search = GridSearch::new(params, self.config.grid.clone())
            .with_cv(self.config.cv.clone())
            .parallel(self.config.parallel);
        let outcome = search.fit(&train_texts, &train_labels)?;
        let test_score = auc_scorer(&outcome.best_estimator, &test_texts, &test_labels)?;
        log::info!("Best params test AUC: {test_score:.4}");

        Ok(ExperimentReport {
            n_documents: ordered.len(),
            n_train: train.len(),
            n_test: test.len(),
            vocabulary_size,
            baseline_score,
            best_cv_score: outcome.best_score,
            combinations_failed: outcome.n_failed(),
            combinations_evaluated: outcome.results.len(),
            best_params: outcome.best_params,
            test_score,
        })
    }
}

/// Fit the vectorizer on `vocabulary_texts`, train the default classifier on
/// the training split and score it on the test split.
fn baseline(
    params: &PipelineParams,
    vocabulary_texts: &[String],
    train_texts: &[String],
    train_labels: &[Label],
    test_texts: &[String],
    test_labels: &[Label],
) -> Result<(f64, usize)> {
    let mut vectorizer = TfIdfVectorizer::new(params.tfidf.clone())?;
    vectorizer.fit(vocabulary_texts)?;

    let mut classifier = SgdClassifier::new(params.classifier.clone());
    classifier.fit(&vectorizer.transform_all(train_texts)?, train_labels)?;
    let score = auc_scorer(&classifier, &vectorizer.transform_all(test_texts)?, test_labels)?;
    Ok((score, vectorizer.vocabulary_size()))
}

fn ensure_scorable(labels: &[Label], what: &str) -> Result<()> {
    let positives = labels.iter().filter(|l| l.is_positive()).count();
    if positives == 0 || positives == labels.len() {
        return Err(LectioError::evaluation(format!(
            "{what} has {} documents and {positives} interesting; both classes are required",
            labels.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Document;
    use crate::ml::ParamValue;

    fn toy_corpus(n: usize) -> Corpus {
        let interesting = ["rust", "compiler", "parser", "kernel", "protocol", "storage"];
        let boring = ["weather", "traffic", "gossip", "horoscope", "queue", "invoice"];
        (0..n)
            .map(|i| {
                let (words, label) = if i % 2 == 0 {
                    (&interesting, Label::Interesting)
                } else {
                    (&boring, Label::Boring)
                };
                Document::labeled(
                    format!("{} {} daily news", words[i % 6], words[(i / 2 + 3) % 6]),
                    label,
                )
            })
            .collect()
    }

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            border: 20,
            grid: ParameterGrid::new()
                .add("classifier__alpha", [1e-3, 1e-5])
                .add("tfidf__min_df", [1i64]),
            ..Default::default()
        }
    }

    fn experiment(config: ExperimentConfig) -> Experiment {
        Experiment::new(config, Arc::new(FunctionWordAnalyzer::new())).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ExperimentConfig::default();
        assert_eq!(config.border, 60);
        assert_eq!(config.cv.n_splits, 5);
        assert_eq!(config.grid.len().unwrap(), 640);
        assert_eq!(config.vocabulary_scope, VocabularyScope::TrainOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ExperimentConfig = serde_json::from_str(
            r#"{"border": 10, "vocabulary_scope": "full_corpus", "grid": {"classifier__alpha": [0.01]}}"#,
        )
        .unwrap();
        assert_eq!(config.border, 10);
        assert_eq!(config.vocabulary_scope, VocabularyScope::FullCorpus);
        assert_eq!(config.grid.len().unwrap(), 1);
        assert!(config.shuffle);
    }

    #[test]
    fn test_invalid_config() {
        let config = ExperimentConfig {
            border: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        assert!(Experiment::new(config, Arc::new(FunctionWordAnalyzer::new())).is_err());
    }

    #[test]
    fn test_run_on_corpus() {
        let report = experiment(small_config())
            .run_on_corpus(&toy_corpus(30))
            .unwrap();

        assert_eq!(report.n_documents, 30);
        assert_eq!(report.n_train, 20);
        assert_eq!(report.n_test, 10);
        assert_eq!(report.combinations_evaluated, 2);
        assert_eq!(report.combinations_failed, 0);
        for score in [report.baseline_score, report.best_cv_score, report.test_score] {
            assert!((0.0..=1.0).contains(&score));
        }
        assert!(report.best_params.contains_key("classifier__alpha"));
        assert_eq!(report.best_params["tfidf__min_df"], ParamValue::Int(1));
    }

    #[test]
    fn test_run_is_deterministic() {
        let corpus = toy_corpus(30);
        let a = experiment(small_config()).run_on_corpus(&corpus).unwrap();
        let b = experiment(small_config()).run_on_corpus(&corpus).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_corpus_vocabulary_is_larger() {
        let corpus = toy_corpus(30);
        let train_only = experiment(ExperimentConfig {
            shuffle: false,
            ..small_config()
        })
        .run_on_corpus(&corpus)
        .unwrap();
        let full = experiment(ExperimentConfig {
            shuffle: false,
            vocabulary_scope: VocabularyScope::FullCorpus,
            ..small_config()
        })
        .run_on_corpus(&corpus)
        .unwrap();
        assert!(full.vocabulary_size >= train_only.vocabulary_size);
    }

    #[test]
    fn test_empty_test_split_is_fatal() {
        let config = ExperimentConfig {
            border: 100,
            ..small_config()
        };
        let result = experiment(config).run_on_corpus(&toy_corpus(30));
        assert!(matches!(result, Err(LectioError::Evaluation(_))));
    }

    #[test]
    fn test_empty_corpus_is_fatal() {
        let result = experiment(small_config()).run_on_corpus(&Corpus::new());
        assert!(matches!(result, Err(LectioError::Evaluation(_))));
    }

    #[test]
    fn test_missing_lists() {
        let result = experiment(small_config()).run();
        assert!(result.is_err());
    }
}
