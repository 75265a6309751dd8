//! Vectorizer + classifier composed into one estimator over raw text.
//!
//! [`TextPipeline`] is what the grid search fits per fold: its
//! hyperparameters live in [`PipelineParams`] and are addressed with
//! `step__field` names, e.g. `tfidf__min_df` or `classifier__alpha`.

use serde::{Deserialize, Serialize};

use crate::corpus::Label;
use crate::error::{LectioError, Result};
use crate::ml::MlError;
use crate::ml::estimator::Estimator;
use crate::ml::grid_search::{ParamSet, ParamValue};
use crate::ml::sgd::{SgdClassifier, SgdParams};
use crate::ml::tfidf::{DocumentFrequency, TfIdfParams, TfIdfVectorizer};

/// Hyperparameters of both pipeline steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub tfidf: TfIdfParams,
    pub classifier: SgdParams,
}

impl PipelineParams {
    pub fn new(tfidf: TfIdfParams, classifier: SgdParams) -> Self {
        PipelineParams { tfidf, classifier }
    }

    /// Set one named hyperparameter.
    pub fn set_param(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        let (step, field) = name.split_once("__").ok_or_else(|| {
            LectioError::invalid_argument(format!(
                "parameter '{name}' must be of the form step__field"
            ))
        })?;

        match (step, field) {
            ("classifier", "penalty") => {
                self.classifier.penalty = expect_text(name, value)?.parse()?;
            }
            ("classifier", "alpha") => self.classifier.alpha = expect_float(name, value)?,
            ("classifier", "l1_ratio") => self.classifier.l1_ratio = expect_float(name, value)?,
            ("classifier", "epochs") => self.classifier.epochs = expect_count(name, value)?,
            ("classifier", "shuffle") => self.classifier.shuffle = expect_bool(name, value)?,
            ("classifier", "fit_intercept") => {
                self.classifier.fit_intercept = expect_bool(name, value)?;
            }
            ("tfidf", "min_df") => self.tfidf.min_df = expect_frequency(name, value)?,
            ("tfidf", "max_df") => self.tfidf.max_df = expect_frequency(name, value)?,
            ("tfidf", "sublinear_tf") => self.tfidf.sublinear_tf = expect_bool(name, value)?,
            ("tfidf", "lowercase") => self.tfidf.lowercase = expect_bool(name, value)?,
            _ => {
                return Err(LectioError::invalid_argument(format!(
                    "unknown parameter '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Copy of these params with every entry of `set` applied.
    pub fn with_params(&self, set: &ParamSet) -> Result<Self> {
        let mut params = self.clone();
        for (name, value) in set {
            params.set_param(name, value)?;
        }
        Ok(params)
    }
}

fn type_error(name: &str, expected: &str, value: &ParamValue) -> LectioError {
    LectioError::invalid_argument(format!("parameter '{name}' expects {expected}, got {value}"))
}

fn expect_text<'a>(name: &str, value: &'a ParamValue) -> Result<&'a str> {
    match value {
        ParamValue::Text(text) => Ok(text),
        other => Err(type_error(name, "a string", other)),
    }
}

fn expect_float(name: &str, value: &ParamValue) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| type_error(name, "a number", value))
}

fn expect_count(name: &str, value: &ParamValue) -> Result<usize> {
    match value {
        ParamValue::Int(n) if *n >= 0 => Ok(*n as usize),
        other => Err(type_error(name, "a non-negative integer", other)),
    }
}

fn expect_bool(name: &str, value: &ParamValue) -> Result<bool> {
    match value {
        ParamValue::Bool(b) => Ok(*b),
        other => Err(type_error(name, "a boolean", other)),
    }
}

fn expect_frequency(name: &str, value: &ParamValue) -> Result<DocumentFrequency> {
    match value {
        ParamValue::Int(n) if *n >= 0 => Ok(DocumentFrequency::Count(*n as usize)),
        ParamValue::Float(p) => Ok(DocumentFrequency::Proportion(*p)),
        other => Err(type_error(name, "a document count or proportion", other)),
    }
}

/// TF-IDF vectorizer followed by an SGD logistic classifier.
#[derive(Clone, Debug)]
pub struct TextPipeline {
    params: PipelineParams,
    vectorizer: TfIdfVectorizer,
    classifier: SgdClassifier,
}

impl TextPipeline {
    pub fn new(params: PipelineParams) -> Result<Self> {
        let vectorizer = TfIdfVectorizer::new(params.tfidf.clone())?;
        let classifier = SgdClassifier::new(params.classifier.clone());
        Ok(TextPipeline {
            params,
            vectorizer,
            classifier,
        })
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &SgdClassifier {
        &self.classifier
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }
}

impl Estimator for TextPipeline {
    type Input = String;

    fn fit(&mut self, inputs: &[String], labels: &[Label]) -> Result<()> {
        if self.classifier.is_fitted() {
            return Err(MlError::AlreadyTrained {
                message: "construct a new TextPipeline to train again".to_string(),
            }
            .into());
        }
        if inputs.len() != labels.len() {
            return Err(LectioError::model(format!(
                "{} documents but {} labels",
                inputs.len(),
                labels.len()
            )));
        }
        // Both steps are fitted on fresh copies; a failure leaves `self` unfit.
        let mut vectorizer = TfIdfVectorizer::new(self.params.tfidf.clone())?;
        let mut classifier = SgdClassifier::new(self.params.classifier.clone());
        let vectors = vectorizer.fit_transform(inputs)?;
        classifier.fit(&vectors, labels)?;

        self.vectorizer = vectorizer;
        self.classifier = classifier;
        Ok(())
    }

    fn decision_function(&self, input: &String) -> Result<f64> {
        if !self.classifier.is_fitted() {
            return Err(MlError::ModelNotTrained {
                message: "call fit before predicting with TextPipeline".to_string(),
            }
            .into());
        }
        let vector = self.vectorizer.transform(input)?;
        self.classifier.decision_function(&vector)
    }

    fn is_fitted(&self) -> bool {
        self.classifier.is_fitted()
    }

    fn name(&self) -> &str {
        "tfidf_sgd_pipeline"
    }
}
