//! Logistic regression trained by stochastic gradient descent.
//!
//! One pass (epoch) visits every training vector once, optionally in a
//! freshly shuffled order, and takes a gradient step on the logistic loss of
//! that single sample. Regularization is elastic net: the L2 share shrinks
//! every weight multiplicatively, the L1 share is applied with the
//! cumulative truncated penalty of Tsuruoka et al., which keeps weights that
//! cross zero at exactly zero.
//!
//! The step size follows the "optimal" schedule
//! `eta_t = 1 / (alpha * (t0 + t))`, where `t0` is derived from the typical
//! weight magnitude `sqrt(1 / sqrt(alpha))`.

use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::corpus::Label;
use crate::error::{LectioError, Result};
use crate::ml::MlError;
use crate::ml::estimator::Estimator;
use crate::ml::tfidf::TermVector;

/// Upper bound on the loss derivative, as large margins can overflow.
const MAX_DLOSS: f64 = 1e12;

/// Below this the weight scale is folded back into the weights.
const MIN_WSCALE: f64 = 1e-9;

/// Regularization penalty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    None,
    L2,
    L1,
    ElasticNet,
}

impl Penalty {
    /// Effective L1 share of the penalty for a configured mixing ratio.
    pub fn l1_share(&self, l1_ratio: f64) -> f64 {
        match self {
            Penalty::None | Penalty::L2 => 0.0,
            Penalty::L1 => 1.0,
            Penalty::ElasticNet => l1_ratio,
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Penalty::None => "none",
            Penalty::L2 => "l2",
            Penalty::L1 => "l1",
            Penalty::ElasticNet => "elasticnet",
        };
        f.write_str(name)
    }
}

impl FromStr for Penalty {
    type Err = LectioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Penalty::None),
            "l2" => Ok(Penalty::L2),
            "l1" => Ok(Penalty::L1),
            "elasticnet" | "elastic_net" => Ok(Penalty::ElasticNet),
            other => Err(LectioError::invalid_argument(format!(
                "unknown penalty '{other}', expected none, l2, l1 or elasticnet"
            ))),
        }
    }
}

/// SGD classifier hyperparameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdParams {
    pub penalty: Penalty,
    /// Regularization strength; also scales the learning rate.
    pub alpha: f64,
    /// L1 share of the elastic-net penalty, in `[0, 1]`.
    pub l1_ratio: f64,
    /// Number of passes over the training data.
    pub epochs: usize,
    /// Reshuffle the sample order before every pass.
    pub shuffle: bool,
    /// Seed for the shuffling generator.
    pub seed: u64,
    pub fit_intercept: bool,
}

impl Default for SgdParams {
    fn default() -> Self {
        SgdParams {
            penalty: Penalty::L2,
            alpha: 1e-4,
            l1_ratio: 0.15,
            epochs: 5,
            shuffle: true,
            seed: 42,
            fit_intercept: true,
        }
    }
}

impl SgdParams {
    /// Check the parameters before training.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| -> Result<()> {
            Err(MlError::InvalidHyperparameter { message }.into())
        };
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return invalid(format!("alpha must be > 0, got {}", self.alpha));
        }
        if !(0.0..=1.0).contains(&self.l1_ratio) {
            return invalid(format!("l1_ratio must be within [0, 1], got {}", self.l1_ratio));
        }
        if self.epochs == 0 {
            return invalid("epochs must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Weights of a fitted linear model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// One weight per vocabulary term.
    pub weights: Vec<f64>,
    pub intercept: f64,
    /// Average logistic loss over the last epoch.
    pub final_loss: f64,
    /// Total number of weight updates performed.
    pub updates: usize,
}

impl LinearModel {
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    /// Signed distance of `x` to the decision boundary.
    pub fn decision(&self, x: &TermVector) -> f64 {
        x.dot(&self.weights) + self.intercept
    }
}

/// Dense weights stored as `wscale * w` so that L2 shrinkage is O(1).
struct WeightVector {
    w: Vec<f64>,
    wscale: f64,
}

impl WeightVector {
    fn zeros(dimension: usize) -> Self {
        WeightVector {
            w: vec![0.0; dimension],
            wscale: 1.0,
        }
    }

    fn dot(&self, x: &TermVector) -> f64 {
        x.dot(&self.w) * self.wscale
    }

    /// `w += c * x`
    fn add(&mut self, x: &TermVector, c: f64) {
        let c = c / self.wscale;
        for (i, v) in x.iter() {
            self.w[i] += v * c;
        }
    }

    /// `w *= c`
    fn scale(&mut self, c: f64) {
        if c <= 0.0 {
            self.w.iter_mut().for_each(|w| *w = 0.0);
            self.wscale = 1.0;
            return;
        }
        self.wscale *= c;
        if self.wscale < MIN_WSCALE {
            self.reset_scale();
        }
    }

    fn reset_scale(&mut self) {
        let wscale = self.wscale;
        self.w.iter_mut().for_each(|w| *w *= wscale);
        self.wscale = 1.0;
    }

    /// Cumulative L1 penalty on the features active in `x`.
    fn l1_penalty(&mut self, x: &TermVector, u: f64, q: &mut [f64]) {
        for (j, _) in x.iter() {
            let z = self.w[j] * self.wscale;
            if z > 0.0 {
                self.w[j] = (self.w[j] - (u + q[j]) / self.wscale).max(0.0);
            } else if z < 0.0 {
                self.w[j] = (self.w[j] + (u - q[j]) / self.wscale).min(0.0);
            }
            q[j] += self.w[j] * self.wscale - z;
        }
    }

    fn into_weights(mut self) -> Vec<f64> {
        self.reset_scale();
        self.w
    }
}

/// Logistic loss for a signed target `y` and a margin `p`.
fn log_loss(p: f64, y: f64) -> f64 {
    let z = p * y;
    if z > 18.0 {
        (-z).exp()
    } else if z < -18.0 {
        -z
    } else {
        (-z).exp().ln_1p()
    }
}

/// Derivative of [`log_loss`] with respect to `p`.
fn log_dloss(p: f64, y: f64) -> f64 {
    let z = p * y;
    if z > 18.0 {
        -y * (-z).exp()
    } else if z < -18.0 {
        -y
    } else {
        -y / (z.exp() + 1.0)
    }
}

/// Logistic-regression classifier over TF-IDF term vectors.
#[derive(Clone, Debug)]
pub struct SgdClassifier {
    params: SgdParams,
    model: Option<LinearModel>,
}

impl SgdClassifier {
    pub fn new(params: SgdParams) -> Self {
        SgdClassifier {
            params,
            model: None,
        }
    }

    pub fn params(&self) -> &SgdParams {
        &self.params
    }

    /// The fitted model, if any.
    pub fn model(&self) -> Option<&LinearModel> {
        self.model.as_ref()
    }

    fn fitted_model(&self) -> Result<&LinearModel> {
        self.model.as_ref().ok_or_else(|| {
            MlError::ModelNotTrained {
                message: "call fit before predicting with SgdClassifier".to_string(),
            }
            .into()
        })
    }

    fn check_training_data(vectors: &[TermVector], labels: &[Label]) -> Result<usize> {
        if vectors.len() != labels.len() {
            return Err(LectioError::model(format!(
                "{} vectors but {} labels",
                vectors.len(),
                labels.len()
            )));
        }
        if vectors.len() < 2 {
            return Err(MlError::InsufficientTrainingData {
                min_samples: 2,
                actual: vectors.len(),
            }
            .into());
        }
        let first = labels[0];
        if labels.iter().all(|label| *label == first) {
            return Err(MlError::SingleClass {
                label: first.to_string(),
            }
            .into());
        }

        let dimension = vectors[0].dimension();
        if let Some(bad) = vectors.iter().find(|v| v.dimension() != dimension) {
            return Err(MlError::DimensionMismatch {
                expected: dimension,
                actual: bad.dimension(),
            }
            .into());
        }
        Ok(dimension)
    }

    fn train(&self, vectors: &[TermVector], labels: &[Label], dimension: usize) -> LinearModel {
        let params = &self.params;
        let alpha = params.alpha;
        let l1_share = params.penalty.l1_share(params.l1_ratio);
        let use_l2 = params.penalty != Penalty::None;
        let use_l1 = matches!(params.penalty, Penalty::L1 | Penalty::ElasticNet);

        let typw = (1.0 / alpha.sqrt()).sqrt();
        let initial_eta0 = typw / log_dloss(-typw, 1.0).max(1.0);
        let optimal_init = 1.0 / (initial_eta0 * alpha);

        let mut weights = WeightVector::zeros(dimension);
        let mut intercept = 0.0;
        let mut cumulative_l1 = 0.0;
        let mut q = vec![0.0; if use_l1 { dimension } else { 0 }];

        let mut order: Vec<usize> = (0..vectors.len()).collect();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut t = 1.0;
        let mut final_loss = 0.0;

        for epoch in 0..params.epochs {
            if params.shuffle {
                order.shuffle(&mut rng);
            }

            let mut epoch_loss = 0.0;
            for &i in &order {
                let x = &vectors[i];
                let y = labels[i].sign();
                let p = weights.dot(x) + intercept;
                epoch_loss += log_loss(p, y);

                let eta = 1.0 / (alpha * (optimal_init + t - 1.0));
                let dloss = log_dloss(p, y).clamp(-MAX_DLOSS, MAX_DLOSS);
                let update = -eta * dloss;

                if use_l2 {
                    weights.scale(1.0 - (1.0 - l1_share) * eta * alpha);
                }
                if update != 0.0 {
                    weights.add(x, update);
                    if params.fit_intercept {
                        intercept += update;
                    }
                }
                if use_l1 {
                    cumulative_l1 += l1_share * eta * alpha;
                    weights.l1_penalty(x, cumulative_l1, &mut q);
                }
                t += 1.0;
            }

            final_loss = epoch_loss / vectors.len() as f64;
            log::debug!(
                "SGD epoch {}/{}: avg loss {:.6}, intercept {:.6}",
                epoch + 1,
                params.epochs,
                final_loss,
                intercept
            );
        }

        LinearModel {
            weights: weights.into_weights(),
            intercept,
            final_loss,
            updates: (t - 1.0) as usize,
        }
    }
}

impl Default for SgdClassifier {
    fn default() -> Self {
        Self::new(SgdParams::default())
    }
}

impl Estimator for SgdClassifier {
    type Input = TermVector;

    fn fit(&mut self, inputs: &[TermVector], labels: &[Label]) -> Result<()> {
        if self.model.is_some() {
            return Err(MlError::AlreadyTrained {
                message: "construct a new SgdClassifier to train again".to_string(),
            }
            .into());
        }
        self.params.validate()?;
        let dimension = Self::check_training_data(inputs, labels)?;
        self.model = Some(self.train(inputs, labels, dimension));
        Ok(())
    }

    fn decision_function(&self, input: &TermVector) -> Result<f64> {
        let model = self.fitted_model()?;
        if input.dimension() != model.dimension() {
            return Err(MlError::DimensionMismatch {
                expected: model.dimension(),
                actual: input.dimension(),
            }
            .into());
        }
        Ok(model.decision(input))
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    fn name(&self) -> &str {
        "sgd_logistic"
    }
}
