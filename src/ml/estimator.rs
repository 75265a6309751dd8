//! Estimator trait shared by the classifier and the text pipeline.

use crate::corpus::Label;
use crate::error::Result;

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// A binary probabilistic classifier.
///
/// Every estimator starts unfit and becomes fit exactly once: calling
/// [`fit`](Self::fit) on a fitted instance is an error, and so is predicting
/// with an unfit one. Probabilities always refer to the positive class
/// ([`Label::Interesting`]) and lie in `[0, 1]`.
pub trait Estimator: Send + Sync {
    /// Type of a single input sample.
    type Input;

    /// Train on `inputs` with the matching `labels`.
    fn fit(&mut self, inputs: &[Self::Input], labels: &[Label]) -> Result<()>;

    /// Signed distance to the decision boundary (log-odds).
    fn decision_function(&self, input: &Self::Input) -> Result<f64>;

    /// Check if the estimator has been fitted.
    fn is_fitted(&self) -> bool;

    /// Get the name of this estimator for debugging and logging.
    fn name(&self) -> &str;

    /// Positive-class probability of one sample.
    fn predict_proba(&self, input: &Self::Input) -> Result<f64> {
        Ok(sigmoid(self.decision_function(input)?).clamp(0.0, 1.0))
    }

    /// Positive-class probabilities of many samples.
    fn predict_proba_batch(&self, inputs: &[Self::Input]) -> Result<Vec<f64>> {
        inputs.iter().map(|input| self.predict_proba(input)).collect()
    }

    /// Hard label at the 0.5 probability threshold.
    fn predict(&self, input: &Self::Input) -> Result<Label> {
        Ok(Label::from_positive(self.predict_proba(input)? >= 0.5))
    }
}
