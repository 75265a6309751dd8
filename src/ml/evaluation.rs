//! Ranking metrics for binary classifiers.

use crate::corpus::Label;
use crate::error::{LectioError, Result};
use crate::ml::estimator::Estimator;

/// Area under the ROC curve.
///
/// Computed with the Mann-Whitney rank statistic: the probability that a
/// random positive sample scores above a random negative one, with tied
/// scores counting one half. Fails when the input is empty, the lengths
/// differ, a score is NaN, or only one class is present.
pub fn roc_auc_score(labels: &[Label], scores: &[f64]) -> Result<f64> {
    if labels.len() != scores.len() {
        return Err(LectioError::evaluation(format!(
            "{} labels but {} scores",
            labels.len(),
            scores.len()
        )));
    }
    if labels.is_empty() {
        return Err(LectioError::evaluation("cannot score an empty sample"));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(LectioError::evaluation("scores contain NaN"));
    }

    let n_positive = labels.iter().filter(|l| l.is_positive()).count();
    let n_negative = labels.len() - n_positive;
    if n_positive == 0 || n_negative == 0 {
        return Err(LectioError::evaluation(
            "ROC AUC is undefined when only one class is present",
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Sum of 1-based ranks of the positive samples, ties averaged.
    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let average_rank = (start + 1 + end) as f64 / 2.0;
        let positives = order[start..end]
            .iter()
            .filter(|&&i| labels[i].is_positive())
            .count();
        positive_rank_sum += average_rank * positives as f64;
        start = end;
    }

    let n_pos = n_positive as f64;
    let n_neg = n_negative as f64;
    let u = positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0;
    Ok(u / (n_pos * n_neg))
}

/// Score a fitted estimator by ROC AUC of its positive-class probabilities.
pub fn auc_scorer<E: Estimator + ?Sized>(
    estimator: &E,
    inputs: &[E::Input],
    labels: &[Label],
) -> Result<f64> {
    let probabilities = estimator.predict_proba_batch(inputs)?;
    roc_auc_score(labels, &probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use Label::{Boring as B, Interesting as I};

    #[test]
    fn test_perfect_ranking() {
        let labels = [B, B, I, I];
        let scores = [0.1, 0.2, 0.8, 0.9];
        assert_eq!(roc_auc_score(&labels, &scores).unwrap(), 1.0);
    }

    #[test]
    fn test_inverted_ranking() {
        let labels = [I, I, B, B];
        let scores = [0.1, 0.2, 0.8, 0.9];
        assert_eq!(roc_auc_score(&labels, &scores).unwrap(), 0.0);
    }

    #[test]
    fn test_known_value() {
        // Pairs (pos, neg): (0.35 > 0.1), (0.35 < 0.4), (0.8 > 0.1), (0.8 > 0.4)
        let labels = [B, B, I, I];
        let scores = [0.1, 0.4, 0.35, 0.8];
        assert!((roc_auc_score(&labels, &scores).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ties_count_half() {
        let labels = [I, B, I, B];
        let scores = [0.5; 4];
        assert_eq!(roc_auc_score(&labels, &scores).unwrap(), 0.5);

        let labels = [B, I, B];
        let scores = [0.5, 0.5, 0.1];
        assert_eq!(roc_auc_score(&labels, &scores).unwrap(), 0.75);
    }

    #[test]
    fn test_uncorrelated_scores_near_half() {
        let mut rng = StdRng::seed_from_u64(7);
        let labels: Vec<Label> = (0..4000).map(|i| Label::from_positive(i % 2 == 0)).collect();
        let scores: Vec<f64> = (0..4000).map(|_| rng.random::<f64>()).collect();
        let auc = roc_auc_score(&labels, &scores).unwrap();
        assert!((auc - 0.5).abs() < 0.05, "auc = {auc}");
    }

    #[test]
    fn test_undefined_cases() {
        assert!(matches!(
            roc_auc_score(&[], &[]),
            Err(LectioError::Evaluation(_))
        ));
        assert!(roc_auc_score(&[I, I], &[0.1, 0.2]).is_err());
        assert!(roc_auc_score(&[I, B], &[0.1]).is_err());
        assert!(roc_auc_score(&[I, B], &[0.1, f64::NAN]).is_err());
    }
}
