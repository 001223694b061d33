//! Held-out evaluation metrics.

use serde::{Deserialize, Serialize};

use crate::dataset::Label;

/// Accuracy, precision, recall and F1 for the phishing class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

impl ClassificationMetrics {
    /// Compare predictions with ground truth.
    ///
    /// Undefined ratios (no positive predictions, no positive truths, empty
    /// input) are reported as 0.0 with a warning.
    pub fn compute(truth: &[Label], predicted: &[Label]) -> Self {
        debug_assert_eq!(truth.len(), predicted.len());

        let mut tp = 0usize;
        let mut fp = 0usize;
        let mut fn_ = 0usize;
        let mut correct = 0usize;

        for (t, p) in truth.iter().zip(predicted) {
            if t == p {
                correct += 1;
            }
            match (t, p) {
                (Label::Phishing, Label::Phishing) => tp += 1,
                (Label::Legitimate, Label::Phishing) => fp += 1,
                (Label::Phishing, Label::Legitimate) => fn_ += 1,
                (Label::Legitimate, Label::Legitimate) => {}
            }
        }

        let accuracy = safe_ratio(correct, truth.len(), "accuracy");
        let precision = safe_ratio(tp, tp + fp, "precision");
        let recall = safe_ratio(tp, tp + fn_, "recall");
        let f1_score = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            accuracy,
            precision,
            recall,
            f1_score,
        }
    }
}

fn safe_ratio(numerator: usize, denominator: usize, metric: &str) -> f64 {
    if denominator == 0 {
        log::warn!("{metric} is undefined on the evaluation set; reporting 0.0");
        return 0.0;
    }
    numerator as f64 / denominator as f64
}
