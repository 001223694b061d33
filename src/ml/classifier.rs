//! Binary classifier trait.

use crate::dataset::Label;
use crate::error::Result;

/// Supervised binary classification capability.
///
/// Rows are dense feature vectors of equal length; probability rows are
/// indexed by [`Label::index`] and sum to 1.
pub trait BinaryClassifier: Send + Sync {
    /// Train on a feature matrix and matching labels, replacing any previous fit.
    fn fit(&mut self, features: &[Vec<f64>], labels: &[Label]) -> Result<()>;

    /// Predict a label per row.
    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<Label>>;

    /// Predict per-class probabilities per row.
    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<[f64; 2]>>;

    /// Check if the model is trained and ready for predictions.
    fn is_trained(&self) -> bool;

    /// Human readable model family name.
    fn model_type(&self) -> &str;

    /// Number of ensemble members, for ensemble models.
    fn estimator_count(&self) -> Option<usize> {
        None
    }
}
