//! Bagged random forest of gini decision trees.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::{PhishGuardError, Result};
use crate::ml::classifier::BinaryClassifier;
use crate::ml::tree::{DecisionTree, TreeParams};

/// Hyperparameters for [`RandomForest`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees.
    pub n_estimators: usize,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Base seed; tree `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 10,
            min_samples_split: 2,
            seed: 42,
        }
    }
}

/// Random forest classifier.
///
/// Each tree is grown on a bootstrap sample drawn with its own seeded RNG, so
/// fitting the same data with the same config always produces the same
/// forest, whatever order the parallel workers finish in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    n_features: usize,
    trees: Vec<DecisionTree>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(ForestConfig::default())
    }
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            n_features: 0,
            trees: Vec::new(),
        }
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Number of input features the forest was fitted on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    fn tree_params(&self, n_features: usize) -> TreeParams {
        TreeParams {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split.max(2),
            max_features: ((n_features as f64).sqrt() as usize).max(1),
        }
    }

    fn check_rows(&self, features: &[Vec<f64>]) -> Result<()> {
        if let Some(row) = features.iter().find(|row| row.len() != self.n_features) {
            return Err(PhishGuardError::fit(format!(
                "expected {} features per row, got {}",
                self.n_features,
                row.len()
            )));
        }
        Ok(())
    }

    /// Class probabilities for one row, averaged over all trees.
    fn predict_proba_row(&self, row: &[f64]) -> Result<[f64; 2]> {
        let mut sum = [0.0; 2];
        for (i, tree) in self.trees.iter().enumerate() {
            let p = tree.predict_proba(row).ok_or_else(|| {
                PhishGuardError::fit(format!("tree {i} reads a feature beyond the row width"))
            })?;
            sum[0] += p[0];
            sum[1] += p[1];
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }

    /// Check a decoded forest before it is used for prediction.
    ///
    /// A usable forest is fitted, holds exactly `n_estimators` trees, and every
    /// tree is consistent with `n_features`.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.is_trained() {
            return Err("random forest has no trees".to_string());
        }
        if self.n_features == 0 {
            return Err("random forest was fitted on zero features".to_string());
        }
        if self.trees.len() != self.config.n_estimators {
            return Err(format!(
                "random forest holds {} trees but is configured for {}",
                self.trees.len(),
                self.config.n_estimators
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl BinaryClassifier for RandomForest {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[Label]) -> Result<()> {
        if features.is_empty() {
            return Err(PhishGuardError::fit("cannot fit on an empty matrix"));
        }
        if features.len() != labels.len() {
            return Err(PhishGuardError::fit(format!(
                "{} rows but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let n_features = features[0].len();
        if n_features == 0 {
            return Err(PhishGuardError::fit("rows have no features"));
        }
        if features.iter().any(|row| row.len() != n_features) {
            return Err(PhishGuardError::fit("rows have differing lengths"));
        }
        if self.config.n_estimators == 0 {
            return Err(PhishGuardError::fit("n_estimators must be at least 1"));
        }

        let params = self.tree_params(n_features);
        let n_samples = features.len();
        let seed = self.config.seed;

        let trees: Vec<DecisionTree> = (0..self.config.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
                let sample: Vec<usize> = (0..n_samples)
                    .map(|_| rng.random_range(0..n_samples))
                    .collect();
                DecisionTree::fit(features, labels, &sample, &params, &mut rng)
            })
            .collect();

        log::debug!(
            "Fitted {} trees on {} samples x {} features",
            trees.len(),
            n_samples,
            n_features
        );

        self.n_features = n_features;
        self.trees = trees;
        Ok(())
    }

    fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<Label>> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| {
                if p[Label::Phishing.index()] > p[Label::Legitimate.index()] {
                    Label::Phishing
                } else {
                    Label::Legitimate
                }
            })
            .collect())
    }

    fn predict_proba(&self, features: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        if !self.is_trained() {
            return Err(PhishGuardError::model_not_ready("random forest has not been fitted"));
        }
        self.check_rows(features)?;
        features
            .iter()
            .map(|row| self.predict_proba_row(row))
            .collect()
    }

    fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }

    fn model_type(&self) -> &str {
        "RandomForestClassifier"
    }

    fn estimator_count(&self) -> Option<usize> {
        Some(self.config.n_estimators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> (Vec<Vec<f64>>, Vec<Label>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for i in 0..20 {
            features.push(vec![i as f64, 1.0, (i % 3) as f64]);
            labels.push(Label::Legitimate);
            features.push(vec![100.0 + i as f64, 0.0, (i % 3) as f64]);
            labels.push(Label::Phishing);
        }
        (features, labels)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_estimators: 15,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn test_random_forest_creation() {
        let forest = RandomForest::default();
        assert!(!forest.is_trained());
        assert_eq!(forest.config().n_estimators, 100);
        assert_eq!(forest.config().max_depth, 10);
        assert_eq!(forest.estimator_count(), Some(100));
        assert_eq!(forest.model_type(), "RandomForestClassifier");
    }

    #[test]
    fn test_untrained_prediction_fails() {
        let forest = RandomForest::default();
        let result = forest.predict(&[vec![1.0, 2.0, 3.0]]);
        assert!(matches!(result, Err(PhishGuardError::ModelNotReady(_))));
    }

    #[test]
    fn test_fit_and_predict() {
        let (features, labels) = dataset();
        let mut forest = RandomForest::new(small_config());
        forest.fit(&features, &labels).unwrap();

        assert!(forest.is_trained());
        assert_eq!(forest.trees().len(), 15);
        assert_eq!(forest.n_features(), 3);

        let predictions = forest
            .predict(&[vec![5.0, 1.0, 0.0], vec![110.0, 0.0, 2.0]])
            .unwrap();
        assert_eq!(predictions, vec![Label::Legitimate, Label::Phishing]);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (features, labels) = dataset();
        let mut forest = RandomForest::new(small_config());
        forest.fit(&features, &labels).unwrap();

        for p in forest.predict_proba(&features).unwrap() {
            assert!((p[0] + p[1] - 1.0).abs() < 1e-9);
            assert!((0.0..=1.0).contains(&p[0]));
            assert!((0.0..=1.0).contains(&p[1]));
        }
    }

    #[test]
    fn test_fit_is_reproducible() {
        let (features, labels) = dataset();
        let mut a = RandomForest::new(small_config());
        let mut b = RandomForest::new(small_config());
        a.fit(&features, &labels).unwrap();
        b.fit(&features, &labels).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let mut forest = RandomForest::new(small_config());
        assert!(forest.fit(&[], &[]).is_err());
        assert!(forest.fit(&[vec![1.0]], &[]).is_err());
        assert!(
            forest
                .fit(&[vec![1.0], vec![1.0, 2.0]], &[Label::Legitimate, Label::Phishing])
                .is_err()
        );
        assert!(!forest.is_trained());
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let (features, labels) = dataset();
        let mut forest = RandomForest::new(small_config());
        forest.fit(&features, &labels).unwrap();
        assert!(matches!(
            forest.predict(&[vec![1.0]]),
            Err(PhishGuardError::Fit(_))
        ));
    }

    #[test]
    fn test_validate_fitted_forest() {
        let (features, labels) = dataset();
        let mut forest = RandomForest::new(small_config());
        assert!(forest.validate().is_err());

        forest.fit(&features, &labels).unwrap();
        assert!(forest.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_tree_count_mismatch() {
        let (features, labels) = dataset();
        let mut forest = RandomForest::new(small_config());
        forest.fit(&features, &labels).unwrap();

        forest.trees.pop();
        assert!(forest.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_width() {
        let (features, labels) = dataset();
        let mut forest = RandomForest::new(small_config());
        forest.fit(&features, &labels).unwrap();

        forest.n_features = 0;
        assert!(forest.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_predictions() {
        let (features, labels) = dataset();
        let mut forest = RandomForest::new(small_config());
        forest.fit(&features, &labels).unwrap();

        let json = serde_json::to_string(&forest).unwrap();
        let restored: RandomForest = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, forest);
        assert_eq!(
            restored.predict_proba(&features).unwrap(),
            forest.predict_proba(&features).unwrap()
        );
    }
}
