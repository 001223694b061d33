//! CART decision tree for binary classification.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::dataset::Label;

/// Allowed drift of a leaf's probability sum from 1.
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    /// Maximum tree depth (root is depth 0).
    pub max_depth: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Features examined per split before settling for the best one found.
    pub max_features: usize,
}

/// Binary classification tree with class-probability leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<Box<TreeNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        /// Class probabilities indexed by [`Label::index`].
        probabilities: [f64; 2],
    },
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Best split found for a node.
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    impurity: f64,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Create a new empty decision tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Grow a tree on the rows named by `sample` (duplicates allowed, as in a
    /// bootstrap sample).
    pub fn fit<R: Rng + ?Sized>(
        features: &[Vec<f64>],
        labels: &[Label],
        sample: &[usize],
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        if sample.is_empty() {
            return Self::new();
        }
        let root = Self::build_tree(features, labels, sample, 0, params, rng);
        Self {
            root: Some(Box::new(root)),
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.root.is_some()
    }

    /// Class probabilities for one row. An unfitted tree is undecided.
    ///
    /// Returns `None` when a split on the decision path reads a feature past
    /// the end of `row`.
    pub fn predict_proba(&self, row: &[f64]) -> Option<[f64; 2]> {
        match self.root {
            Some(ref root) => Self::predict_node(root, row),
            None => Some([0.5, 0.5]),
        }
    }

    /// Check a decoded tree against the feature width it will be fed.
    ///
    /// Every split must name a feature below `n_features` with a finite
    /// threshold, and every leaf must hold a probability distribution.
    pub fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        match self.root.as_deref() {
            Some(root) => Self::validate_node(root, n_features),
            None => Err("tree is not fitted".to_string()),
        }
    }

    fn validate_node(node: &TreeNode, n_features: usize) -> std::result::Result<(), String> {
        match node {
            TreeNode::Leaf { probabilities } => {
                if probabilities
                    .iter()
                    .any(|p| !p.is_finite() || !(0.0..=1.0).contains(p))
                {
                    return Err(format!("leaf probabilities {probabilities:?} out of range"));
                }
                let sum = probabilities[0] + probabilities[1];
                if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
                    return Err(format!("leaf probabilities sum to {sum}"));
                }
                Ok(())
            }
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                if *feature_idx >= n_features {
                    return Err(format!(
                        "split on feature {feature_idx} but rows have {n_features} features"
                    ));
                }
                if !threshold.is_finite() {
                    return Err(format!("split threshold {threshold} is not finite"));
                }
                Self::validate_node(left, n_features)?;
                Self::validate_node(right, n_features)
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => 1 + count(left) + count(right),
            }
        }
        self.root.as_deref().map_or(0, count)
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        fn depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + depth(left).max(depth(right)),
            }
        }
        self.root.as_deref().map_or(0, depth)
    }

    /// Recursively build the tree.
    ///
    /// Stops splitting when the node is pure, the depth limit is reached, too
    /// few samples remain, or no split lowers the impurity.
    fn build_tree<R: Rng + ?Sized>(
        features: &[Vec<f64>],
        labels: &[Label],
        indices: &[usize],
        depth: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> TreeNode {
        let counts = class_counts(labels, indices);
        let parent_impurity = gini(counts);

        if depth >= params.max_depth
            || indices.len() < params.min_samples_split
            || parent_impurity == 0.0
        {
            return leaf(counts);
        }

        let Some(split) = Self::find_best_split(features, labels, indices, parent_impurity, params, rng)
        else {
            return leaf(counts);
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| features[i][split.feature_idx] <= split.threshold);

        let left = Self::build_tree(features, labels, &left_indices, depth + 1, params, rng);
        let right = Self::build_tree(features, labels, &right_indices, depth + 1, params, rng);

        TreeNode::Split {
            feature_idx: split.feature_idx,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Find the split with the lowest weighted gini impurity.
    ///
    /// Features are visited in random order. After `max_features` of them
    /// have been examined the search stops, unless no valid split was found
    /// yet, in which case it keeps going through the remaining features.
    fn find_best_split<R: Rng + ?Sized>(
        features: &[Vec<f64>],
        labels: &[Label],
        indices: &[usize],
        parent_impurity: f64,
        params: &TreeParams,
        rng: &mut R,
    ) -> Option<SplitCandidate> {
        let n_features = features[indices[0]].len();
        let mut order: Vec<usize> = (0..n_features).collect();
        order.shuffle(rng);

        let mut best: Option<SplitCandidate> = None;

        for (examined, feature_idx) in order.into_iter().enumerate() {
            if examined >= params.max_features && best.is_some() {
                break;
            }

            let mut values: Vec<(f64, Label)> = indices
                .iter()
                .map(|&i| (features[i][feature_idx], labels[i]))
                .collect();
            values.sort_by(|a, b| a.0.total_cmp(&b.0));

            let total = class_counts_of(values.iter().map(|(_, l)| *l));
            let mut left = [0usize; 2];

            for i in 1..values.len() {
                left[values[i - 1].1.index()] += 1;

                let (lo, hi) = (values[i - 1].0, values[i].0);
                if lo >= hi {
                    continue;
                }

                let right = [total[0] - left[0], total[1] - left[1]];
                let impurity = weighted_gini(left, right);

                if impurity < parent_impurity
                    && best.as_ref().is_none_or(|b| impurity < b.impurity)
                {
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold: midpoint(lo, hi),
                        impurity,
                    });
                }
            }
        }

        best
    }

    /// Predict using a tree node.
    fn predict_node(node: &TreeNode, row: &[f64]) -> Option<[f64; 2]> {
        match node {
            TreeNode::Leaf { probabilities } => Some(*probabilities),
            TreeNode::Split {
                feature_idx,
                threshold,
                left,
                right,
            } => {
                let value = *row.get(*feature_idx)?;
                if value <= *threshold {
                    Self::predict_node(left, row)
                } else {
                    Self::predict_node(right, row)
                }
            }
        }
    }
}

fn class_counts(labels: &[Label], indices: &[usize]) -> [usize; 2] {
    class_counts_of(indices.iter().map(|&i| labels[i]))
}

fn class_counts_of<I: Iterator<Item = Label>>(labels: I) -> [usize; 2] {
    let mut counts = [0usize; 2];
    for label in labels {
        counts[label.index()] += 1;
    }
    counts
}

fn leaf(counts: [usize; 2]) -> TreeNode {
    let total = (counts[0] + counts[1]) as f64;
    let probabilities = if total == 0.0 {
        [0.5, 0.5]
    } else {
        [counts[0] as f64 / total, counts[1] as f64 / total]
    };
    TreeNode::Leaf { probabilities }
}

fn gini(counts: [usize; 2]) -> f64 {
    let total = (counts[0] + counts[1]) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let p0 = counts[0] as f64 / total;
    let p1 = counts[1] as f64 / total;
    1.0 - p0 * p0 - p1 * p1
}

fn weighted_gini(left: [usize; 2], right: [usize; 2]) -> f64 {
    let n_left = (left[0] + left[1]) as f64;
    let n_right = (right[0] + right[1]) as f64;
    let total = n_left + n_right;
    (n_left * gini(left) + n_right * gini(right)) / total
}

// Midpoint of two distinct values, kept strictly below `hi` so `hi` goes right.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi { lo } else { mid }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: 10,
            min_samples_split: 2,
            max_features: 2,
        }
    }

    fn separable() -> (Vec<Vec<f64>>, Vec<Label>) {
        let features = vec![
            vec![1.0, 5.0],
            vec![2.0, 5.0],
            vec![3.0, 5.0],
            vec![10.0, 5.0],
            vec![11.0, 5.0],
            vec![12.0, 5.0],
        ];
        let labels = vec![
            Label::Legitimate,
            Label::Legitimate,
            Label::Legitimate,
            Label::Phishing,
            Label::Phishing,
            Label::Phishing,
        ];
        (features, labels)
    }

    #[test]
    fn test_decision_tree_creation() {
        let tree = DecisionTree::new();
        assert!(!tree.is_fitted());
        assert_eq!(tree.predict_proba(&[1.0, 2.0]), Some([0.5, 0.5]));
        assert!(tree.validate(2).is_err());
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn test_fits_separable_data() {
        let (features, labels) = separable();
        let sample: Vec<usize> = (0..features.len()).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let tree = DecisionTree::fit(&features, &labels, &sample, &params(), &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.predict_proba(&[2.5, 5.0]), Some([1.0, 0.0]));
        assert_eq!(tree.predict_proba(&[11.5, 5.0]), Some([0.0, 1.0]));
        // Threshold sits between 3 and 10.
        assert_eq!(tree.predict_proba(&[6.5, 0.0]), Some([1.0, 0.0]));
        assert!(tree.validate(2).is_ok());
        assert_eq!(tree.predict_proba(&[]), None);
    }

    #[test]
    fn test_pure_node_is_leaf() {
        let features = vec![vec![1.0], vec![2.0]];
        let labels = vec![Label::Phishing, Label::Phishing];
        let mut rng = StdRng::seed_from_u64(1);

        let tree = DecisionTree::fit(&features, &labels, &[0, 1], &params(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.predict_proba(&[100.0]), Some([0.0, 1.0]));
    }

    #[test]
    fn test_max_depth_zero_gives_prior() {
        let (features, labels) = separable();
        let sample: Vec<usize> = (0..features.len()).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let shallow = TreeParams {
            max_depth: 0,
            ..params()
        };

        let tree = DecisionTree::fit(&features, &labels, &sample, &shallow, &mut rng);
        assert_eq!(tree.predict_proba(&[1.0, 5.0]), Some([0.5, 0.5]));
    }

    #[test]
    fn test_constant_features_give_leaf() {
        let features = vec![vec![1.0], vec![1.0], vec![1.0]];
        let labels = vec![Label::Phishing, Label::Legitimate, Label::Phishing];
        let mut rng = StdRng::seed_from_u64(3);

        let tree = DecisionTree::fit(&features, &labels, &[0, 1, 2], &params(), &mut rng);
        assert_eq!(tree.node_count(), 1);
        let p = tree.predict_proba(&[1.0]).unwrap();
        assert!((p[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    fn tree_with(root: TreeNode) -> DecisionTree {
        DecisionTree {
            root: Some(Box::new(root)),
        }
    }

    fn split(feature_idx: usize, threshold: f64) -> TreeNode {
        TreeNode::Split {
            feature_idx,
            threshold,
            left: Box::new(TreeNode::Leaf {
                probabilities: [1.0, 0.0],
            }),
            right: Box::new(TreeNode::Leaf {
                probabilities: [0.0, 1.0],
            }),
        }
    }

    #[test]
    fn test_validate_rejects_feature_past_width() {
        let tree = tree_with(split(3, 0.5));
        assert!(tree.validate(4).is_ok());
        assert!(tree.validate(3).is_err());
        assert_eq!(tree.predict_proba(&[0.0, 0.0, 0.0]), None);
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        assert!(tree_with(split(0, f64::NAN)).validate(1).is_err());
        assert!(tree_with(split(0, f64::INFINITY)).validate(1).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_leaves() {
        for probabilities in [
            [7.5, -3.0],
            [0.5, 0.6],
            [0.2, 0.2],
            [f64::NAN, 1.0],
        ] {
            let tree = tree_with(TreeNode::Leaf { probabilities });
            assert!(tree.validate(1).is_err(), "{probabilities:?}");
        }

        let nested = tree_with(TreeNode::Split {
            feature_idx: 0,
            threshold: 1.0,
            left: Box::new(TreeNode::Leaf {
                probabilities: [1.0, 0.0],
            }),
            right: Box::new(TreeNode::Leaf {
                probabilities: [1.5, -0.5],
            }),
        });
        assert!(nested.validate(1).is_err());
    }

    #[test]
    fn test_midpoint_stays_below_upper_value() {
        assert_eq!(midpoint(1.0, 3.0), 2.0);
        let lo: f64 = 1.0;
        let hi = f64::from_bits(lo.to_bits() + 1);
        assert_eq!(midpoint(lo, hi), lo);
    }
}
