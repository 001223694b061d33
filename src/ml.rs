//! Classification capability behind the detector.
//!
//! The detector only talks to models through [`BinaryClassifier`]. The shipped
//! implementation is a [`RandomForest`] of gini [`DecisionTree`]s.

pub mod classifier;
pub mod forest;
pub mod metrics;
pub mod tree;

pub use classifier::BinaryClassifier;
pub use forest::{ForestConfig, RandomForest};
pub use metrics::ClassificationMetrics;
pub use tree::{DecisionTree, TreeParams};
