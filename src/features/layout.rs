//! Frozen feature ordering for a trained model.
//!
//! The model consumes features positionally. A [`FeatureLayout`] records the
//! order captured at training time, together with a version and a CRC32 hash
//! of the names, and is stored alongside the model. Prediction-time mappings
//! are re-projected onto it by name.
//!
//! Bump [`LAYOUT_VERSION`](super::LAYOUT_VERSION) whenever features are added,
//! removed or reordered in the extractor.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{PhishGuardError, Result};
use crate::features::vector::FeatureVector;

/// Versioned, ordered list of feature names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLayout {
    version: u32,
    names: Vec<String>,
    hash: u32,
}

impl FeatureLayout {
    /// Freeze a layout from explicit names.
    pub fn new(version: u32, names: Vec<String>) -> Self {
        let hash = compute_hash(version, &names);
        Self {
            version,
            names,
            hash,
        }
    }

    /// Freeze the order of an extracted vector.
    pub fn from_vector(version: u32, vector: &FeatureVector) -> Self {
        Self::new(version, vector.names().map(str::to_string).collect())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Whether the stored hash still matches the names, i.e. the layout was
    /// not altered after it was frozen.
    pub fn is_consistent(&self) -> bool {
        self.hash == compute_hash(self.version, &self.names)
    }

    /// Project a mapping onto this layout's order.
    ///
    /// Every layout name must be present; extra names in `vector` are ignored.
    pub fn project(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        self.names
            .iter()
            .map(|name| {
                vector
                    .get(name)
                    .ok_or_else(|| PhishGuardError::feature_mismatch(name.as_str(), self.len()))
            })
            .collect()
    }
}

fn compute_hash(version: u32, names: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&version.to_le_bytes());
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}
