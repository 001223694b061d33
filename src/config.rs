//! Classifier configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PhishGuardError, Result};
use crate::ml::ForestConfig;

/// Default location of the persisted model record.
pub const DEFAULT_MODEL_PATH: &str = "models/phishing_detector.json";

/// Configuration for [`UrlClassifier`](crate::detector::UrlClassifier).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// File the trained model is persisted to and restored from.
    pub model_path: PathBuf,
    /// Fraction of examples held out for evaluation.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub split_seed: u64,
    /// Random forest hyperparameters.
    pub forest: ForestConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            test_fraction: 0.2,
            split_seed: 42,
            forest: ForestConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Default config persisting to `model_path`.
    pub fn with_model_path<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }

    /// Load a JSON config file; missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let config: ClassifierConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the classifier cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PhishGuardError::invalid_config(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.forest.n_estimators == 0 {
            return Err(PhishGuardError::invalid_config("forest.n_estimators must be at least 1"));
        }
        if self.forest.max_depth == 0 {
            return Err(PhishGuardError::invalid_config("forest.max_depth must be at least 1"));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(PhishGuardError::invalid_config("model_path must not be empty"));
        }
        Ok(())
    }
}
