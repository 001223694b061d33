//! Phishing URL classifier lifecycle: train, persist, restore, predict, describe.
//!
//! [`UrlClassifier`] is either untrained or holds one [`ModelRecord`] (model
//! plus frozen feature layout). Retraining and restoring build a complete new
//! record first and publish it with a single write, so a concurrent
//! prediction sees either the old record or the new one, never a mix.
//!
//! # Example
//!
//! ```rust,no_run
//! use phishguard::config::ClassifierConfig;
//! use phishguard::detector::UrlClassifier;
//! use phishguard::features::extract;
//!
//! # fn main() -> phishguard::error::Result<()> {
//! let classifier = UrlClassifier::open(ClassifierConfig::default());
//! if !classifier.is_trained() {
//!     classifier.train(None)?;
//! }
//!
//! let prediction = classifier.predict(&extract("http://secure-update.tk/account")?)?;
//! println!("{} ({:.2})", prediction.label, prediction.confidence);
//! # Ok(())
//! # }
//! ```

pub mod persist;

use std::collections::HashSet;
use std::slice;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::dataset::{self, Label, TrainingSet};
use crate::error::{PhishGuardError, Result};
use crate::features::{FeatureLayout, FeatureVector, LAYOUT_VERSION, UrlFeatureExtractor};
use crate::ml::{BinaryClassifier, ClassificationMetrics, RandomForest};

pub use persist::{ModelRecord, RECORD_FORMAT_VERSION};

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class.
    pub label: Label,
    /// Probability the model assigns to `label`.
    pub confidence: f64,
    /// Full probability row, indexed by [`Label::index`].
    pub probabilities: [f64; 2],
}

impl Prediction {
    /// Probability of the phishing class, whatever label was predicted.
    pub fn phishing_probability(&self) -> f64 {
        self.probabilities[Label::Phishing.index()]
    }
}

/// Prediction for a raw URL, with the features it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlVerdict {
    pub url: String,
    pub prediction: Label,
    pub confidence: f64,
    pub is_phishing: bool,
    pub features: FeatureVector,
}

/// Details of a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModelInfo {
    pub model_type: String,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub estimator_count: Option<usize>,
    pub layout_version: u32,
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub metrics: ClassificationMetrics,
}

/// Description of the classifier state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelInfo {
    NotTrained,
    Trained(TrainedModelInfo),
}

impl ModelInfo {
    pub fn is_trained(&self) -> bool {
        matches!(self, ModelInfo::Trained(_))
    }

    pub fn status(&self) -> &'static str {
        match self {
            ModelInfo::NotTrained => "not_trained",
            ModelInfo::Trained(_) => "trained",
        }
    }
}

/// Phishing URL classifier.
///
/// Cheap to share behind an `Arc`; all operations take `&self`.
#[derive(Debug)]
pub struct UrlClassifier {
    config: ClassifierConfig,
    extractor: UrlFeatureExtractor,
    state: RwLock<Option<Arc<ModelRecord>>>,
    /// Serializes writers so the file on disk matches the published record.
    write_lock: Mutex<()>,
}

impl UrlClassifier {
    /// Create an untrained classifier.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            extractor: UrlFeatureExtractor::new(),
            state: RwLock::new(None),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a classifier and restore the persisted model if one is usable.
    pub fn open(config: ClassifierConfig) -> Self {
        let classifier = Self::new(config);
        if classifier.config.model_path.exists() {
            classifier.restore();
        }
        classifier
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_trained(&self) -> bool {
        self.state.read().is_some()
    }

    /// Snapshot of the current record.
    pub fn current(&self) -> Option<Arc<ModelRecord>> {
        self.state.read().clone()
    }

    /// Train on `examples`, or on the built-in corpus when `None`.
    ///
    /// Examples whose URL cannot be featurized are skipped with a warning. The
    /// feature layout is frozen from the first successful extraction. After
    /// fitting on the training partition the model is evaluated on the held-out
    /// partition, persisted, and only then published.
    pub fn train(&self, examples: Option<TrainingSet>) -> Result<ClassificationMetrics> {
        self.config.validate()?;

        let examples = examples.unwrap_or_else(|| {
            log::info!("No training data supplied, using the built-in corpus");
            dataset::default_training_set()
        });

        log::info!("Extracting features for {} examples", examples.len());
        let mut layout: Option<FeatureLayout> = None;
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(examples.len());
        let mut labels: Vec<Label> = Vec::with_capacity(examples.len());

        for example in &examples {
            let vector = match self.extractor.extract(&example.url) {
                Ok(vector) => vector,
                Err(e) => {
                    log::warn!("Skipping training example: {e}");
                    continue;
                }
            };
            let layout = layout.get_or_insert_with(|| FeatureLayout::from_vector(LAYOUT_VERSION, &vector));
            match layout.project(&vector) {
                Ok(row) => {
                    rows.push(row);
                    labels.push(example.label);
                }
                Err(e) => log::warn!("Skipping training example {:?}: {e}", example.url),
            }
        }

        let Some(layout) = layout else {
            return Err(PhishGuardError::training_data(
                "no training example could be featurized",
            ));
        };

        let classes: HashSet<Label> = labels.iter().copied().collect();
        if classes.len() < 2 {
            return Err(PhishGuardError::training_data(format!(
                "need examples of both classes, got {} usable example(s) of {} class(es)",
                labels.len(),
                classes.len()
            )));
        }

        let skipped = examples.len() - rows.len();
        if skipped > 0 {
            log::warn!("Skipped {skipped} of {} examples", examples.len());
        }

        let (train_idx, test_idx) =
            dataset::train_test_split(rows.len(), self.config.test_fraction, self.config.split_seed);
        let (x_train, y_train) = select(&rows, &labels, &train_idx);
        let (x_test, y_test) = select(&rows, &labels, &test_idx);

        log::info!(
            "Training with {} samples ({} held out)",
            x_train.len(),
            x_test.len()
        );

        let mut model = RandomForest::new(self.config.forest);
        model.fit(&x_train, &y_train)?;

        let y_pred = model.predict(&x_test)?;
        let metrics = ClassificationMetrics::compute(&y_test, &y_pred);

        log::info!("Model performance:");
        log::info!("  Accuracy:  {:.4}", metrics.accuracy);
        log::info!("  Precision: {:.4}", metrics.precision);
        log::info!("  Recall:    {:.4}", metrics.recall);
        log::info!("  F1 Score:  {:.4}", metrics.f1_score);

        let record = Arc::new(ModelRecord::new(model, layout, metrics, x_train.len()));

        let _guard = self.write_lock.lock();
        persist::save(&record, &self.config.model_path)?;
        *self.state.write() = Some(record);

        Ok(metrics)
    }

    /// Predict the class of an extracted feature mapping.
    ///
    /// The mapping is re-projected onto the frozen layout by name; a missing
    /// feature fails with [`PhishGuardError::FeatureMismatch`]. `confidence` is
    /// the probability of the predicted class.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let record = self
            .current()
            .ok_or_else(|| PhishGuardError::model_not_ready("model not trained or loaded"))?;

        let row = record.layout.project(features)?;
        let rows = slice::from_ref(&row);

        let label = first(record.model.predict(rows)?)?;
        let probabilities = first(record.model.predict_proba(rows)?)?;
        let confidence = probabilities[label.index()];

        log::debug!("Predicted {label} with confidence {confidence:.4}");

        Ok(Prediction {
            label,
            confidence,
            probabilities,
        })
    }

    /// Extract features from `url` and predict its class.
    pub fn classify_url(&self, url: &str) -> Result<UrlVerdict> {
        let features = self.extractor.extract(url)?;
        let prediction = self.predict(&features)?;

        log::info!(
            "Prediction for {url}: {} (confidence: {:.2})",
            prediction.label.index(),
            prediction.confidence
        );

        Ok(UrlVerdict {
            url: url.to_string(),
            prediction: prediction.label,
            confidence: prediction.confidence,
            is_phishing: prediction.label.is_phishing(),
            features,
        })
    }

    /// Write the current model record to the configured path.
    pub fn persist(&self) -> Result<()> {
        let record = self
            .current()
            .ok_or_else(|| PhishGuardError::model_not_ready("nothing to persist"))?;
        let _guard = self.write_lock.lock();
        persist::save(&record, &self.config.model_path)
    }

    /// Load the model record from the configured path.
    ///
    /// Any failure is logged and leaves the classifier untrained; this never
    /// returns an error so an unusable model file does not stop the caller
    /// from starting. Returns whether a model was loaded.
    pub fn restore(&self) -> bool {
        let path = &self.config.model_path;
        let _guard = self.write_lock.lock();
        match persist::load(path) {
            Ok(record) => {
                *self.state.write() = Some(Arc::new(record));
                log::info!("Model loaded from {}", path.display());
                true
            }
            Err(e) => {
                *self.state.write() = None;
                log::warn!("Failed to load model: {e}");
                false
            }
        }
    }

    /// Describe the current state.
    pub fn describe(&self) -> ModelInfo {
        match self.current() {
            None => ModelInfo::NotTrained,
            Some(record) => ModelInfo::Trained(TrainedModelInfo {
                model_type: record.model.model_type().to_string(),
                feature_count: record.layout.len(),
                feature_names: record.layout.names().to_vec(),
                estimator_count: record.model.estimator_count(),
                layout_version: record.layout.version(),
                trained_at: record.trained_at,
                training_samples: record.training_samples,
                metrics: record.metrics,
            }),
        }
    }
}

fn select(rows: &[Vec<f64>], labels: &[Label], indices: &[usize]) -> (Vec<Vec<f64>>, Vec<Label>) {
    indices
        .iter()
        .map(|&i| (rows[i].clone(), labels[i]))
        .unzip()
}

fn first<T>(values: Vec<T>) -> Result<T> {
    values
        .into_iter()
        .next()
        .ok_or_else(|| PhishGuardError::fit("model returned no output for the input row"))
}
