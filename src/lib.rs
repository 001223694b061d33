//! # PhishGuard
//!
//! Phishing URL detection from lexical features of the URL string.
//!
//! ## Features
//!
//! - Fixed 28-feature extraction with a versioned, hashed feature layout
//! - Random forest of gini decision trees, fitted in parallel
//! - Atomic model persistence and non-fatal restore
//! - Command line interface for training, prediction and inspection
//!
//! ```rust,no_run
//! use phishguard::prelude::*;
//!
//! # fn main() -> phishguard::error::Result<()> {
//! let classifier = UrlClassifier::new(ClassifierConfig::with_model_path("model.json"));
//! classifier.train(None)?;
//! let verdict = classifier.classify_url("http://192.168.1.1/paypal-login")?;
//! println!("{} {:.2}", verdict.prediction, verdict.confidence);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dataset;
pub mod detector;
pub mod error;
pub mod features;
pub mod ml;

pub mod prelude {
    pub use crate::config::ClassifierConfig;
    pub use crate::dataset::{Label, TrainingExample, TrainingSet};
    pub use crate::detector::{ModelInfo, Prediction, UrlClassifier, UrlVerdict};
    pub use crate::error::{PhishGuardError, Result};
    pub use crate::features::{FeatureVector, UrlFeatureExtractor, extract};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
