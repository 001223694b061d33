//! Error types for phishguard.
//!
//! All fallible operations return [`PhishGuardError`] through the crate-wide
//! [`Result`] alias. The variants separate failures that only affect a single
//! URL (extraction) from failures that invalidate a whole operation (fit,
//! insufficient classes, persistence writes).
//!
//! # Examples
//!
//! ```
//! use phishguard::error::{PhishGuardError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PhishGuardError::extraction("not-a-url", "relative URL without a base"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;
use std::io;
use std::path::Path;

use thiserror::Error;

/// Direction of a failed persistence operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceKind {
    /// Reading or decoding the model record.
    Read,
    /// Encoding or writing the model record.
    Write,
}

impl fmt::Display for PersistenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceKind::Read => write!(f, "read"),
            PersistenceKind::Write => write!(f, "write"),
        }
    }
}

/// The main error type for phishguard operations.
#[derive(Error, Debug)]
pub enum PhishGuardError {
    /// The URL could not be parsed into the components features are computed from.
    #[error("Feature extraction failed for {url:?}: {message}")]
    Extraction { url: String, message: String },

    /// A prediction or persist was attempted before a model was trained or loaded.
    #[error("Model not ready: {0}")]
    ModelNotReady(String),

    /// A feature required by the trained layout is absent from the input vector.
    #[error("Feature mismatch: missing feature {missing:?} (layout has {expected} features)")]
    FeatureMismatch { missing: String, expected: usize },

    /// Reading or writing the persisted model record failed.
    #[error("Persistence {kind} error at {path}: {message}")]
    Persistence {
        path: String,
        kind: PersistenceKind,
        message: String,
    },

    /// The training data cannot produce a binary classifier.
    #[error("Training data error: {0}")]
    TrainingData(String),

    /// The classification capability rejected its input.
    #[error("Fit error: {0}")]
    Fit(String),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O errors outside model persistence (data files, config files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with PhishGuardError.
pub type Result<T> = std::result::Result<T, PhishGuardError>;

impl PhishGuardError {
    /// Create a new extraction error.
    pub fn extraction<U: Into<String>, S: Into<String>>(url: U, msg: S) -> Self {
        PhishGuardError::Extraction {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create a new model-not-ready error.
    pub fn model_not_ready<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::ModelNotReady(msg.into())
    }

    /// Create a new feature mismatch error.
    pub fn feature_mismatch<S: Into<String>>(missing: S, expected: usize) -> Self {
        PhishGuardError::FeatureMismatch {
            missing: missing.into(),
            expected,
        }
    }

    /// Create a persistence read error.
    pub fn persistence_read<S: Into<String>>(path: &Path, msg: S) -> Self {
        PhishGuardError::Persistence {
            path: path.display().to_string(),
            kind: PersistenceKind::Read,
            message: msg.into(),
        }
    }

    /// Create a persistence write error.
    pub fn persistence_write<S: Into<String>>(path: &Path, msg: S) -> Self {
        PhishGuardError::Persistence {
            path: path.display().to_string(),
            kind: PersistenceKind::Write,
            message: msg.into(),
        }
    }

    /// Create a new training data error.
    pub fn training_data<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::TrainingData(msg.into())
    }

    /// Create a new fit error.
    pub fn fit<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::Fit(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PhishGuardError::InvalidConfig(msg.into())
    }

    /// Whether this error only concerns a single input URL.
    pub fn is_extraction(&self) -> bool {
        matches!(self, PhishGuardError::Extraction { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PhishGuardError::model_not_ready("no model loaded");
        assert_eq!(error.to_string(), "Model not ready: no model loaded");

        let error = PhishGuardError::feature_mismatch("has_ip", 28);
        assert_eq!(
            error.to_string(),
            "Feature mismatch: missing feature \"has_ip\" (layout has 28 features)"
        );

        let error = PhishGuardError::training_data("only one class");
        assert_eq!(error.to_string(), "Training data error: only one class");
    }

    #[test]
    fn test_persistence_error_kind() {
        let error = PhishGuardError::persistence_write(Path::new("models/m.json"), "disk full");
        assert_eq!(
            error.to_string(),
            "Persistence write error at models/m.json: disk full"
        );
        match error {
            PhishGuardError::Persistence { kind, .. } => assert_eq!(kind, PersistenceKind::Write),
            _ => panic!("Expected persistence error variant"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = PhishGuardError::from(io_error);

        match error {
            PhishGuardError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_is_extraction() {
        assert!(PhishGuardError::extraction("", "empty").is_extraction());
        assert!(!PhishGuardError::fit("bad").is_extraction());
    }
}
