//! Labeled training data.
//!
//! A [`TrainingSet`] is an ordered sequence of `(url, label)` pairs. The
//! detector does not care where it comes from: the built-in corpus
//! ([`default_training_set`]), a JSON file ([`load_training_data`]) or a
//! caller-assembled vector.

pub mod sample;

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{PhishGuardError, Result};

pub use sample::default_training_set;

/// Binary class label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Label {
    /// Legitimate URL (0).
    Legitimate = 0,
    /// Phishing URL (1).
    Phishing = 1,
}

impl Label {
    /// Class index used for probability rows.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label for a class index.
    pub fn from_index(index: usize) -> Option<Label> {
        match index {
            0 => Some(Label::Legitimate),
            1 => Some(Label::Phishing),
            _ => None,
        }
    }

    pub fn is_phishing(self) -> bool {
        self == Label::Phishing
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Legitimate => "legitimate",
            Label::Phishing => "phishing",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> Self {
        label as u8
    }
}

impl TryFrom<u8> for Label {
    type Error = PhishGuardError;

    fn try_from(value: u8) -> Result<Self> {
        Label::from_index(value as usize).ok_or_else(|| {
            PhishGuardError::training_data(format!("label must be 0 or 1, got {value}"))
        })
    }
}

impl TryFrom<i64> for Label {
    type Error = PhishGuardError;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value)
            .map_err(|_| PhishGuardError::training_data(format!("label must be 0 or 1, got {value}")))
            .and_then(Label::try_from)
    }
}

/// One labeled URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub url: String,
    pub label: Label,
}

impl TrainingExample {
    pub fn new<S: Into<String>>(url: S, label: Label) -> Self {
        Self {
            url: url.into(),
            label,
        }
    }
}

/// Ordered sequence of labeled URLs.
pub type TrainingSet = Vec<TrainingExample>;

/// Load training data from a JSON file holding an array of
/// `{"url": "...", "label": 0|1}` objects.
pub fn load_training_data<P: AsRef<Path>>(path: P) -> Result<TrainingSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        PhishGuardError::training_data(format!("cannot open {}: {e}", path.display()))
    })?;
    let samples: TrainingSet = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        PhishGuardError::training_data(format!("cannot parse {}: {e}", path.display()))
    })?;
    Ok(samples)
}

/// Deterministic shuffled split of `0..n` into `(train, test)` indices.
///
/// `ceil(n * test_fraction)` rows go to the test partition, but at least one
/// row is always left for training. The same `seed` always yields the same
/// split.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    if n < 2 {
        return (indices, Vec::new());
    }

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.clamp(1, n - 1);

    let train = indices.split_off(n_test);
    (train, indices)
}
