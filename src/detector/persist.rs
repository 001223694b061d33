//! Model record persistence.
//!
//! A trained model and its frozen feature layout are written together as one
//! JSON document. Writes go to a sibling `.tmp` file that is renamed into
//! place, so a reader never observes a half-written record.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PhishGuardError, Result};
use crate::features::FeatureLayout;
use crate::ml::{ClassificationMetrics, RandomForest};

/// Version of the on-disk record format.
pub const RECORD_FORMAT_VERSION: u32 = 1;

/// A trained model together with everything needed to use it.
///
/// This is both the in-memory trained state of the detector and the
/// persisted record; it is always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub format_version: u32,
    pub model: RandomForest,
    pub layout: FeatureLayout,
    pub trained_at: DateTime<Utc>,
    pub metrics: ClassificationMetrics,
    pub training_samples: usize,
}

impl ModelRecord {
    pub fn new(
        model: RandomForest,
        layout: FeatureLayout,
        metrics: ClassificationMetrics,
        training_samples: usize,
    ) -> Self {
        Self {
            format_version: RECORD_FORMAT_VERSION,
            model,
            layout,
            trained_at: Utc::now(),
            metrics,
            training_samples,
        }
    }

    /// Check that a decoded record is usable.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.format_version != RECORD_FORMAT_VERSION {
            return Err(format!(
                "unsupported record format version {} (expected {})",
                self.format_version, RECORD_FORMAT_VERSION
            ));
        }
        if !self.layout.is_consistent() {
            return Err("feature layout hash does not match its names".to_string());
        }
        self.model.validate()?;
        if self.model.n_features() != self.layout.len() {
            return Err(format!(
                "model expects {} features but layout lists {}",
                self.model.n_features(),
                self.layout.len()
            ));
        }
        Ok(())
    }
}

/// Write `record` to `path`, creating missing parent directories.
pub fn save(record: &ModelRecord, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                PhishGuardError::persistence_write(path, format!("cannot create directory: {e}"))
            })?;
        }
    }

    let tmp_path = temp_path(path);
    if let Err(e) = write_record(record, &tmp_path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PhishGuardError::persistence_write(path, e));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        PhishGuardError::persistence_write(path, format!("failed to rename temporary file: {e}"))
    })?;

    log::info!("Model saved to {}", path.display());
    Ok(())
}

/// Read and validate the record at `path`.
pub fn load(path: &Path) -> Result<ModelRecord> {
    let file = File::open(path).map_err(|e| PhishGuardError::persistence_read(path, e.to_string()))?;
    let record: ModelRecord = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| PhishGuardError::persistence_read(path, e.to_string()))?;
    record
        .validate()
        .map_err(|message| PhishGuardError::persistence_read(path, message))?;
    Ok(record)
}

fn write_record(record: &ModelRecord, path: &Path) -> std::result::Result<(), String> {
    let file = File::create(path).map_err(|e| format!("cannot create file: {e}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, record).map_err(|e| format!("cannot encode record: {e}"))?;
    writer.flush().map_err(|e| format!("cannot flush file: {e}"))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| format!("cannot sync file: {e}"))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
