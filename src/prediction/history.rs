// Local log of past predictions, one JSON object per line

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::ReboundError;

use super::types::{AthleteVitals, TrainingMetrics};

const HISTORY_FILE_NAME: &str = "history.jsonl";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionRecord {
    pub recorded_at: SystemTime,
    pub vitals: AthleteVitals,
    pub metrics: TrainingMetrics,
    pub predicted_recovery_days: f64,
}

impl PredictionRecord {
    pub fn new(vitals: &AthleteVitals, metrics: &TrainingMetrics, predicted_recovery_days: f64) -> Self {
        Self {
            recorded_at: SystemTime::now(),
            vitals: vitals.clone(),
            metrics: metrics.clone(),
            predicted_recovery_days,
        }
    }
}

/// Append-only prediction history backed by a JSON lines file
#[derive(Clone, Debug)]
pub struct PredictionHistory {
    path: PathBuf,
}

impl PredictionHistory {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// History file inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &PredictionRecord) -> Result<(), ReboundError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ReboundError::HistoryIOError { source: e })?;
            }
        }

        serde_jsonlines::append_json_lines(&self.path, [record])
            .map_err(|e| ReboundError::HistoryIOError { source: e })?;
        debug!("Appended prediction to {:?}", self.path);
        Ok(())
    }

    /// All recorded predictions, oldest first. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<PredictionRecord>, ReboundError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        serde_jsonlines::json_lines(&self.path)
            .map_err(|e| ReboundError::HistoryIOError { source: e })?
            .collect::<Result<Vec<PredictionRecord>, std::io::Error>>()
            .map_err(|e| ReboundError::HistoryIOError { source: e })
    }
}
