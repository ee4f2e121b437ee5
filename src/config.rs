use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::ReboundError;

const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "rebound";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every API path is appended to
    pub base_url: String,
    /// Where the session credential and the prediction history are kept,
    /// defaults to the application data directory
    pub data_dir: Option<PathBuf>,
    /// Append every successful prediction to the local history file
    pub record_history: bool,
}

/// Application directory under the platform data directory
pub fn default_storage_dir() -> Result<PathBuf, ReboundError> {
    let app_data_dir = dirs::data_dir().ok_or(ReboundError::NoConfigDir)?;
    Ok(app_data_dir.join(APP_DIR_NAME))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: None,
            record_history: true,
        }
    }
}

impl ClientConfig {
    pub fn default_path() -> Result<PathBuf, ReboundError> {
        Ok(dirs::config_dir()
            .ok_or(ReboundError::NoConfigDir)?
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// `data_dir` if set, `<data dir>/rebound` otherwise
    pub fn storage_dir(&self) -> Result<PathBuf, ReboundError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_storage_dir(),
        }
    }

    pub fn from_file(config_path: &Path) -> Result<Option<Self>, ReboundError> {
        if !config_path.exists() {
            return Ok(None);
        }

        let file = std::fs::File::open(config_path)
            .map_err(|e| ReboundError::ConfigIOError { source: e })?;
        let config = serde_json::from_reader(file)
            .map_err(|e| ReboundError::ConfigSerializeError { source: e })?;
        debug!("Loaded config from {:?}", config_path);
        Ok(Some(config))
    }

    pub fn from_local_file() -> Result<Option<Self>, ReboundError> {
        Self::from_file(&Self::default_path()?)
    }

    /// Local config file if there is one, defaults otherwise, with `base_url` overriding the file.
    pub fn load(base_url: Option<String>) -> Result<Self, ReboundError> {
        let config = Self::from_local_file()?.unwrap_or_default();
        Ok(config.with_base_url(base_url))
    }

    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = base_url;
        }
        self
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), ReboundError> {
        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ReboundError::ConfigIOError { source: e })?;
            }
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| ReboundError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| ReboundError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), ReboundError> {
        self.save_to(&Self::default_path()?)
    }
}
