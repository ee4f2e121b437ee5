// Durable storage for the session credential

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::debug;

use crate::errors::ReboundError;

/// Name of the file holding the bearer token
pub const CREDENTIAL_FILE_NAME: &str = "token";

/// Trait defining where the session credential survives between runs
pub trait CredentialStorage: Send + Sync {
    /// Read the persisted credential, if any
    fn load(&self) -> Result<Option<String>, ReboundError>;

    /// Persist `credential`, replacing any previous one
    fn save(&self, credential: &str) -> Result<(), ReboundError>;

    /// Forget the persisted credential. Clearing an empty storage is not an error.
    fn clear(&self) -> Result<(), ReboundError>;
}

/// Keeps the credential in a single file
#[derive(Debug, Clone)]
pub struct FileCredentialStorage {
    path: PathBuf,
}

impl FileCredentialStorage {
    /// Store the credential inside `storage_dir`
    pub fn new(storage_dir: PathBuf) -> Self {
        Self {
            path: storage_dir.join(CREDENTIAL_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStorage for FileCredentialStorage {
    fn load(&self) -> Result<Option<String>, ReboundError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ReboundError::CredentialIOError { source: e })?;
        let credential = content.trim();
        if credential.is_empty() {
            return Ok(None);
        }
        Ok(Some(credential.to_string()))
    }

    fn save(&self, credential: &str) -> Result<(), ReboundError> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| ReboundError::CredentialIOError { source: e })?;
            }
        }
        fs::write(&self.path, credential)
            .map_err(|e| ReboundError::CredentialIOError { source: e })?;
        debug!("Saved credential to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<(), ReboundError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed credential file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReboundError::CredentialIOError { source: e }),
        }
    }
}

/// In-process storage, for embedding front ends that persist elsewhere and for tests
#[derive(Debug, Default)]
pub struct MemoryCredentialStorage {
    credential: Mutex<Option<String>>,
}

impl MemoryCredentialStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: &str) -> Self {
        Self {
            credential: Mutex::new(Some(credential.to_string())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // a poisoned lock still holds a usable Option
        self.credential
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStorage for MemoryCredentialStorage {
    fn load(&self) -> Result<Option<String>, ReboundError> {
        Ok(self.slot().clone())
    }

    fn save(&self, credential: &str) -> Result<(), ReboundError> {
        *self.slot() = Some(credential.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ReboundError> {
        *self.slot() = None;
        Ok(())
    }
}
