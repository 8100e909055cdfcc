//! Persistent storage shared by every display process pointing at the same file.
//!
//! Values are plain strings under string keys, kept as one JSON object.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use tokio::{fs, sync::Mutex};

use crate::sync::SyncError;

pub type StoredValues = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Content of this process's most recent write.
    last_written: Mutex<Option<String>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_written: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file content, `None` if the file does not exist yet.
    pub(crate) async fn read_raw(&self) -> Result<Option<String>, SyncError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SyncError::Storage {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// All stored values. A missing or empty file holds no values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a JSON object of strings.
    pub async fn read(&self) -> Result<StoredValues, SyncError> {
        match self.read_raw().await? {
            Some(content) => parse_values(&content).map_err(|source| SyncError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            None => Ok(StoredValues::new()),
        }
    }

    /// Stores `value` under `key`, keeping every other key.
    ///
    /// The file is replaced atomically so concurrent readers never see a partial write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub async fn set(&self, key: &str, value: String) -> Result<(), SyncError> {
        let mut last_written = self.last_written.lock().await;
        // unreadable content is replaced rather than blocking every future write
        let mut values = self.read().await.unwrap_or_default();
        values.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&values).map_err(|source| {
            SyncError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        let write_err = |source: io::Error| SyncError::Storage {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, &content).await.map_err(write_err)?;
        fs::rename(&tmp, &self.path).await.map_err(write_err)?;

        *last_written = Some(content);
        Ok(())
    }

    /// Whether `content` is exactly what this process wrote last.
    pub(crate) async fn is_own_write(&self, content: &str) -> bool {
        self.last_written.lock().await.as_deref() == Some(content)
    }
}

pub(crate) fn parse_values(content: &str) -> Result<StoredValues, serde_json::Error> {
    if content.trim().is_empty() {
        return Ok(StoredValues::new());
    }
    serde_json::from_str(content)
}
