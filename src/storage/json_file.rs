//! JSON array file wrapper.
//!
//! A collection lives in one file holding a JSON array. Every mutation reads
//! the whole file, changes it in memory and writes it back.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Errors raised by collection files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} does not hold a valid JSON array: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The requested change conflicts with stored data.
    #[error("{0}")]
    Rejected(String),
}

/// Outcome of a mutation closure.
pub enum Mutation<R> {
    /// Persist the changed collection and return the value.
    Write(R),
    /// Leave the file untouched.
    Skip(R),
}

/// A JSON array file of `T` records.
///
/// Mutations within this process are serialised; across processes the last
/// writer wins.
pub struct JsonFile<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read every record. A missing file is an empty collection.
    pub async fn read_all(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Read, mutate and (if asked to) write back the collection.
    pub async fn modify<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Vec<T>) -> Result<Mutation<R>, StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;

        match f(&mut records)? {
            Mutation::Write(result) => {
                self.save(&records).await?;
                Ok(result)
            }
            Mutation::Skip(result) => Ok(result),
        }
    }

    /// Replace the whole collection.
    pub async fn replace_all(&self, records: &[T]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.save(records).await
    }

    async fn load(&self) -> Result<Vec<T>, StoreError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet, treating as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_str(&data).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, records: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        // Write then rename so readers never see a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| self.io_error(e))?;

        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
