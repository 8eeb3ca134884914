//! Drama repository.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::storage::json_file::{JsonFile, Mutation, StoreError};
use crate::storage::models::{Drama, NewDrama};
use crate::utils::fields;

/// Repository for drama progress in `dramas.json`.
pub struct DramaRepository {
    file: JsonFile<Drama>,
}

impl DramaRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join("dramas.json")),
        }
    }

    pub async fn list(&self) -> Result<Vec<Drama>, StoreError> {
        self.file.read_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Drama>, StoreError> {
        Ok(self.list().await?.into_iter().find(|d| d.id == id))
    }

    pub async fn create(&self, new: NewDrama) -> Result<Drama, StoreError> {
        let drama = self
            .file
            .modify(|dramas| {
                let id = fields::next_id(dramas.iter().map(|d| d.id))
                    .ok_or_else(|| StoreError::Rejected("no drama id left above the largest stored one".to_string()))?;
                let drama = new.into_drama(id);
                dramas.push(drama.clone());
                Ok(Mutation::Write(drama))
            })
            .await?;

        debug!("Created drama {} ({})", drama.id, drama.title);
        Ok(drama)
    }

    pub async fn update(&self, id: i64, patch: &Map<String, Value>) -> Result<Option<Drama>, StoreError> {
        self.file
            .modify(|dramas| {
                let Some(drama) = dramas.iter_mut().find(|d| d.id == id) else {
                    return Ok(Mutation::Skip(None));
                };
                *drama = fields::merge(&*drama, patch, &["id"]).map_err(|e| StoreError::Rejected(e.to_string()))?;
                Ok(Mutation::Write(Some(drama.clone())))
            })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Drama>, StoreError> {
        self.file
            .modify(|dramas| match dramas.iter().position(|d| d.id == id) {
                Some(index) => Ok(Mutation::Write(Some(dramas.remove(index)))),
                None => Ok(Mutation::Skip(None)),
            })
            .await
    }
}
