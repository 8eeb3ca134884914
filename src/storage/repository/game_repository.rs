//! Game ranking repository.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::storage::json_file::{JsonFile, Mutation, StoreError};
use crate::storage::models::Game;
use crate::utils::fields;

/// Repository for game rankings in `games.json`.
///
/// Ids are client-chosen strings.
pub struct GameRepository {
    file: JsonFile<Game>,
}

impl GameRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join("games.json")),
        }
    }

    pub async fn list(&self) -> Result<Vec<Game>, StoreError> {
        self.file.read_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Game>, StoreError> {
        Ok(self.list().await?.into_iter().find(|g| g.id == id))
    }

    /// Add a game. Fails with [`StoreError::Rejected`] if the id is taken.
    pub async fn create(&self, game: Game) -> Result<Game, StoreError> {
        self.file
            .modify(|games| {
                if games.iter().any(|g| g.id == game.id) {
                    return Err(StoreError::Rejected("id must be unique".to_string()));
                }
                games.push(game.clone());
                debug!("Created game {}", game.id);
                Ok(Mutation::Write(game))
            })
            .await
    }

    /// Overwrite the fields present in `patch`.
    pub async fn update(&self, id: &str, patch: &Map<String, Value>) -> Result<Option<Game>, StoreError> {
        self.file
            .modify(|games| {
                let Some(game) = games.iter_mut().find(|g| g.id == id) else {
                    return Ok(Mutation::Skip(None));
                };
                *game = fields::merge(&*game, patch, &["id"]).map_err(|e| StoreError::Rejected(e.to_string()))?;
                Ok(Mutation::Write(Some(game.clone())))
            })
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Game>, StoreError> {
        self.file
            .modify(|games| match games.iter().position(|g| g.id == id) {
                Some(index) => Ok(Mutation::Write(Some(games.remove(index)))),
                None => Ok(Mutation::Skip(None)),
            })
            .await
    }

    /// Replace the whole collection, e.g. from a spreadsheet export.
    pub async fn replace_all(&self, games: &[Game]) -> Result<usize, StoreError> {
        self.file.replace_all(games).await?;
        info!("Replaced games data with {} entries", games.len());
        Ok(games.len())
    }
}
