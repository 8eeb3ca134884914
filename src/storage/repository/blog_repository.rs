//! Blog repository.
//!
//! Handles CRUD operations for blog posts in `blogs.json`.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::storage::json_file::{JsonFile, Mutation, StoreError};
use crate::storage::models::{Blog, NewBlog};
use crate::utils::fields;

/// Repository for blog posts.
pub struct BlogRepository {
    file: JsonFile<Blog>,
}

impl BlogRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join("blogs.json")),
        }
    }

    pub async fn list(&self) -> Result<Vec<Blog>, StoreError> {
        self.file.read_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Blog>, StoreError> {
        Ok(self.list().await?.into_iter().find(|b| b.id == id))
    }

    pub async fn create(&self, new: NewBlog) -> Result<Blog, StoreError> {
        let blog = self
            .file
            .modify(|blogs| {
                let id = fields::next_id(blogs.iter().map(|b| b.id))
                    .ok_or_else(|| StoreError::Rejected("no blog id left above the largest stored one".to_string()))?;
                let blog = new.into_blog(id);
                blogs.push(blog.clone());
                Ok(Mutation::Write(blog))
            })
            .await?;

        debug!("Created blog {}", blog.id);
        Ok(blog)
    }

    /// Merge `patch` into the post. `id` is never changed.
    pub async fn update(&self, id: i64, patch: &Map<String, Value>) -> Result<Option<Blog>, StoreError> {
        self.file
            .modify(|blogs| {
                let Some(blog) = blogs.iter_mut().find(|b| b.id == id) else {
                    return Ok(Mutation::Skip(None));
                };
                *blog = fields::merge(&*blog, patch, &["id"]).map_err(|e| StoreError::Rejected(e.to_string()))?;
                Ok(Mutation::Write(Some(blog.clone())))
            })
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Blog>, StoreError> {
        self.file
            .modify(|blogs| match blogs.iter().position(|b| b.id == id) {
                Some(index) => Ok(Mutation::Write(Some(blogs.remove(index)))),
                None => Ok(Mutation::Skip(None)),
            })
            .await
    }
}
