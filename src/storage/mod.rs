//! Storage module exports.
//!
//! Each collection is a JSON array file under the data directory.

mod json_file;
mod models;
mod repository;

pub use json_file::StoreError;
pub use models::{Blog, Drama, Game, NewBlog, NewDrama};
pub use repository::{BlogRepository, DramaRepository, GameRepository};
