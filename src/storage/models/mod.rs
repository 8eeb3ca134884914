//! Storage models.

mod blog;
mod drama;
mod game;

pub use blog::{Blog, NewBlog};
pub use drama::{Drama, NewDrama};
pub use game::Game;
