//! Repository module - one repository per collection file.

mod blog_repository;
mod drama_repository;
mod game_repository;

pub use blog_repository::BlogRepository;
pub use drama_repository::DramaRepository;
pub use game_repository::GameRepository;
