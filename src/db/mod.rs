//! Storage layer: SQLite pool initialization and the repository.

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
