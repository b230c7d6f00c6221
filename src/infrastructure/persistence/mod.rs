//! Record store implementations.
//!
//! # Repositories
//!
//! - [`SqliteUrlRepository`] - Durable storage in a SQLite database
//! - [`InMemoryUrlRepository`] - Process-local concurrent map

pub mod memory_url_repository;
pub mod sqlite_url_repository;

pub use memory_url_repository::InMemoryUrlRepository;
pub use sqlite_url_repository::{SqliteUrlRepository, connect_pool, run_migrations};
