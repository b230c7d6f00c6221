//! Repository trait definitions for the domain layer.
//!
//! The record store is reached only through [`UrlRepository`]. Concrete
//! implementations live in `crate::infrastructure::persistence`, and a
//! `mockall` mock is generated for unit tests.

pub mod url_repository;

pub use url_repository::{StoreStats, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
