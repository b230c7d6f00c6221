//! # Shortly
//!
//! A URL shortening service built with Axum and SQLite.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Records, the store contract and click accounting
//! - **Application Layer** ([`application`]) - Shortening and resolution services
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite and in-memory stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//! - **Client** ([`client`]) - Outbound client for a running instance
//!
//! ## Guarantees
//!
//! - A short code maps to at most one target, even under concurrent requests
//! - A resolved code returns exactly the URL that was submitted
//! - Redirects never wait on click accounting
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://shortly.db"
//! export BASE_URL="http://127.0.0.1:8000"
//!
//! cargo run
//! ```
//!
//! Migrations are embedded and applied on startup. See [`config`] for all
//! available options.

pub mod api;
pub mod application;
pub mod client;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;
