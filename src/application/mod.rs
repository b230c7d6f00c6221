//! Application layer services implementing business logic.
//!
//! Services receive their record store through the constructor and never
//! reach for process-wide state.
//!
//! # Available Services
//!
//! - [`services::shorten_service::ShortenService`] - Short code allocation
//! - [`services::resolve_service::ResolveService`] - Redirect resolution and record inspection

pub mod services;
