//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Record store trait definition
//! - [`click_event`] - Click accounting event model
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. A redirect resolves a short code
//! 2. A [`click_event::ClickEvent`] is submitted to the bounded queue (non-blocking)
//! 3. [`click_worker::run_click_worker`] applies one increment per event
//! 4. The counter is updated via [`repositories::UrlRepository::increment_clicks`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
