//! Core domain entities.
//!
//! Entities are plain data structures. Creation input lives in a separate
//! `New*` struct so that store-assigned fields (click count, timestamps) can
//! never be supplied by callers.
//!
//! - [`UrlRecord`] - A short code mapped to its target URL
//! - [`NewUrlRecord`] - Input for allocating a record

pub mod url_record;

pub use url_record::{NewUrlRecord, UrlRecord};
