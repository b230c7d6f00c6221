//! Utility functions for short code handling and input validation.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`target_url`] - Target URL validation

pub mod code_generator;
pub mod target_url;
