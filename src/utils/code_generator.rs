//! Short code generation and validation utilities.
//!
//! Generated and custom codes share one alphabet: ASCII upper and lower case
//! letters plus digits (62 symbols).

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde_json::json;

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Shortest accepted custom code.
pub const MIN_CUSTOM_CODE_LENGTH: usize = 4;

/// Longest accepted custom code.
pub const MAX_CUSTOM_CODE_LENGTH: usize = 16;

/// Number of symbols in the code alphabet.
pub const ALPHABET_SIZE: usize = 62;

/// Returns true if `c` belongs to the code alphabet.
pub fn is_code_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Produces random candidate codes of a fixed length.
///
/// Each symbol is drawn uniformly from the 62-symbol alphabet using the
/// thread-local RNG. Candidates carry no uniqueness guarantee; collisions are
/// resolved against the store by [`crate::application::services::ShortenService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draws one candidate code.
    pub fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

/// Validates a caller-chosen short code.
///
/// # Rules
///
/// - Length: 4-16 characters
/// - Allowed characters: `A-Z`, `a-z`, `0-9`
///
/// # Errors
///
/// Returns [`AppError::InvalidCode`] if any rule is violated.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_custom_code("promo1").is_ok());
/// assert!(validate_custom_code("ab").is_err());        // Too short
/// assert!(validate_custom_code("my-link").is_err());   // Hyphen not allowed
/// ```
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    let length = code.chars().count();
    if !(MIN_CUSTOM_CODE_LENGTH..=MAX_CUSTOM_CODE_LENGTH).contains(&length) {
        return Err(AppError::invalid_code(
            "Custom code must be 4-16 alphanumeric characters",
            json!({ "provided_length": length }),
        ));
    }

    if !code.chars().all(is_code_char) {
        return Err(AppError::invalid_code(
            "Custom code must be 4-16 alphanumeric characters",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
