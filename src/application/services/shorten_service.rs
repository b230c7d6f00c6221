//! Short code allocation service.

use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::target_url::validate_target_url;
use serde_json::json;
use tracing::{debug, error, info, warn};

/// Default bound on generation attempts (and on insert-race rounds).
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// A freshly allocated short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedLink {
    pub code: String,
    pub short_url: String,
}

/// Service that allocates short codes and stores new mappings.
///
/// The `exists` pre-check only avoids wasted inserts. Uniqueness is enforced
/// by [`UrlRepository::insert_unique`], so a concurrent request that grabs the
/// same code between check and insert surfaces as a conflict at insert time.
pub struct ShortenService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    generator: CodeGenerator,
    max_attempts: usize,
    base_url: String,
}

impl<R: UrlRepository + ?Sized> ShortenService<R> {
    /// Creates a new shortening service.
    ///
    /// `base_url` is the public prefix of short URLs, e.g. `https://s.example.com`.
    pub fn new(
        repository: Arc<R>,
        generator: CodeGenerator,
        max_attempts: usize,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            generator,
            max_attempts: max_attempts.max(1),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Maps `target` to a short code.
    ///
    /// An empty `custom_code` is treated the same as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `target` is not an absolute http(s) URL.
    ///
    /// Returns [`AppError::InvalidCode`] if the custom code breaks the length or
    /// charset rules.
    ///
    /// Returns [`AppError::CodeConflict`] if the custom code is taken, or if
    /// every generated candidate lost an insert race.
    ///
    /// Returns [`AppError::GenerationExhausted`] if no free code was drawn
    /// within the attempt bound.
    ///
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn shorten(
        &self,
        target: String,
        custom_code: Option<String>,
    ) -> Result<ShortenedLink, AppError> {
        validate_target_url(&target).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let record = match custom_code.filter(|code| !code.is_empty()) {
            Some(code) => self.allocate_custom(code, target).await?,
            None => self.allocate_generated(target).await?,
        };

        info!(code = %record.code, "Short link created");

        Ok(ShortenedLink {
            short_url: self.short_url(&record.code),
            code: record.code,
        })
    }

    /// Composes the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Stores a caller-chosen code. Conflicts are never retried.
    async fn allocate_custom(&self, code: String, target: String) -> Result<UrlRecord, AppError> {
        validate_custom_code(&code)?;

        if self.repository.exists(&code).await? {
            return Err(AppError::code_conflict(
                "Shortcode already exists",
                json!({ "code": code }),
            ));
        }

        self.repository
            .insert_unique(NewUrlRecord::new(code, target))
            .await
    }

    /// Stores a generated code, redrawing when an insert loses a race.
    async fn allocate_generated(&self, target: String) -> Result<UrlRecord, AppError> {
        for round in 1..=self.max_attempts {
            let code = self.generate_unique_code().await?;

            match self
                .repository
                .insert_unique(NewUrlRecord::new(code.clone(), target.clone()))
                .await
            {
                Ok(record) => return Ok(record),
                Err(e) if e.is_code_conflict() => {
                    warn!(code = %code, round, "Generated code taken at insert time, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::code_conflict(
            "Shortcode already exists",
            json!({
                "reason": "Every generated code was claimed concurrently",
                "rounds": self.max_attempts,
            }),
        ))
    }

    /// Draws candidates until one is not in the store.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();

            if !self.repository.exists(&code).await? {
                return Ok(code);
            }

            debug!(code = %code, attempt, "Generated code collides, redrawing");
        }

        error!(
            attempts = self.max_attempts,
            length = self.generator.length(),
            "Failed to generate unique shortcode"
        );

        Err(AppError::generation_exhausted(
            "Failed to generate unique shortcode",
            json!({ "attempts": self.max_attempts }),
        ))
    }
}
