//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{ResolveService, ShortenService};
use crate::domain::click_worker::ClickSender;
use crate::domain::repositories::UrlRepository;
use crate::utils::code_generator::CodeGenerator;

/// Handles to the services and the store backing them.
///
/// Cloned per request; every field is a cheap reference-counted handle.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<dyn UrlRepository>>,
    pub resolve_service: Arc<ResolveService<dyn UrlRepository>>,
    pub repository: Arc<dyn UrlRepository>,
    pub click_sender: ClickSender,
}

impl AppState {
    /// Wires both services to one store and click queue.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        click_sender: ClickSender,
        generator: CodeGenerator,
        max_generation_attempts: usize,
        base_url: impl Into<String>,
    ) -> Self {
        let shorten_service = Arc::new(ShortenService::new(
            Arc::clone(&repository),
            generator,
            max_generation_attempts,
            base_url,
        ));
        let resolve_service = Arc::new(ResolveService::new(
            Arc::clone(&repository),
            click_sender.clone(),
        ));

        Self {
            shorten_service,
            resolve_service,
            repository,
            click_sender,
        }
    }
}
