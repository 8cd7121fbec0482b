use crate::events::EventBus;
use crate::provider::ProviderFactory;
use crate::repository::TranscriptionRepository;
use std::sync::Arc;

/// Shared application state for HTTP handlers and stream connections
#[derive(Clone)]
pub struct AppState {
    pub factory: Arc<ProviderFactory>,
    pub repository: Arc<dyn TranscriptionRepository>,
    pub events: Arc<dyn EventBus>,
}

impl AppState {
    pub fn new(
        factory: Arc<ProviderFactory>,
        repository: Arc<dyn TranscriptionRepository>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            factory,
            repository,
            events,
        }
    }
}
