//! Provider selection
//!
//! The factory owns one instance of each provider implementation and
//! hands out the right one for a request. Its contract is to always
//! return a usable provider: unknown names and missing credentials
//! fall back to the substitute instead of failing the call.

use super::{
    provider_capabilities, RemoteProvider, SubstituteProvider, TranscriptionProvider,
    REMOTE_PROVIDER, SUBSTITUTE_PROVIDER,
};
use crate::config::TranscriptionConfig;
use crate::model::{ProcessingMode, ProcessingOptions};
use crate::storage::UploadSink;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct ProviderFactory {
    remote: Option<Arc<RemoteProvider>>,
    substitute: Arc<SubstituteProvider>,
    default_provider: String,
}

impl ProviderFactory {
    pub fn new(config: &TranscriptionConfig, sink: Arc<dyn UploadSink>) -> Self {
        let grace = Duration::from_secs(config.eviction_grace_secs);

        // The remote provider only exists when credentials are
        // configured; everything else routes to the substitute.
        let remote = if config.api_key.is_empty() {
            warn!("No speech API key configured; remote provider unavailable");
            None
        } else {
            Some(Arc::new(RemoteProvider::new(
                sink,
                config.api_base.clone(),
                config.api_key.clone(),
                Duration::from_secs(config.poll_interval_secs),
                Duration::from_secs(config.poll_timeout_secs),
                grace,
            )))
        };

        Self {
            remote,
            substitute: Arc::new(SubstituteProvider::new(grace)),
            default_provider: config.default_provider.clone(),
        }
    }

    /// Resolve a provider for the given mode and options.
    ///
    /// Never fails: requests the factory cannot honor with the remote
    /// provider get the substitute.
    pub fn create_processor(
        &self,
        mode: ProcessingMode,
        options: &ProcessingOptions,
    ) -> Arc<dyn TranscriptionProvider> {
        let requested = if options.provider.is_empty() {
            if self.default_provider.is_empty() {
                self.recommend_provider(options)
            } else {
                self.default_provider.as_str()
            }
        } else {
            options.provider.as_str()
        };

        if provider_capabilities(requested).is_err() {
            warn!(
                "Unknown provider '{}' requested; falling back to substitute",
                requested
            );
            return self.substitute.clone();
        }

        match requested {
            REMOTE_PROVIDER => match &self.remote {
                Some(remote) => {
                    info!("Selected remote provider ({:?} mode)", mode);
                    remote.clone()
                }
                None => {
                    warn!("Remote provider requested without credentials; using substitute");
                    self.substitute.clone()
                }
            },
            _ => self.substitute.clone(),
        }
    }

    /// Deterministic provider recommendation.
    ///
    /// Cost-optimized requests prefer the substitute; real-time or
    /// diarization requests prefer the remote provider; everything
    /// else defaults to the remote provider.
    pub fn recommend_provider(&self, options: &ProcessingOptions) -> &'static str {
        if options.cost_optimized {
            SUBSTITUTE_PROVIDER
        } else {
            // Real-time and diarization both need the remote provider,
            // which is also the default for plain requests.
            REMOTE_PROVIDER
        }
    }
}
