//! Static provider capability registry

use crate::error::{Result, TranscriptionError};
use crate::model::ProcessingMode;
use serde::Serialize;

/// Name of the remote speech-service provider.
pub const REMOTE_PROVIDER: &str = "assemblyai";

/// Name of the deterministic substitute provider.
pub const SUBSTITUTE_PROVIDER: &str = "mock";

/// What a provider supports, for validation and recommendation.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderCapabilities {
    pub name: &'static str,
    pub modes: &'static [ProcessingMode],
    pub diarization: bool,
    pub real_time: bool,
}

const CAPABILITIES: &[ProviderCapabilities] = &[
    ProviderCapabilities {
        name: REMOTE_PROVIDER,
        modes: &[ProcessingMode::RealTime, ProcessingMode::Batch],
        diarization: true,
        real_time: true,
    },
    ProviderCapabilities {
        name: SUBSTITUTE_PROVIDER,
        modes: &[ProcessingMode::Batch],
        diarization: true,
        real_time: false,
    },
];

/// Capability table for every registered provider.
pub fn all_capabilities() -> &'static [ProviderCapabilities] {
    CAPABILITIES
}

/// Capabilities of one provider by name.
///
/// Unrecognized names are an error; this is the one factory surface
/// that doesn't fall back.
pub fn provider_capabilities(name: &str) -> Result<&'static ProviderCapabilities> {
    CAPABILITIES
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| TranscriptionError::UnknownProvider(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_providers_resolve() {
        let remote = provider_capabilities(REMOTE_PROVIDER).unwrap();
        assert!(remote.diarization);
        assert!(remote.real_time);

        let substitute = provider_capabilities(SUBSTITUTE_PROVIDER).unwrap();
        assert!(substitute.diarization);
        assert!(!substitute.real_time);
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let err = provider_capabilities("unknown").unwrap_err();
        assert!(matches!(
            err,
            crate::error::TranscriptionError::UnknownProvider(_)
        ));
    }
}
