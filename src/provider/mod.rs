//! Pluggable speech recognition providers
//!
//! This module provides the `TranscriptionProvider` abstraction and its
//! two implementations:
//! - `RemoteProvider`: uploads session audio, submits a job to an
//!   external speech API, and polls for completion
//! - `SubstituteProvider`: deterministic stand-in that synthesizes
//!   diarized segments, for environments without service credentials
//!
//! A `ProviderFactory` selects between them and a static capability
//! registry answers what each provider supports.

mod capabilities;
mod factory;
mod remote;
mod session;
mod substitute;

pub use capabilities::{
    all_capabilities, provider_capabilities, ProviderCapabilities, REMOTE_PROVIDER,
    SUBSTITUTE_PROVIDER,
};
pub use factory::ProviderFactory;
pub use remote::RemoteProvider;
pub use session::SessionRegistry;
pub use substitute::SubstituteProvider;

use crate::error::Result;
use crate::model::{
    AudioChunk, AudioStreamMetadata, ProcessingOptions, ProcessingResult, TranscriptionStatus,
};
use async_trait::async_trait;

/// Lifecycle operations every provider implements.
///
/// Calling code is provider-agnostic: both implementations uphold the
/// same segment invariants (contiguous 1-based sequence numbers,
/// `end_time >= start_time`, confidence in [0, 1]).
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Provider name as registered in the capability table.
    fn name(&self) -> &'static str;

    /// Create the in-memory session record. Idempotent: starting an
    /// already-known session id returns it unchanged.
    async fn start_session(
        &self,
        metadata: AudioStreamMetadata,
        options: ProcessingOptions,
    ) -> Result<String>;

    /// Append one chunk to the session buffer.
    async fn process_chunk(&self, session_id: &str, chunk: AudioChunk) -> Result<()>;

    /// Finalize: concatenate, upload, transcribe, and return segments.
    async fn end_session(&self, session_id: &str) -> Result<ProcessingResult>;

    /// Current status of a session.
    async fn get_session_status(&self, session_id: &str) -> Result<TranscriptionStatus>;

    /// Cancel a session: marks it `Failed` and evicts it immediately.
    async fn abort_session(&self, session_id: &str) -> Result<()>;

    /// Whether the session exists and hasn't reached a terminal state.
    async fn is_session_active(&self, session_id: &str) -> bool;
}
