use thiserror::Error;

/// Errors raised by the transcription pipeline.
///
/// Session-fatal variants (`Upload`, `Submission`, `PollTimeout`,
/// `Provider`, `Aborted`) transition the session to `Failed` but are
/// reported back over the stream rather than tearing down the
/// connection handler.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    /// Operation referenced a session id the provider doesn't know.
    /// Recoverable: the caller can retry or start a new session.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Capability lookup for a provider name that isn't registered.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Durable storage of the finalized audio failed. Fatal to the session.
    #[error("audio upload failed: {0}")]
    Upload(String),

    /// The speech service rejected the transcription job. Fatal to the session.
    #[error("job submission failed: {0}")]
    Submission(String),

    /// Polling exceeded the hard ceiling without a terminal status.
    #[error("polling timed out after {0:.0}s")]
    PollTimeout(f64),

    /// The speech service reported a terminal failure for the job.
    #[error("provider error: {0}")]
    Provider(String),

    /// The session was aborted while work was in flight.
    #[error("session aborted")]
    Aborted,

    /// A client-supplied chunk payload could not be decoded.
    /// Recoverable: the chunk is rejected, the session continues.
    #[error("invalid chunk payload: {0}")]
    InvalidChunk(String),

    /// Analytics requested for a transcription with no stored segments.
    #[error("no segments found for transcription: {0}")]
    NoSegments(String),
}

pub type Result<T> = std::result::Result<T, TranscriptionError>;
