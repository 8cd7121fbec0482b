use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable description of an incoming audio stream.
///
/// Captured when the session starts; never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioStreamMetadata {
    /// Unique session identifier
    pub session_id: String,

    /// Meeting this stream belongs to
    pub meeting_id: String,

    /// User who opened the stream
    pub user_id: String,

    /// Sample rate in Hz (Whisper-style pipelines expect 16kHz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Number of audio channels (1 = mono, 2 = stereo)
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Bits per sample
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u16,

    /// MIME type of the chunk payloads
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// When the stream started
    #[serde(default = "Utc::now")]
    pub started_at: DateTime<Utc>,

    /// Requested processing mode
    #[serde(default)]
    pub mode: ProcessingMode,
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_channels() -> u16 {
    1
}

fn default_bit_depth() -> u16 {
    16
}

fn default_mime_type() -> String {
    "audio/pcm".to_string()
}

/// How the session's audio should be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    RealTime,
    #[default]
    Batch,
}

/// Options supplied at session start.
///
/// Captured into the session record when the session is created and
/// immutable for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Provider name ("assemblyai", "mock"); empty = let the factory decide
    #[serde(default)]
    pub provider: String,

    /// Processing mode
    #[serde(default)]
    pub mode: ProcessingMode,

    /// BCP-47 language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Attribute segments to distinct speakers
    #[serde(default)]
    pub diarization: bool,

    /// Insert punctuation into the transcript
    #[serde(default = "default_true")]
    pub punctuate: bool,

    /// Mask profanity in the transcript
    #[serde(default)]
    pub filter_profanity: bool,

    /// Minimum confidence for returned segments
    #[serde(default)]
    pub confidence_threshold: f64,

    /// Prefer the cheapest provider over the most capable one
    #[serde(default)]
    pub cost_optimized: bool,

    /// Request live partial results where supported
    #[serde(default)]
    pub real_time: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            provider: String::new(),
            mode: ProcessingMode::Batch,
            language: default_language(),
            diarization: false,
            punctuate: true,
            filter_profanity: false,
            confidence_threshold: 0.0,
            cost_optimized: false,
            real_time: false,
        }
    }
}

/// A single chunk of streamed audio.
///
/// Chunks are ordered by `sequence` within a session; no two chunks in
/// a session share a sequence number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioChunk {
    /// Opaque byte payload
    pub data: Vec<u8>,

    /// Capture timestamp
    pub timestamp: DateTime<Utc>,

    /// Monotonically increasing sequence number
    pub sequence: u64,

    /// Payload size in bytes
    pub size: usize,

    /// Chunk duration in seconds, if the client reports it
    pub duration: Option<f64>,
}

/// Lifecycle status of a transcription.
///
/// Strictly forward-moving per session; no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// One normalized transcript segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Owning transcription
    pub transcription_id: String,

    /// Speaker label; never empty (unknown speakers get the canonical sentinel)
    pub speaker: String,

    /// Transcribed text
    pub text: String,

    /// Segment start in seconds from recording start
    pub start_time: f64,

    /// Segment end in seconds; always >= start_time
    pub end_time: f64,

    /// Provider confidence, 0.0 to 1.0
    pub confidence: f64,

    /// 1-based, contiguous per transcription
    pub sequence: u32,
}

/// Outcome of finalizing a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub transcription_id: String,
    pub status: TranscriptionStatus,
    pub segments: Vec<TranscriptSegment>,
    pub mode: ProcessingMode,
    pub message: String,
    pub audio_url: Option<String>,
}

/// Persistence record for a finalized transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub id: String,
    pub session_id: String,
    pub meeting_id: String,
    pub user_id: String,
    pub status: TranscriptionStatus,
    pub provider: String,
    pub language: String,
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}
