pub mod analytics;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod model;
pub mod provider;
pub mod repository;
pub mod segment;
pub mod storage;
pub mod stream;

pub use analytics::{analyze, AnalyticsData};
pub use config::Config;
pub use error::TranscriptionError;
pub use events::{EventBus, MemoryEventBus, NatsEventBus, SessionEvent};
pub use http::{create_router, AppState};
pub use model::{
    AudioChunk, AudioStreamMetadata, ProcessingMode, ProcessingOptions, ProcessingResult,
    Transcription, TranscriptSegment, TranscriptionStatus,
};
pub use provider::{
    ProviderFactory, RemoteProvider, SubstituteProvider, TranscriptionProvider,
};
pub use repository::{InMemoryTranscriptionRepository, TranscriptionRepository};
pub use segment::{normalize_speaker, UNKNOWN_SPEAKER};
pub use storage::{LocalUploadSink, UploadSink};
pub use stream::{ClientMessage, ServerMessage, StreamSessionHandler};
