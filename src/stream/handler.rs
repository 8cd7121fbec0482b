//! Per-connection protocol state machine
//!
//! One handler serves one client connection, processing its messages
//! sequentially: `Idle → AwaitingStart → Active → Ending → Closed`.
//! Chunks arriving before the control handshake are buffered and
//! drained in sequence order the moment the session starts; session
//! finalize also runs when the transport drops mid-session, so no
//! audio is silently lost.
//!
//! The handler is transport-agnostic: the WebSocket layer decodes
//! frames into `ClientMessage`s and writes the returned
//! `ServerMessage`s back.

use super::messages::{ClientMessage, ServerMessage, StartSessionMetadata};
use crate::error::TranscriptionError;
use crate::events::{
    EventBus, SessionEvent, TOPIC_SESSION_COMPLETED, TOPIC_SESSION_PROCESSING,
    TOPIC_SESSION_STARTED,
};
use crate::model::{
    AudioChunk, AudioStreamMetadata, ProcessingOptions, ProcessingResult, Transcription,
    TranscriptionStatus,
};
use crate::provider::{ProviderFactory, TranscriptionProvider};
use crate::repository::TranscriptionRepository;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Connection lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    /// Fresh connection, nothing received yet
    Idle,
    /// Chunks arrived before `start_session`; buffering
    AwaitingStart,
    /// Session started; chunks forward to the provider
    Active,
    /// Finalize in progress
    Ending,
    /// Session finished (or failed); no further session work
    Closed,
}

pub struct StreamSessionHandler {
    factory: Arc<ProviderFactory>,
    repository: Arc<dyn TranscriptionRepository>,
    events: Arc<dyn EventBus>,

    connection_id: String,
    state: HandlerState,

    /// Chunks received before `start_session`, guarded against
    /// concurrent append vs drain
    pending: Mutex<Vec<AudioChunk>>,

    session_id: Option<String>,
    metadata: Option<AudioStreamMetadata>,
    language: String,
    provider: Option<Arc<dyn TranscriptionProvider>>,
    processing_event_sent: bool,
}

impl StreamSessionHandler {
    pub fn new(
        factory: Arc<ProviderFactory>,
        repository: Arc<dyn TranscriptionRepository>,
        events: Arc<dyn EventBus>,
    ) -> Self {
        Self {
            factory,
            repository,
            events,
            connection_id: uuid::Uuid::new_v4().to_string(),
            state: HandlerState::Idle,
            pending: Mutex::new(Vec::new()),
            session_id: None,
            metadata: None,
            language: String::new(),
            provider: None,
            processing_event_sent: false,
        }
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn state(&self) -> HandlerState {
        self.state
    }

    /// Greeting sent as soon as the transport is up.
    pub fn on_connect(&self) -> ServerMessage {
        ServerMessage::ConnectionEstablished {
            connection_id: self.connection_id.clone(),
        }
    }

    /// Process one inbound message; replies are delivered in order.
    pub async fn handle_message(&mut self, message: ClientMessage) -> Vec<ServerMessage> {
        match message {
            ClientMessage::StartSession {
                session_id,
                metadata,
                options,
            } => self.start_session(session_id, metadata, options).await,
            ClientMessage::AudioChunk { session_id, chunk } => {
                let chunk = match chunk.decode() {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        return vec![ServerMessage::Error {
                            message: e.to_string(),
                        }]
                    }
                };
                self.audio_chunk(&session_id, chunk).await
            }
            ClientMessage::EndSession { session_id } => self.end_session(&session_id).await,
            ClientMessage::GetSessionStatus { session_id } => {
                self.session_status(&session_id).await
            }
        }
    }

    /// Transport dropped. An active session still gets the full
    /// finalize path so buffered audio isn't lost.
    pub async fn on_disconnect(&mut self) {
        if self.state != HandlerState::Active {
            return;
        }

        let session_id = match self.session_id.clone() {
            Some(id) => id,
            None => return,
        };

        warn!(
            "Connection {} dropped with active session {}; finalizing",
            self.connection_id, session_id
        );

        match self.finalize(&session_id).await {
            Ok(result) => info!(
                "Session {} finalized after disconnect: {} segment(s)",
                session_id,
                result.segments.len()
            ),
            Err(e) => error!("Finalize after disconnect failed for {}: {}", session_id, e),
        }
    }

    async fn start_session(
        &mut self,
        session_id: Option<String>,
        start: StartSessionMetadata,
        options: Option<ProcessingOptions>,
    ) -> Vec<ServerMessage> {
        match self.state {
            HandlerState::Idle | HandlerState::AwaitingStart => {}
            _ => {
                return vec![ServerMessage::Error {
                    message: "session already started on this connection".to_string(),
                }]
            }
        }

        let options = options.unwrap_or_default();
        let session_id =
            session_id.unwrap_or_else(|| format!("session-{}", uuid::Uuid::new_v4()));

        let metadata = AudioStreamMetadata {
            session_id: session_id.clone(),
            meeting_id: start.meeting_id,
            user_id: start.user_id,
            sample_rate: start.sample_rate.unwrap_or(16000),
            channels: start.channels.unwrap_or(1),
            bit_depth: start.bit_depth.unwrap_or(16),
            mime_type: start.mime_type.unwrap_or_else(|| "audio/pcm".to_string()),
            started_at: Utc::now(),
            mode: options.mode,
        };

        let provider = self.factory.create_processor(options.mode, &options);
        self.language = options.language.clone();

        if let Err(e) = provider.start_session(metadata.clone(), options).await {
            return vec![ServerMessage::Error {
                message: e.to_string(),
            }];
        }

        info!(
            "Session {} started on connection {} via {}",
            session_id,
            self.connection_id,
            provider.name()
        );

        let mut replies = vec![ServerMessage::SessionStarted {
            session_id: session_id.clone(),
        }];

        // Drain everything buffered before the handshake, in original
        // sequence order, ahead of any live chunk.
        let mut buffered = {
            let mut pending = self.pending.lock().await;
            std::mem::take(&mut *pending)
        };
        buffered.sort_by_key(|c| c.sequence);

        if !buffered.is_empty() {
            let count = buffered.len();
            for chunk in buffered {
                if let Err(e) = provider.process_chunk(&session_id, chunk).await {
                    warn!("Buffered chunk failed for session {}: {}", session_id, e);
                    replies.push(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
            replies.push(ServerMessage::BufferedChunksProcessed { count });
        }

        self.publish_event(TOPIC_SESSION_STARTED, &metadata, None, None)
            .await;

        self.session_id = Some(session_id);
        self.metadata = Some(metadata);
        self.provider = Some(provider);
        self.state = HandlerState::Active;

        replies
    }

    async fn audio_chunk(&mut self, session_id: &str, chunk: AudioChunk) -> Vec<ServerMessage> {
        match self.state {
            HandlerState::Idle | HandlerState::AwaitingStart => {
                // Tolerate clients that stream before the handshake
                // completes: buffer, don't reject.
                let buffered_count = {
                    let mut pending = self.pending.lock().await;
                    pending.push(chunk.clone());
                    pending.len()
                };
                self.state = HandlerState::AwaitingStart;

                vec![ServerMessage::ChunkBuffered {
                    sequence_num: chunk.sequence,
                    buffered_count,
                }]
            }
            HandlerState::Active => {
                let provider = match self.provider.clone() {
                    Some(provider) => provider,
                    None => {
                        return vec![ServerMessage::Error {
                            message: format!("unknown session: {}", session_id),
                        }]
                    }
                };
                let sequence = chunk.sequence;

                match provider.process_chunk(session_id, chunk).await {
                    Ok(()) => {
                        if !self.processing_event_sent {
                            self.processing_event_sent = true;
                            if let Some(metadata) = self.metadata.clone() {
                                self.publish_event(TOPIC_SESSION_PROCESSING, &metadata, None, None)
                                    .await;
                            }
                        }
                        vec![ServerMessage::ChunkProcessed {
                            sequence_num: sequence,
                        }]
                    }
                    // Per-chunk failures are reported but never end
                    // the session.
                    Err(e) => {
                        warn!("Chunk {} failed for session {}: {}", sequence, session_id, e);
                        vec![ServerMessage::Error {
                            message: e.to_string(),
                        }]
                    }
                }
            }
            HandlerState::Ending | HandlerState::Closed => vec![ServerMessage::Error {
                message: "session is no longer accepting audio".to_string(),
            }],
        }
    }

    async fn end_session(&mut self, session_id: &str) -> Vec<ServerMessage> {
        if self.state != HandlerState::Active {
            return vec![ServerMessage::Error {
                message: "no active session to end".to_string(),
            }];
        }

        if self.session_id.as_deref() != Some(session_id) {
            return vec![ServerMessage::Error {
                message: format!("unknown session: {}", session_id),
            }];
        }

        match self.finalize(session_id).await {
            Ok(result) => vec![ServerMessage::SessionEnded { result }],
            Err(e) => vec![ServerMessage::Error {
                message: e.to_string(),
            }],
        }
    }

    /// Shared finalize path for `end_session` and transport teardown:
    /// provider finalize, persistence, completion event.
    async fn finalize(&mut self, session_id: &str) -> Result<ProcessingResult, TranscriptionError> {
        self.state = HandlerState::Ending;

        let provider = self
            .provider
            .clone()
            .ok_or_else(|| TranscriptionError::SessionNotFound(session_id.to_string()))?;

        let result = match provider.end_session(session_id).await {
            Ok(result) => result,
            Err(e) => {
                self.state = HandlerState::Closed;
                return Err(e);
            }
        };

        if let Some(metadata) = self.metadata.clone() {
            let transcription = Transcription {
                id: result.transcription_id.clone(),
                session_id: session_id.to_string(),
                meeting_id: metadata.meeting_id.clone(),
                user_id: metadata.user_id.clone(),
                status: result.status,
                provider: provider.name().to_string(),
                language: self.language.clone(),
                audio_url: result.audio_url.clone(),
                created_at: metadata.started_at,
                completed_at: Some(Utc::now()),
            };

            if let Err(e) = self.repository.save(transcription).await {
                error!("Failed to persist transcription {}: {}", result.transcription_id, e);
            }
            if let Err(e) = self
                .repository
                .save_segments(&result.transcription_id, result.segments.clone())
                .await
            {
                error!("Failed to persist segments for {}: {}", result.transcription_id, e);
            }

            self.publish_event(
                TOPIC_SESSION_COMPLETED,
                &metadata,
                Some(result.transcription_id.clone()),
                Some(result.segments.len()),
            )
            .await;
        }

        info!(
            "Session {} ended: {} segment(s), status {:?}",
            session_id,
            result.segments.len(),
            result.status
        );

        self.state = HandlerState::Closed;
        Ok(result)
    }

    async fn session_status(&self, session_id: &str) -> Vec<ServerMessage> {
        match &self.provider {
            Some(provider) => match provider.get_session_status(session_id).await {
                Ok(status) => vec![ServerMessage::SessionStatus {
                    session_id: session_id.to_string(),
                    status,
                    active: provider.is_session_active(session_id).await,
                }],
                Err(e) => vec![ServerMessage::Error {
                    message: e.to_string(),
                }],
            },
            None => vec![ServerMessage::SessionStatus {
                session_id: session_id.to_string(),
                status: TranscriptionStatus::Pending,
                active: false,
            }],
        }
    }

    async fn publish_event(
        &self,
        topic: &str,
        metadata: &AudioStreamMetadata,
        transcription_id: Option<String>,
        segment_count: Option<usize>,
    ) {
        let event = SessionEvent {
            session_id: metadata.session_id.clone(),
            meeting_id: metadata.meeting_id.clone(),
            user_id: metadata.user_id.clone(),
            timestamp: Utc::now(),
            transcription_id,
            segment_count,
        };

        if let Err(e) = self.events.publish(topic, &event).await {
            warn!("Failed to publish {}: {}", topic, e);
        }
    }
}
