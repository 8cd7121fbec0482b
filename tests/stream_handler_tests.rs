// Integration tests for the stream session handler state machine
//
// The handler is transport-agnostic, so these tests drive it directly
// with protocol messages and inspect the replies, the repository, and
// the event bus. The factory has no API key configured, so every
// session runs on the substitute provider.

use base64::Engine;
use meeting_scribe::config::TranscriptionConfig;
use meeting_scribe::events::{
    MemoryEventBus, TOPIC_SESSION_COMPLETED, TOPIC_SESSION_STARTED,
};
use meeting_scribe::stream::{
    ClientMessage, HandlerState, ServerMessage, StartSessionMetadata, StreamSessionHandler,
    WireChunk,
};
use meeting_scribe::{
    InMemoryTranscriptionRepository, LocalUploadSink, ProcessingOptions, ProviderFactory,
    TranscriptionRepository, TranscriptionStatus, UNKNOWN_SPEAKER,
};
use std::sync::Arc;
use tempfile::TempDir;

struct Fixture {
    handler: StreamSessionHandler,
    repository: Arc<InMemoryTranscriptionRepository>,
    events: Arc<MemoryEventBus>,
    _uploads: TempDir,
}

fn fixture() -> Fixture {
    let uploads = TempDir::new().unwrap();
    let factory = Arc::new(ProviderFactory::new(
        &TranscriptionConfig::default(),
        Arc::new(LocalUploadSink::new(uploads.path())),
    ));
    let repository = Arc::new(InMemoryTranscriptionRepository::new());
    let events = Arc::new(MemoryEventBus::new());

    Fixture {
        handler: StreamSessionHandler::new(factory, repository.clone(), events.clone()),
        repository,
        events,
        _uploads: uploads,
    }
}

fn start_message(session_id: &str, diarization: bool) -> ClientMessage {
    let mut options = ProcessingOptions::default();
    options.diarization = diarization;

    ClientMessage::StartSession {
        session_id: Some(session_id.to_string()),
        metadata: StartSessionMetadata {
            meeting_id: "meeting-1".to_string(),
            user_id: "user-1".to_string(),
            sample_rate: None,
            channels: None,
            bit_depth: None,
            mime_type: None,
        },
        options: Some(options),
    }
}

fn chunk_message(session_id: &str, sequence: u64) -> ClientMessage {
    ClientMessage::AudioChunk {
        session_id: session_id.to_string(),
        chunk: WireChunk {
            data: base64::engine::general_purpose::STANDARD.encode(vec![sequence as u8; 32]),
            timestamp: None,
            sequence_num: sequence,
            size: None,
            duration: None,
        },
    }
}

#[tokio::test]
async fn chunks_before_start_are_buffered_then_drained() {
    let mut fx = fixture();

    // Client streams before the handshake completes
    for seq in [2u64, 1, 3] {
        let replies = fx.handler.handle_message(chunk_message("s1", seq)).await;
        assert!(
            matches!(replies[0], ServerMessage::ChunkBuffered { sequence_num, .. } if sequence_num == seq)
        );
    }
    assert_eq!(fx.handler.state(), HandlerState::AwaitingStart);

    let replies = fx.handler.handle_message(start_message("s1", false)).await;

    assert!(matches!(replies[0], ServerMessage::SessionStarted { .. }));
    assert!(replies
        .iter()
        .any(|r| matches!(r, ServerMessage::BufferedChunksProcessed { count: 3 })));
    assert_eq!(fx.handler.state(), HandlerState::Active);

    // None dropped, none duplicated: three chunks produce three
    // synthesized segments
    let replies = fx
        .handler
        .handle_message(ClientMessage::EndSession {
            session_id: "s1".to_string(),
        })
        .await;

    match &replies[0] {
        ServerMessage::SessionEnded { result } => {
            assert_eq!(result.status, TranscriptionStatus::Completed);
            assert_eq!(result.segments.len(), 3);
        }
        other => panic!("expected session_ended, got {:?}", other),
    }
}

#[tokio::test]
async fn live_chunks_are_acknowledged_individually() {
    let mut fx = fixture();

    fx.handler.handle_message(start_message("s1", false)).await;

    let replies = fx.handler.handle_message(chunk_message("s1", 1)).await;
    assert!(matches!(
        replies[0],
        ServerMessage::ChunkProcessed { sequence_num: 1 }
    ));
}

#[tokio::test]
async fn end_session_persists_and_publishes() {
    let mut fx = fixture();

    fx.handler.handle_message(start_message("s1", true)).await;
    for seq in 1..=3 {
        fx.handler.handle_message(chunk_message("s1", seq)).await;
    }

    let replies = fx
        .handler
        .handle_message(ClientMessage::EndSession {
            session_id: "s1".to_string(),
        })
        .await;

    let result = match &replies[0] {
        ServerMessage::SessionEnded { result } => result.clone(),
        other => panic!("expected session_ended, got {:?}", other),
    };

    // Diarization was on: distinct non-unknown speakers present
    assert!(result
        .segments
        .iter()
        .any(|s| s.speaker != UNKNOWN_SPEAKER));

    // Persisted via the repository collaborator
    let transcriptions = fx.repository.find_by_meeting_id("meeting-1").await.unwrap();
    assert_eq!(transcriptions.len(), 1);
    assert_eq!(transcriptions[0].status, TranscriptionStatus::Completed);

    let segments = fx
        .repository
        .find_segments(&result.transcription_id)
        .await
        .unwrap();
    assert_eq!(segments.len(), result.segments.len());

    // Lifecycle events on the bus, in order
    let published = fx.events.published().await;
    let topics: Vec<&str> = published.iter().map(|(t, _)| t.as_str()).collect();
    assert!(topics.contains(&TOPIC_SESSION_STARTED));
    assert!(topics.contains(&TOPIC_SESSION_COMPLETED));

    let completed = published
        .iter()
        .find(|(t, _)| t == TOPIC_SESSION_COMPLETED)
        .unwrap();
    assert_eq!(completed.1.segment_count, Some(3));

    assert_eq!(fx.handler.state(), HandlerState::Closed);
}

#[tokio::test]
async fn end_without_active_session_is_a_reported_error() {
    let mut fx = fixture();

    let replies = fx
        .handler
        .handle_message(ClientMessage::EndSession {
            session_id: "s1".to_string(),
        })
        .await;

    assert!(matches!(replies[0], ServerMessage::Error { .. }));
    // Not fatal: the connection can still start a session
    let replies = fx.handler.handle_message(start_message("s1", false)).await;
    assert!(matches!(replies[0], ServerMessage::SessionStarted { .. }));
}

#[tokio::test]
async fn disconnect_while_active_runs_the_finalize_path() {
    let mut fx = fixture();

    fx.handler.handle_message(start_message("s1", false)).await;
    for seq in 1..=2 {
        fx.handler.handle_message(chunk_message("s1", seq)).await;
    }

    // Transport-level close; no explicit end_session
    fx.handler.on_disconnect().await;

    // Audio was not silently dropped: the transcription is persisted
    let transcriptions = fx.repository.find_by_meeting_id("meeting-1").await.unwrap();
    assert_eq!(transcriptions.len(), 1);

    let segments = fx
        .repository
        .find_segments(&transcriptions[0].id)
        .await
        .unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(fx.handler.state(), HandlerState::Closed);
}

#[tokio::test]
async fn second_start_on_the_same_connection_is_rejected() {
    let mut fx = fixture();

    fx.handler.handle_message(start_message("s1", false)).await;
    let replies = fx.handler.handle_message(start_message("s2", false)).await;

    assert!(matches!(replies[0], ServerMessage::Error { .. }));
    assert_eq!(fx.handler.state(), HandlerState::Active);
}

#[tokio::test]
async fn chunks_after_close_are_rejected() {
    let mut fx = fixture();

    fx.handler.handle_message(start_message("s1", false)).await;
    fx.handler.handle_message(chunk_message("s1", 1)).await;
    fx.handler
        .handle_message(ClientMessage::EndSession {
            session_id: "s1".to_string(),
        })
        .await;

    let replies = fx.handler.handle_message(chunk_message("s1", 2)).await;
    assert!(matches!(replies[0], ServerMessage::Error { .. }));
}

#[tokio::test]
async fn status_query_reports_provider_state() {
    let mut fx = fixture();

    fx.handler.handle_message(start_message("s1", false)).await;
    fx.handler.handle_message(chunk_message("s1", 1)).await;

    let replies = fx
        .handler
        .handle_message(ClientMessage::GetSessionStatus {
            session_id: "s1".to_string(),
        })
        .await;

    match &replies[0] {
        ServerMessage::SessionStatus { status, active, .. } => {
            assert_eq!(*status, TranscriptionStatus::Processing);
            assert!(active);
        }
        other => panic!("expected session_status, got {:?}", other),
    }
}
