//! Streaming protocol messages
//!
//! Message kinds are closed, serde-tagged enums: adding a message type
//! is a compile-time-checked change, and every inbound kind must be
//! matched exhaustively by the handler.

use crate::error::TranscriptionError;
use crate::model::{AudioChunk, ProcessingOptions, ProcessingResult, TranscriptionStatus};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session description supplied by the client on `start_session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionMetadata {
    pub meeting_id: String,
    pub user_id: String,
    #[serde(default)]
    pub sample_rate: Option<u32>,
    #[serde(default)]
    pub channels: Option<u16>,
    #[serde(default)]
    pub bit_depth: Option<u16>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// Audio chunk as carried on the wire; payload is base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireChunk {
    pub data: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub sequence_num: u64,
    #[serde(default)]
    pub size: Option<usize>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl WireChunk {
    /// Decode the base64 payload into a domain chunk.
    pub fn decode(&self) -> Result<AudioChunk, TranscriptionError> {
        let data = base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| TranscriptionError::InvalidChunk(e.to_string()))?;

        let size = self.size.unwrap_or(data.len());

        Ok(AudioChunk {
            size,
            data,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            sequence: self.sequence_num,
            duration: self.duration,
        })
    }
}

/// Inbound protocol messages.
///
/// Processing options ride only on `start_session`: providers capture
/// them when the session record is created, so the wire surface
/// deliberately carries no mid-session overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    StartSession {
        #[serde(default)]
        session_id: Option<String>,
        metadata: StartSessionMetadata,
        #[serde(default)]
        options: Option<ProcessingOptions>,
    },
    AudioChunk {
        session_id: String,
        chunk: WireChunk,
    },
    EndSession {
        session_id: String,
    },
    GetSessionStatus {
        session_id: String,
    },
}

/// Outbound protocol messages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionEstablished {
        connection_id: String,
    },
    SessionStarted {
        session_id: String,
    },
    ChunkBuffered {
        sequence_num: u64,
        buffered_count: usize,
    },
    ChunkProcessed {
        sequence_num: u64,
    },
    BufferedChunksProcessed {
        count: usize,
    },
    SessionEnded {
        result: ProcessingResult,
    },
    SessionStatus {
        session_id: String,
        status: TranscriptionStatus,
        active: bool,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_by_type_tag() {
        let json = r#"{
            "type": "start_session",
            "metadata": { "meeting_id": "m1", "user_id": "u1" }
        }"#;

        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::StartSession { .. }));
    }

    #[test]
    fn unknown_message_types_are_rejected() {
        let json = r#"{ "type": "bogus" }"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn wire_chunk_decodes_base64_payload() {
        let chunk = WireChunk {
            data: base64::engine::general_purpose::STANDARD.encode(b"audio-bytes"),
            timestamp: None,
            sequence_num: 7,
            size: None,
            duration: Some(0.1),
        };

        let decoded = chunk.decode().unwrap();
        assert_eq!(decoded.data, b"audio-bytes");
        assert_eq!(decoded.sequence, 7);
        assert_eq!(decoded.size, 11);
    }

    #[test]
    fn invalid_base64_is_a_client_input_error() {
        let chunk = WireChunk {
            data: "not-base64!!!".to_string(),
            timestamp: None,
            sequence_num: 1,
            size: None,
            duration: None,
        };

        // Bad client input must not surface as a provider failure
        let err = chunk.decode().unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidChunk(_)));
    }
}
