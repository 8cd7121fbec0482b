//! Persistence collaborator for finalized transcriptions
//!
//! The pipeline makes exactly two calls per finalized session: one
//! `save` for the transcription record and one replace-all
//! `save_segments` for its segments. The in-memory implementation is
//! the service default and the test double.

use crate::model::{Transcription, TranscriptSegment};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait TranscriptionRepository: Send + Sync {
    /// Insert or update a transcription record.
    async fn save(&self, transcription: Transcription) -> anyhow::Result<()>;

    /// Replace all segments stored for a transcription.
    async fn save_segments(
        &self,
        transcription_id: &str,
        segments: Vec<TranscriptSegment>,
    ) -> anyhow::Result<()>;

    /// All transcriptions recorded for a meeting.
    async fn find_by_meeting_id(&self, meeting_id: &str) -> anyhow::Result<Vec<Transcription>>;

    /// Segments for a transcription, in sequence order. Empty when unknown.
    async fn find_segments(&self, transcription_id: &str)
        -> anyhow::Result<Vec<TranscriptSegment>>;
}

/// In-memory repository backed by `RwLock`ed maps.
#[derive(Default)]
pub struct InMemoryTranscriptionRepository {
    transcriptions: RwLock<HashMap<String, Transcription>>,
    segments: RwLock<HashMap<String, Vec<TranscriptSegment>>>,
}

impl InMemoryTranscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptionRepository for InMemoryTranscriptionRepository {
    async fn save(&self, transcription: Transcription) -> anyhow::Result<()> {
        let mut map = self.transcriptions.write().await;
        map.insert(transcription.id.clone(), transcription);
        Ok(())
    }

    async fn save_segments(
        &self,
        transcription_id: &str,
        segments: Vec<TranscriptSegment>,
    ) -> anyhow::Result<()> {
        let mut map = self.segments.write().await;
        map.insert(transcription_id.to_string(), segments);
        Ok(())
    }

    async fn find_by_meeting_id(&self, meeting_id: &str) -> anyhow::Result<Vec<Transcription>> {
        let map = self.transcriptions.read().await;
        let mut found: Vec<Transcription> = map
            .values()
            .filter(|t| t.meeting_id == meeting_id)
            .cloned()
            .collect();
        found.sort_by_key(|t| t.created_at);
        Ok(found)
    }

    async fn find_segments(
        &self,
        transcription_id: &str,
    ) -> anyhow::Result<Vec<TranscriptSegment>> {
        let map = self.segments.read().await;
        Ok(map.get(transcription_id).cloned().unwrap_or_default())
    }
}
