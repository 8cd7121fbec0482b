//! Session lifecycle event publishing
//!
//! The handler publishes lightweight JSON events at session
//! boundaries. Production uses the NATS bus; tests use the in-memory
//! recorder.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

/// Topic for a session entering `Active`.
pub const TOPIC_SESSION_STARTED: &str = "transcription.session.started";
/// Topic for chunk-level progress.
pub const TOPIC_SESSION_PROCESSING: &str = "transcription.session.processing";
/// Topic for a finalized session.
pub const TOPIC_SESSION_COMPLETED: &str = "transcription.session.completed";

/// Payload published on every lifecycle topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session_id: String,
    pub meeting_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    /// Transcription id, present once finalize has produced one
    pub transcription_id: Option<String>,
    /// Segment count, present on completion
    pub segment_count: Option<usize>,
}

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, topic: &str, event: &SessionEvent) -> Result<()>;
}

/// NATS-backed event bus.
pub struct NatsEventBus {
    client: async_nats::Client,
}

impl NatsEventBus {
    /// Connect to a NATS server.
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }
}

#[async_trait]
impl EventBus for NatsEventBus {
    async fn publish(&self, topic: &str, event: &SessionEvent) -> Result<()> {
        let payload = serde_json::to_vec(event)?;

        self.client
            .publish(topic.to_string(), payload.into())
            .await
            .context("Failed to publish session event")?;

        info!(
            "Published {} for session {} (meeting {})",
            topic, event.session_id, event.meeting_id
        );

        Ok(())
    }
}

/// Records published events in memory; used by tests and as the
/// no-broker fallback.
#[derive(Default)]
pub struct MemoryEventBus {
    published: Mutex<Vec<(String, SessionEvent)>>,
}

impl MemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far, in publish order.
    pub async fn published(&self) -> Vec<(String, SessionEvent)> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, topic: &str, event: &SessionEvent) -> Result<()> {
        let mut published = self.published.lock().await;
        published.push((topic.to_string(), event.clone()));
        Ok(())
    }
}
