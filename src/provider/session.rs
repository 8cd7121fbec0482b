//! Shared session registry
//!
//! Each provider instance owns one registry: a concurrent map from
//! session id to session record, shared by however many connection
//! handlers talk to that provider. Completed and failed records carry
//! an expiry instant instead of a detached cleanup task, so eviction
//! timing is deterministic: expired records are dropped on access, on
//! every insert, and by `purge_expired`.

use crate::error::{Result, TranscriptionError};
use crate::model::{AudioChunk, AudioStreamMetadata, ProcessingOptions, TranscriptionStatus};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Mutable state for one in-flight session.
pub struct SessionRecord {
    pub metadata: AudioStreamMetadata,

    /// Captured at session start; immutable for the session's lifetime
    options: ProcessingOptions,

    /// Buffered chunks, guarded against concurrent append vs drain
    chunks: Mutex<Vec<AudioChunk>>,

    status: StdMutex<TranscriptionStatus>,
    aborted: AtomicBool,

    /// Set when the session reaches a terminal state
    expires_at: StdMutex<Option<Instant>>,
}

impl SessionRecord {
    fn new(metadata: AudioStreamMetadata, options: ProcessingOptions) -> Self {
        Self {
            metadata,
            options,
            chunks: Mutex::new(Vec::new()),
            status: StdMutex::new(TranscriptionStatus::Pending),
            aborted: AtomicBool::new(false),
            expires_at: StdMutex::new(None),
        }
    }

    pub fn status(&self) -> TranscriptionStatus {
        *self.status.lock().unwrap()
    }

    pub fn set_status(&self, status: TranscriptionStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn options(&self) -> ProcessingOptions {
        self.options.clone()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Append a chunk to the session buffer.
    pub async fn push_chunk(&self, chunk: AudioChunk) {
        let mut chunks = self.chunks.lock().await;
        chunks.push(chunk);
    }

    /// Drain all buffered chunks in sequence order.
    pub async fn take_chunks(&self) -> Vec<AudioChunk> {
        let mut chunks = self.chunks.lock().await;
        let mut taken = std::mem::take(&mut *chunks);
        taken.sort_by_key(|c| c.sequence);
        taken
    }

    pub async fn chunk_count(&self) -> usize {
        self.chunks.lock().await.len()
    }

    fn expire_after(&self, grace: Duration) {
        *self.expires_at.lock().unwrap() = Some(Instant::now() + grace);
    }

    fn is_expired(&self, now: Instant) -> bool {
        matches!(*self.expires_at.lock().unwrap(), Some(at) if now >= at)
    }
}

/// Concurrent session-id → record map with TTL eviction.
pub struct SessionRegistry {
    sessions: DashMap<String, Arc<SessionRecord>>,
    grace: Duration,
}

impl SessionRegistry {
    /// `grace` is how long terminal records stay resolvable before
    /// eviction.
    pub fn new(grace: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            grace,
        }
    }

    /// Insert a session record; returns the existing record when the
    /// session id is already known (idempotent start).
    ///
    /// Every insert also purges elapsed records, so the registry stays
    /// bounded even when finished sessions are never queried again.
    pub fn insert(
        &self,
        metadata: AudioStreamMetadata,
        options: ProcessingOptions,
    ) -> Arc<SessionRecord> {
        self.purge_expired(Instant::now());

        let session_id = metadata.session_id.clone();
        self.sessions
            .entry(session_id)
            .or_insert_with(|| Arc::new(SessionRecord::new(metadata, options)))
            .value()
            .clone()
    }

    /// Look up a live session record.
    ///
    /// Expired records are evicted on the way and reported as not
    /// found.
    pub fn get(&self, session_id: &str) -> Result<Arc<SessionRecord>> {
        if let Some(record) = self.sessions.get(session_id) {
            if record.is_expired(Instant::now()) {
                drop(record);
                self.sessions.remove(session_id);
                return Err(TranscriptionError::SessionNotFound(session_id.to_string()));
            }
            return Ok(record.value().clone());
        }
        Err(TranscriptionError::SessionNotFound(session_id.to_string()))
    }

    /// Mark a session terminal and start its eviction grace period.
    pub fn finish(&self, record: &SessionRecord, status: TranscriptionStatus) {
        record.set_status(status);
        record.expire_after(self.grace);
    }

    /// Remove a session immediately.
    pub fn remove(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Drop every record whose grace period has elapsed as of `now`.
    pub fn purge_expired(&self, now: Instant) {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| !record.is_expired(now));
        let purged = before - self.sessions.len();
        if purged > 0 {
            info!("Evicted {} expired session record(s)", purged);
        }
    }

    /// Whether a session exists and hasn't reached a terminal state.
    pub fn is_active(&self, session_id: &str) -> bool {
        match self.get(session_id) {
            Ok(record) => matches!(
                record.status(),
                TranscriptionStatus::Pending | TranscriptionStatus::Processing
            ),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
