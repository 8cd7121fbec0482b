//! Durable storage for finalized session audio
//!
//! Providers hand the concatenated audio of a session to an
//! [`UploadSink`] and get back a retrievable URL, which doubles as the
//! audio location submitted to the speech service.

mod local;

pub use local::LocalUploadSink;

use crate::error::Result;
use async_trait::async_trait;

/// Destination for the concatenated raw audio of a session.
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Store `bytes` for the given meeting/session and return a URL
    /// the audio can be retrieved from.
    async fn upload(&self, bytes: &[u8], meeting_id: &str, session_id: &str) -> Result<String>;
}
