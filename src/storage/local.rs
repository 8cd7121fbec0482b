use super::UploadSink;
use crate::error::{Result, TranscriptionError};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

/// Filesystem-backed upload sink.
///
/// Writes session audio under `<root>/<meeting_id>/<session_id>.raw`
/// and returns a `file://` URL. Suitable for local deployments and
/// tests; an object-store sink would implement the same trait.
pub struct LocalUploadSink {
    root: PathBuf,
}

impl LocalUploadSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl UploadSink for LocalUploadSink {
    async fn upload(&self, bytes: &[u8], meeting_id: &str, session_id: &str) -> Result<String> {
        let dir = self.root.join(meeting_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| TranscriptionError::Upload(format!("create {}: {}", dir.display(), e)))?;

        let path = dir.join(format!("{}.raw", session_id));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| TranscriptionError::Upload(format!("write {}: {}", path.display(), e)))?;

        info!(
            "Stored session audio: {} ({} bytes)",
            path.display(),
            bytes.len()
        );

        Ok(format!("file://{}", path.display()))
    }
}
