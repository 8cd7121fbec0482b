//! Remote speech-service provider
//!
//! Finalizing a session runs the full batch pipeline: concatenate the
//! buffered chunks, store the audio through the upload sink, submit a
//! transcription job to the speech API, poll until the job reaches a
//! terminal status, and convert the returned utterances into
//! normalized transcript segments.

use super::session::{SessionRecord, SessionRegistry};
use super::TranscriptionProvider;
use crate::error::{Result, TranscriptionError};
use crate::model::{
    AudioChunk, AudioStreamMetadata, ProcessingOptions, ProcessingResult, TranscriptSegment,
    TranscriptionStatus,
};
use crate::segment::{has_text, normalize_speaker};
use crate::storage::UploadSink;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Job submission payload for the speech API.
#[derive(Debug, Serialize)]
struct SubmitJobRequest {
    audio_url: String,
    language_code: String,
    speaker_labels: bool,
    punctuate: bool,
    filter_profanity: bool,
}

/// Speech API job document, as returned by submit and poll calls.
#[derive(Debug, Deserialize)]
struct JobResponse {
    id: String,
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    utterances: Option<Vec<Utterance>>,
}

/// Provider-native speech segment. Times are in milliseconds.
#[derive(Debug, Deserialize)]
struct Utterance {
    #[serde(default)]
    speaker: String,
    text: String,
    start: u64,
    end: u64,
    confidence: f64,
}

pub struct RemoteProvider {
    registry: SessionRegistry,
    sink: Arc<dyn UploadSink>,
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl RemoteProvider {
    pub fn new(
        sink: Arc<dyn UploadSink>,
        api_base: String,
        api_key: String,
        poll_interval: Duration,
        poll_timeout: Duration,
        eviction_grace: Duration,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(eviction_grace),
            sink,
            http: reqwest::Client::new(),
            api_base,
            api_key,
            poll_interval,
            poll_timeout,
        }
    }

    /// Submit a transcription job for already-uploaded audio.
    async fn submit_job(&self, audio_url: &str, options: &ProcessingOptions) -> Result<String> {
        let request = SubmitJobRequest {
            audio_url: audio_url.to_string(),
            language_code: options.language.clone(),
            speaker_labels: options.diarization,
            punctuate: options.punctuate,
            filter_profanity: options.filter_profanity,
        };

        let response = self
            .http
            .post(format!("{}/transcript", self.api_base))
            .header("authorization", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranscriptionError::Submission(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TranscriptionError::Submission(format!(
                "speech API returned {}",
                response.status()
            )));
        }

        let job: JobResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Submission(e.to_string()))?;

        Ok(job.id)
    }

    /// One poll request for the job document.
    async fn fetch_job(&self, job_id: &str) -> Result<JobResponse> {
        let response = self
            .http
            .get(format!("{}/transcript/{}", self.api_base, job_id))
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| TranscriptionError::Provider(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| TranscriptionError::Provider(e.to_string()))
    }

    /// Poll the job until it completes, fails, times out, or the
    /// session is aborted. The hard ceiling applies regardless of the
    /// abort signal.
    ///
    /// Per-tick transport and decode failures are retryable: a single
    /// bad response must not fail a session whose audio is already
    /// uploaded. Only a remote `error` status, the abort flag, and the
    /// ceiling terminate the loop.
    async fn poll_job(&self, job_id: &str, record: &SessionRecord) -> Result<JobResponse> {
        let started = Instant::now();

        loop {
            if record.is_aborted() {
                return Err(TranscriptionError::Aborted);
            }
            if started.elapsed() >= self.poll_timeout {
                return Err(TranscriptionError::PollTimeout(
                    started.elapsed().as_secs_f64(),
                ));
            }

            let job = match self.fetch_job(job_id).await {
                Ok(job) => job,
                Err(e) => {
                    warn!("Poll for job {} failed ({}); retrying", job_id, e);
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
            };

            match job.status.as_str() {
                "completed" => return Ok(job),
                "error" => {
                    return Err(TranscriptionError::Provider(
                        job.error.unwrap_or_else(|| "unspecified remote failure".to_string()),
                    ))
                }
                _ => tokio::time::sleep(self.poll_interval).await,
            }
        }
    }
}

/// Convert provider-native utterances into normalized segments.
///
/// Blank utterances are skipped, millisecond timings become seconds,
/// speaker labels are normalized, and sequence numbers are contiguous
/// from 1 over the utterances that survive filtering.
fn convert_utterances(
    transcription_id: &str,
    utterances: &[Utterance],
    confidence_threshold: f64,
) -> Vec<TranscriptSegment> {
    utterances
        .iter()
        .filter(|u| has_text(&u.text))
        .filter(|u| u.confidence >= confidence_threshold)
        .enumerate()
        .map(|(i, u)| TranscriptSegment {
            transcription_id: transcription_id.to_string(),
            speaker: normalize_speaker(&u.speaker),
            text: u.text.trim().to_string(),
            start_time: u.start as f64 / 1000.0,
            end_time: u.end.max(u.start) as f64 / 1000.0,
            confidence: u.confidence.clamp(0.0, 1.0),
            sequence: (i + 1) as u32,
        })
        .collect()
}

#[async_trait]
impl TranscriptionProvider for RemoteProvider {
    fn name(&self) -> &'static str {
        super::REMOTE_PROVIDER
    }

    async fn start_session(
        &self,
        metadata: AudioStreamMetadata,
        options: ProcessingOptions,
    ) -> Result<String> {
        let session_id = metadata.session_id.clone();
        self.registry.insert(metadata, options);

        info!("Remote provider session started: {}", session_id);

        Ok(session_id)
    }

    async fn process_chunk(&self, session_id: &str, chunk: AudioChunk) -> Result<()> {
        let record = self.registry.get(session_id)?;
        record.push_chunk(chunk).await;
        record.set_status(TranscriptionStatus::Processing);
        Ok(())
    }

    async fn end_session(&self, session_id: &str) -> Result<ProcessingResult> {
        let record = self.registry.get(session_id)?;
        let chunks = record.take_chunks().await;
        let options = record.options();

        // Chunks arrive pre-sorted from take_chunks; concatenate
        // byte-for-byte in sequence order.
        let total_bytes: usize = chunks.iter().map(|c| c.data.len()).sum();
        let mut audio = Vec::with_capacity(total_bytes);
        for chunk in &chunks {
            audio.extend_from_slice(&chunk.data);
        }

        info!(
            "Finalizing session {}: {} chunk(s), {} byte(s)",
            session_id,
            chunks.len(),
            audio.len()
        );

        let audio_url = match self
            .sink
            .upload(&audio, &record.metadata.meeting_id, session_id)
            .await
        {
            Ok(url) => url,
            Err(e) => {
                self.registry.finish(&record, TranscriptionStatus::Failed);
                return Err(e);
            }
        };

        let job_id = match self.submit_job(&audio_url, &options).await {
            Ok(id) => id,
            Err(e) => {
                self.registry.finish(&record, TranscriptionStatus::Failed);
                return Err(e);
            }
        };

        info!("Submitted transcription job {} for session {}", job_id, session_id);

        let job = match self.poll_job(&job_id, &record).await {
            Ok(job) => job,
            Err(e) => {
                warn!("Session {} failed during polling: {}", session_id, e);
                self.registry.finish(&record, TranscriptionStatus::Failed);
                return Err(e);
            }
        };

        let utterances = job.utterances.unwrap_or_default();
        let segments = convert_utterances(&job.id, &utterances, options.confidence_threshold);

        self.registry.finish(&record, TranscriptionStatus::Completed);

        info!(
            "Session {} completed: {} utterance(s) -> {} segment(s)",
            session_id,
            utterances.len(),
            segments.len()
        );

        Ok(ProcessingResult {
            transcription_id: job.id,
            status: TranscriptionStatus::Completed,
            segments,
            mode: options.mode,
            message: format!("Transcribed {} chunk(s)", chunks.len()),
            audio_url: Some(audio_url),
        })
    }

    async fn get_session_status(&self, session_id: &str) -> Result<TranscriptionStatus> {
        Ok(self.registry.get(session_id)?.status())
    }

    async fn abort_session(&self, session_id: &str) -> Result<()> {
        let record = self.registry.get(session_id)?;
        record.abort();
        record.set_status(TranscriptionStatus::Failed);
        self.registry.remove(session_id);
        Ok(())
    }

    async fn is_session_active(&self, session_id: &str) -> bool {
        self.registry.is_active(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::UNKNOWN_SPEAKER;

    fn utterance(speaker: &str, text: &str, start: u64, end: u64, confidence: f64) -> Utterance {
        Utterance {
            speaker: speaker.to_string(),
            text: text.to_string(),
            start,
            end,
            confidence,
        }
    }

    #[test]
    fn conversion_skips_blank_utterances_and_renumbers() {
        let utterances = vec![
            utterance("A", "hello there", 0, 1500, 0.9),
            utterance("B", "   ", 1500, 2000, 0.9),
            utterance("A", "how are you", 2000, 3200, 0.8),
        ];

        let segments = convert_utterances("t1", &utterances, 0.0);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].sequence, 1);
        assert_eq!(segments[1].sequence, 2);
        assert_eq!(segments[1].text, "how are you");
    }

    #[test]
    fn conversion_turns_milliseconds_into_seconds() {
        let utterances = vec![utterance("A", "hi", 1500, 3250, 0.9)];

        let segments = convert_utterances("t1", &utterances, 0.0);

        assert!((segments[0].start_time - 1.5).abs() < 1e-9);
        assert!((segments[0].end_time - 3.25).abs() < 1e-9);
    }

    #[test]
    fn conversion_normalizes_only_unknown_speakers() {
        let utterances = vec![
            utterance("", "first", 0, 1000, 0.9),
            utterance("speaker_unknown", "second", 1000, 2000, 0.9),
            utterance("speaker_0", "third", 2000, 3000, 0.9),
            utterance("Speaker A", "fourth", 3000, 4000, 0.9),
        ];

        let segments = convert_utterances("t1", &utterances, 0.0);

        assert_eq!(segments[0].speaker, UNKNOWN_SPEAKER);
        assert_eq!(segments[1].speaker, UNKNOWN_SPEAKER);
        assert_eq!(segments[2].speaker, "speaker_0");
        assert_eq!(segments[3].speaker, "Speaker A");
    }

    #[test]
    fn conversion_applies_the_confidence_threshold() {
        let utterances = vec![
            utterance("A", "keep", 0, 1000, 0.9),
            utterance("A", "drop", 1000, 2000, 0.4),
        ];

        let segments = convert_utterances("t1", &utterances, 0.5);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "keep");
    }

    #[test]
    fn conversion_clamps_end_before_start() {
        // A provider glitch where end < start must not violate the
        // segment invariant
        let utterances = vec![utterance("A", "odd timing", 2000, 1000, 0.9)];

        let segments = convert_utterances("t1", &utterances, 0.0);

        assert!(segments[0].end_time >= segments[0].start_time);
    }
}
