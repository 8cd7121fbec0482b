//! Post-hoc transcript analytics
//!
//! `analyze` is a pure function over a segment list; every sub-report
//! is independently computable from the same input, deterministic, and
//! order-independent except where the output is explicitly
//! time-ordered (timelines, peak periods).

mod insights;
mod keywords;
mod lexicon;
mod metrics;
mod sentiment;
mod speakers;
mod topics;
mod types;

pub use types::*;

use crate::error::{Result, TranscriptionError};
use crate::model::TranscriptSegment;
use chrono::Utc;

/// Compute the full analytics aggregate for a transcription.
///
/// The only error path is an empty segment list.
pub fn analyze(transcription_id: &str, segments: &[TranscriptSegment]) -> Result<AnalyticsData> {
    if segments.is_empty() {
        return Err(TranscriptionError::NoSegments(transcription_id.to_string()));
    }

    let speakers = speakers::analyze_speakers(segments);
    let topics = topics::analyze_topics(segments);
    let sentiment = sentiment::analyze_sentiment(segments);
    let metrics = metrics::meeting_metrics(segments);
    let keywords = keywords::keyword_frequency(segments);
    let timeline = metrics::time_distribution(segments);
    let quality = metrics::quality_metrics(segments);
    let insights = insights::derive_insights(&speakers, &topics, &sentiment, &metrics, &quality);

    Ok(AnalyticsData {
        transcription_id: transcription_id.to_string(),
        generated_at: Utc::now(),
        speakers,
        topics,
        sentiment,
        metrics,
        keywords,
        timeline,
        quality,
        insights,
    })
}

/// Whitespace token count.
pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Meeting duration: the maximum end time across all segments.
pub(crate) fn total_duration(segments: &[TranscriptSegment]) -> f64 {
    segments.iter().map(|s| s.end_time).fold(0.0, f64::max)
}

/// Mean confidence; 0.0 for an empty list.
pub(crate) fn average_confidence(segments: &[TranscriptSegment]) -> f64 {
    if segments.is_empty() {
        return 0.0;
    }
    segments.iter().map(|s| s.confidence).sum::<f64>() / segments.len() as f64
}

/// Lowercased tokens with surrounding punctuation stripped.
pub(crate) fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(|raw| {
        let token: String = raw
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_lowercase();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TranscriptSegment;

    fn segment(
        speaker: &str,
        text: &str,
        start: f64,
        end: f64,
        confidence: f64,
        sequence: u32,
    ) -> TranscriptSegment {
        TranscriptSegment {
            transcription_id: "t1".to_string(),
            speaker: speaker.to_string(),
            text: text.to_string(),
            start_time: start,
            end_time: end,
            confidence,
            sequence,
        }
    }

    #[test]
    fn empty_segment_list_is_the_only_error() {
        let err = analyze("t1", &[]).unwrap_err();
        assert!(matches!(err, TranscriptionError::NoSegments(_)));
    }

    #[test]
    fn average_confidence_matches_contract() {
        assert_eq!(average_confidence(&[]), 0.0);

        let segments = vec![
            segment("a", "one", 0.0, 1.0, 0.90, 1),
            segment("a", "two", 1.0, 2.0, 0.80, 2),
            segment("a", "three", 2.0, 3.0, 0.70, 3),
        ];
        assert!((average_confidence(&segments) - 0.80).abs() < 1e-4);
    }

    #[test]
    fn tokenize_strips_punctuation_and_lowercases() {
        let tokens: Vec<String> = tokenize("Hello, World! (it's fine)").collect();
        assert_eq!(tokens, vec!["hello", "world", "it's", "fine"]);
    }

    #[test]
    fn analyze_produces_every_report() {
        let segments = vec![
            segment("speaker_0", "good progress on the roadmap plan", 0.0, 5.0, 0.95, 1),
            segment("speaker_1", "I agree, the budget looks great", 5.0, 9.0, 0.90, 2),
            segment("speaker_0", "let's assign action items next", 9.0, 14.0, 0.85, 3),
        ];

        let data = analyze("t1", &segments).unwrap();

        assert_eq!(data.transcription_id, "t1");
        assert_eq!(data.speakers.len(), 2);
        assert!(!data.topics.is_empty());
        assert_eq!(data.metrics.speaker_count, 2);
        assert!(!data.timeline.buckets.is_empty());
    }
}
