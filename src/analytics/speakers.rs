//! Per-speaker analytics

use super::types::{SpeakerAnalytics, TalkingPoint};
use super::{total_duration, word_count};
use crate::model::TranscriptSegment;
use std::collections::BTreeMap;

/// Segments longer than this qualify as talking-point candidates.
const TALKING_POINT_MIN_SECS: f64 = 3.0;
const TALKING_POINTS_PER_SPEAKER: usize = 5;

pub fn analyze_speakers(segments: &[TranscriptSegment]) -> Vec<SpeakerAnalytics> {
    let duration = total_duration(segments);

    // BTreeMap keeps the output ordering deterministic regardless of
    // input order.
    let mut by_speaker: BTreeMap<&str, Vec<&TranscriptSegment>> = BTreeMap::new();
    for segment in segments {
        by_speaker.entry(&segment.speaker).or_default().push(segment);
    }

    by_speaker
        .into_iter()
        .map(|(speaker, group)| {
            let speaking_time: f64 = group
                .iter()
                .map(|s| s.end_time - s.start_time)
                .sum();
            let words: usize = group.iter().map(|s| word_count(&s.text)).sum();

            let speaking_time_percent = if duration > 0.0 {
                speaking_time / duration * 100.0
            } else {
                0.0
            };
            let words_per_minute = if speaking_time > 0.0 {
                words as f64 / (speaking_time / 60.0)
            } else {
                0.0
            };

            let durations: Vec<f64> = group.iter().map(|s| s.end_time - s.start_time).collect();
            let min_segment_duration = durations.iter().copied().fold(f64::INFINITY, f64::min);
            let max_segment_duration = durations.iter().copied().fold(0.0, f64::max);

            // Top-5 highest-confidence long segments
            let mut candidates: Vec<&&TranscriptSegment> = group
                .iter()
                .filter(|s| s.end_time - s.start_time >= TALKING_POINT_MIN_SECS)
                .collect();
            candidates.sort_by(|a, b| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let talking_points = candidates
                .into_iter()
                .take(TALKING_POINTS_PER_SPEAKER)
                .map(|s| TalkingPoint {
                    text: s.text.clone(),
                    start_time: s.start_time,
                    confidence: s.confidence,
                })
                .collect();

            SpeakerAnalytics {
                speaker: speaker.to_string(),
                speaking_time_secs: speaking_time,
                speaking_time_percent,
                word_count: words,
                words_per_minute,
                min_segment_duration: if min_segment_duration.is_finite() {
                    min_segment_duration
                } else {
                    0.0
                },
                max_segment_duration,
                talking_points,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(speaker: &str, text: &str, start: f64, end: f64, confidence: f64) -> TranscriptSegment {
        TranscriptSegment {
            transcription_id: "t1".to_string(),
            speaker: speaker.to_string(),
            text: text.to_string(),
            start_time: start,
            end_time: end,
            confidence,
            sequence: 1,
        }
    }

    #[test]
    fn speaking_percentages_sum_to_one_hundred() {
        // Back-to-back segments covering the whole meeting
        let segments = vec![
            segment("a", "one two three", 0.0, 6.0, 0.9),
            segment("b", "four five", 6.0, 10.0, 0.9),
        ];

        let speakers = analyze_speakers(&segments);
        let total_percent: f64 = speakers.iter().map(|s| s.speaking_time_percent).sum();
        assert!((total_percent - 100.0).abs() < 1e-6);
    }

    #[test]
    fn word_counts_are_whitespace_tokenized() {
        let segments = vec![segment("a", "  one   two\tthree ", 0.0, 3.0, 0.9)];
        let speakers = analyze_speakers(&segments);
        assert_eq!(speakers[0].word_count, 3);
    }

    #[test]
    fn talking_points_are_long_high_confidence_segments() {
        let mut segments = vec![segment("a", "short", 0.0, 1.0, 0.99)];
        for i in 0..7 {
            let start = 10.0 + i as f64 * 5.0;
            segments.push(segment(
                "a",
                &format!("long segment {}", i),
                start,
                start + 4.0,
                0.5 + 0.05 * i as f64,
            ));
        }

        let speakers = analyze_speakers(&segments);
        let points = &speakers[0].talking_points;

        // Capped at five, best-confidence first, short segment excluded
        assert_eq!(points.len(), 5);
        assert!(points[0].confidence >= points[4].confidence);
        assert!(points.iter().all(|p| p.text != "short"));
    }

    #[test]
    fn min_max_segment_durations() {
        let segments = vec![
            segment("a", "one", 0.0, 2.0, 0.9),
            segment("a", "two", 2.0, 7.0, 0.9),
        ];

        let speakers = analyze_speakers(&segments);
        assert!((speakers[0].min_segment_duration - 2.0).abs() < 1e-9);
        assert!((speakers[0].max_segment_duration - 5.0).abs() < 1e-9);
    }
}
