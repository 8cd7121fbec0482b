//! Meeting-level metrics, time distribution, and quality reports

use super::types::{
    ActivityLevel, AudioQuality, MeetingMetrics, PaceLabel, QualityLabel, QualityMetrics,
    TimeBucket, TimeDistribution,
};
use super::{average_confidence, total_duration, word_count};
use crate::model::TranscriptSegment;
use std::collections::BTreeSet;

const SLOW_WPM: f64 = 100.0;
const FAST_WPM: f64 = 160.0;

/// Interruption heuristic thresholds. A coarse approximation kept for
/// behavioral parity: a segment starting before the previous one ends,
/// or a sub-second segment with fewer than three words.
const SHORT_SEGMENT_SECS: f64 = 1.0;
const SHORT_SEGMENT_WORDS: usize = 3;

const BUCKET_SECS: f64 = 30.0;
const HIGH_ACTIVITY_RATIO: f64 = 0.7;
const MEDIUM_ACTIVITY_RATIO: f64 = 0.3;

const LOW_CONFIDENCE: f64 = 0.6;

pub fn meeting_metrics(segments: &[TranscriptSegment]) -> MeetingMetrics {
    let duration = total_duration(segments);
    let speaking_time: f64 = segments.iter().map(|s| s.end_time - s.start_time).sum();
    let silence_time = (duration - speaking_time).max(0.0);

    let speakers: BTreeSet<&str> = segments.iter().map(|s| s.speaker.as_str()).collect();
    let words: usize = segments.iter().map(|s| word_count(&s.text)).sum();

    let words_per_minute = if speaking_time > 0.0 {
        words as f64 / (speaking_time / 60.0)
    } else {
        0.0
    };

    let pace = if words_per_minute < SLOW_WPM {
        PaceLabel::Slow
    } else if words_per_minute > FAST_WPM {
        PaceLabel::Fast
    } else {
        PaceLabel::Normal
    };

    // Time-ordered passes for interruptions and turnover
    let mut ordered: Vec<&TranscriptSegment> = segments.iter().collect();
    ordered.sort_by(|a, b| {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut interruption_count = 0;
    let mut speaker_changes = 0;
    for window in ordered.windows(2) {
        let (prev, next) = (window[0], window[1]);

        let overlaps = next.start_time < prev.end_time;
        let short_and_sparse = next.end_time - next.start_time < SHORT_SEGMENT_SECS
            && word_count(&next.text) < SHORT_SEGMENT_WORDS;
        if overlaps || short_and_sparse {
            interruption_count += 1;
        }

        if prev.speaker != next.speaker {
            speaker_changes += 1;
        }
    }

    let speaker_turnover_rate = if duration > 0.0 {
        speaker_changes as f64 / (duration / 60.0)
    } else {
        0.0
    };

    MeetingMetrics {
        total_duration_secs: duration,
        speaking_time_secs: speaking_time,
        silence_time_secs: silence_time,
        speaker_count: speakers.len(),
        average_confidence: average_confidence(segments),
        words_per_minute,
        pace,
        interruption_count,
        speaker_turnover_rate,
    }
}

/// Fixed 30-second buckets with per-bucket word counts and speaker
/// presence; activity classified relative to the busiest bucket.
pub fn time_distribution(segments: &[TranscriptSegment]) -> TimeDistribution {
    let duration = total_duration(segments);
    if duration <= 0.0 {
        return TimeDistribution {
            bucket_secs: BUCKET_SECS,
            buckets: Vec::new(),
            peak_periods: Vec::new(),
            quiet_periods: Vec::new(),
        };
    }

    let bucket_count = (duration / BUCKET_SECS).ceil() as usize;
    let mut word_counts = vec![0usize; bucket_count];
    let mut speaker_sets: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); bucket_count];

    for segment in segments {
        let index = ((segment.start_time / BUCKET_SECS) as usize).min(bucket_count - 1);
        word_counts[index] += word_count(&segment.text);
        speaker_sets[index].insert(&segment.speaker);
    }

    let peak_words = word_counts.iter().copied().max().unwrap_or(0) as f64;

    let buckets: Vec<TimeBucket> = (0..bucket_count)
        .map(|index| {
            let words = word_counts[index];
            let activity = if peak_words == 0.0 {
                ActivityLevel::Low
            } else if words as f64 > HIGH_ACTIVITY_RATIO * peak_words {
                ActivityLevel::High
            } else if words as f64 > MEDIUM_ACTIVITY_RATIO * peak_words {
                ActivityLevel::Medium
            } else {
                ActivityLevel::Low
            };

            TimeBucket {
                index,
                start_secs: index as f64 * BUCKET_SECS,
                end_secs: ((index + 1) as f64 * BUCKET_SECS).min(duration),
                word_count: words,
                speakers: speaker_sets[index].iter().map(|s| s.to_string()).collect(),
                activity,
            }
        })
        .collect();

    let peak_periods = buckets
        .iter()
        .filter(|b| b.activity == ActivityLevel::High)
        .map(|b| b.index)
        .collect();
    let quiet_periods = buckets
        .iter()
        .filter(|b| b.activity == ActivityLevel::Low)
        .map(|b| b.index)
        .collect();

    TimeDistribution {
        bucket_secs: BUCKET_SECS,
        buckets,
        peak_periods,
        quiet_periods,
    }
}

pub fn quality_metrics(segments: &[TranscriptSegment]) -> QualityMetrics {
    let avg = average_confidence(segments);

    let transcript_quality = if segments.is_empty() {
        QualityLabel::Poor
    } else if avg >= 0.9 {
        QualityLabel::Excellent
    } else if avg >= 0.75 {
        QualityLabel::Good
    } else if avg >= 0.6 {
        QualityLabel::Fair
    } else {
        QualityLabel::Poor
    };

    let low_confidence_segments = segments
        .iter()
        .filter(|s| s.confidence < LOW_CONFIDENCE)
        .count();

    let audio_quality = if segments.is_empty() {
        AudioQuality::Unknown
    } else {
        let ratio = low_confidence_segments as f64 / segments.len() as f64;
        if ratio <= 0.1 {
            AudioQuality::Clear
        } else if ratio <= 0.3 {
            AudioQuality::Degraded
        } else {
            AudioQuality::Noisy
        }
    };

    let mut recommendations = Vec::new();
    if matches!(transcript_quality, QualityLabel::Fair | QualityLabel::Poor) {
        recommendations
            .push("Transcript confidence is low; consider a higher-quality recording".to_string());
    }
    if matches!(audio_quality, AudioQuality::Noisy) {
        recommendations.push(
            "Many low-confidence segments; check microphone placement and background noise"
                .to_string(),
        );
    }

    QualityMetrics {
        average_confidence: avg,
        transcript_quality,
        low_confidence_segments,
        audio_quality,
        recommendations,
    }
}
