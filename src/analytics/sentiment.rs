//! Keyword-based sentiment analysis
//!
//! Per-segment score = (positive hits − negative hits) / word count,
//! categorized at ±0.1; |score| > 0.3 counts as an emotional
//! highlight. Intentionally a heuristic; the thresholds are the
//! contract.

use super::lexicon::{contains_word, NEGATIVE_WORDS, POSITIVE_WORDS};
use super::types::{EmotionalHighlight, SentimentLabel, SentimentReport, SpeakerSentiment};
use super::{tokenize, word_count};
use crate::model::TranscriptSegment;
use std::collections::BTreeMap;

const POSITIVE_THRESHOLD: f64 = 0.1;
const NEGATIVE_THRESHOLD: f64 = -0.1;
const HIGHLIGHT_THRESHOLD: f64 = 0.3;

/// Score one segment's text.
pub fn segment_score(text: &str) -> f64 {
    let words = word_count(text);
    if words == 0 {
        return 0.0;
    }

    let mut positive = 0i64;
    let mut negative = 0i64;
    for token in tokenize(text) {
        if contains_word(POSITIVE_WORDS, &token) {
            positive += 1;
        } else if contains_word(NEGATIVE_WORDS, &token) {
            negative += 1;
        }
    }

    (positive - negative) as f64 / words as f64
}

pub fn classify(score: f64) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

pub fn analyze_sentiment(segments: &[TranscriptSegment]) -> SentimentReport {
    let mut positive_segments = 0;
    let mut negative_segments = 0;
    let mut neutral_segments = 0;
    let mut score_sum = 0.0;
    let mut highlights = Vec::new();
    let mut speaker_scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for segment in segments {
        let score = segment_score(&segment.text);
        score_sum += score;
        speaker_scores.entry(&segment.speaker).or_default().push(score);

        match classify(score) {
            SentimentLabel::Positive => positive_segments += 1,
            SentimentLabel::Negative => negative_segments += 1,
            SentimentLabel::Neutral => neutral_segments += 1,
        }

        if score.abs() > HIGHLIGHT_THRESHOLD {
            highlights.push(EmotionalHighlight {
                speaker: segment.speaker.clone(),
                text: segment.text.clone(),
                start_time: segment.start_time,
                score,
                label: classify(score),
            });
        }
    }

    let overall_score = if segments.is_empty() {
        0.0
    } else {
        score_sum / segments.len() as f64
    };

    let speaker_averages = speaker_scores
        .into_iter()
        .map(|(speaker, scores)| SpeakerSentiment {
            speaker: speaker.to_string(),
            average_score: scores.iter().sum::<f64>() / scores.len() as f64,
        })
        .collect();

    // Highlights stay in time order
    highlights.sort_by(|a, b| {
        a.start_time
            .partial_cmp(&b.start_time)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    SentimentReport {
        overall_score,
        overall_label: classify(overall_score),
        positive_segments,
        negative_segments,
        neutral_segments,
        speaker_averages,
        emotional_highlights: highlights,
    }
}
