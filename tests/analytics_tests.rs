// Integration tests for the analytics engine
//
// analyze() is a pure function over a segment list; these tests check
// the cross-report contracts over a realistic transcript.

use meeting_scribe::analytics::{self, QualityLabel, SentimentLabel};
use meeting_scribe::{TranscriptSegment, TranscriptionError};

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

fn sample_meeting() -> Vec<TranscriptSegment> {
    vec![
        segment(
            "speaker_0",
            "Good morning everyone, let's review the roadmap and the plan for the quarter",
            0.0,
            8.0,
            0.95,
            1,
        ),
        segment(
            "speaker_1",
            "Great progress on the budget side, the cost numbers look good",
            8.0,
            14.0,
            0.92,
            2,
        ),
        segment(
            "speaker_0",
            "I'm worried about the deadline risk on the deploy pipeline",
            14.0,
            21.0,
            0.88,
            3,
        ),
        segment(
            "speaker_2",
            "Agree, we should assign an owner and follow up on that action",
            21.0,
            27.0,
            0.91,
            4,
        ),
        segment("speaker_1", "yes", 27.0, 27.5, 0.85, 5),
        segment(
            "speaker_0",
            "Perfect, thanks everyone, excellent session today",
            27.5,
            33.0,
            0.94,
            6,
        ),
    ]
}

#[test]
fn speaker_percentages_sum_to_one_hundred() {
    let data = analytics::analyze("t1", &sample_meeting()).unwrap();

    let total_percent: f64 = data
        .speakers
        .iter()
        .map(|s| s.speaking_time_percent)
        .sum();
    assert!(
        (total_percent - 100.0).abs() < 1e-6,
        "percentages summed to {}",
        total_percent
    );
}

#[test]
fn quality_classification_matches_the_contract() {
    // Average 0.95 -> excellent
    let excellent = vec![
        segment("a", "one two", 0.0, 2.0, 0.95, 1),
        segment("a", "three four", 2.0, 4.0, 0.95, 2),
    ];
    let data = analytics::analyze("t1", &excellent).unwrap();
    assert_eq!(data.quality.transcript_quality, QualityLabel::Excellent);

    // Average 0.65 -> fair
    let fair = vec![
        segment("a", "one two", 0.0, 2.0, 0.65, 1),
        segment("a", "three four", 2.0, 4.0, 0.65, 2),
    ];
    let data = analytics::analyze("t1", &fair).unwrap();
    assert_eq!(data.quality.transcript_quality, QualityLabel::Fair);
}

#[test]
fn no_segments_is_an_explicit_not_found() {
    let err = analytics::analyze("missing", &[]).unwrap_err();
    match err {
        TranscriptionError::NoSegments(id) => assert_eq!(id, "missing"),
        other => panic!("expected NoSegments, got {:?}", other),
    }
}

#[test]
fn reports_are_order_independent() {
    let ordered = sample_meeting();
    let mut shuffled = sample_meeting();
    shuffled.reverse();

    let a = analytics::analyze("t1", &ordered).unwrap();
    let b = analytics::analyze("t1", &shuffled).unwrap();

    // Speaker aggregates don't depend on input order
    assert_eq!(a.speakers.len(), b.speakers.len());
    for (x, y) in a.speakers.iter().zip(&b.speakers) {
        assert_eq!(x.speaker, y.speaker);
        assert!((x.speaking_time_secs - y.speaking_time_secs).abs() < 1e-9);
        assert_eq!(x.word_count, y.word_count);
    }

    // Time-ordered reports agree because they sort internally
    assert_eq!(a.metrics.interruption_count, b.metrics.interruption_count);
    assert_eq!(a.timeline.peak_periods, b.timeline.peak_periods);

    // Topic and keyword rankings are stable
    let a_topics: Vec<&str> = a.topics.iter().map(|t| t.topic.as_str()).collect();
    let b_topics: Vec<&str> = b.topics.iter().map(|t| t.topic.as_str()).collect();
    assert_eq!(a_topics, b_topics);
}

#[test]
fn sample_meeting_produces_consistent_reports() {
    let data = analytics::analyze("t1", &sample_meeting()).unwrap();

    assert_eq!(data.metrics.speaker_count, 3);
    assert!((data.metrics.total_duration_secs - 33.0).abs() < 1e-9);

    // "yes" is a sub-second, sub-three-word segment
    assert!(data.metrics.interruption_count >= 1);

    // Positive words outweigh the one worried remark
    assert!(data.sentiment.overall_score > 0.0);
    assert_ne!(data.sentiment.overall_label, SentimentLabel::Negative);

    // Planning/budget vocabulary is present
    assert!(!data.topics.is_empty());

    // 33s meeting -> two 30s buckets
    assert_eq!(data.timeline.buckets.len(), 2);

    // High confidence throughout
    assert!(data.metrics.average_confidence > 0.85);
}
