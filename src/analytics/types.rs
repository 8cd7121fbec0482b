//! Analytics report types
//!
//! Everything here is computed, read-only output: re-derivable from
//! the segment list at any time and never treated as source of truth.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Full analytics aggregate for one transcription.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsData {
    pub transcription_id: String,
    pub generated_at: DateTime<Utc>,
    pub speakers: Vec<SpeakerAnalytics>,
    pub topics: Vec<TopicRelevance>,
    pub sentiment: SentimentReport,
    pub metrics: MeetingMetrics,
    pub keywords: Vec<KeywordFrequency>,
    pub timeline: TimeDistribution,
    pub quality: QualityMetrics,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakerAnalytics {
    pub speaker: String,
    pub speaking_time_secs: f64,
    /// Share of the meeting's total duration, 0..=100
    pub speaking_time_percent: f64,
    pub word_count: usize,
    pub words_per_minute: f64,
    pub min_segment_duration: f64,
    pub max_segment_duration: f64,
    /// Top-5 highest-confidence long segments
    pub talking_points: Vec<TalkingPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TalkingPoint {
    pub text: String,
    pub start_time: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicRelevance {
    pub topic: String,
    /// Keyword hits normalized by segment count
    pub relevance: f64,
    pub keyword_hits: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentReport {
    /// Mean of per-segment scores
    pub overall_score: f64,
    pub overall_label: SentimentLabel,
    pub positive_segments: usize,
    pub negative_segments: usize,
    pub neutral_segments: usize,
    pub speaker_averages: Vec<SpeakerSentiment>,
    /// Segments with |score| > 0.3
    pub emotional_highlights: Vec<EmotionalHighlight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeakerSentiment {
    pub speaker: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmotionalHighlight {
    pub speaker: String,
    pub text: String,
    pub start_time: f64,
    pub score: f64,
    pub label: SentimentLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceLabel {
    Slow,
    Normal,
    Fast,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingMetrics {
    pub total_duration_secs: f64,
    pub speaking_time_secs: f64,
    pub silence_time_secs: f64,
    pub speaker_count: usize,
    pub average_confidence: f64,
    pub words_per_minute: f64,
    pub pace: PaceLabel,
    pub interruption_count: usize,
    /// Speaker changes per minute
    pub speaker_turnover_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub count: usize,
    pub tf_idf: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeBucket {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
    pub word_count: usize,
    pub speakers: Vec<String>,
    pub activity: ActivityLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeDistribution {
    pub bucket_secs: f64,
    pub buckets: Vec<TimeBucket>,
    /// Bucket indices classified high-activity, in time order
    pub peak_periods: Vec<usize>,
    /// Bucket indices classified low-activity, in time order
    pub quiet_periods: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioQuality {
    Clear,
    Degraded,
    Noisy,
    Unknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityMetrics {
    pub average_confidence: f64,
    pub transcript_quality: QualityLabel,
    pub low_confidence_segments: usize,
    pub audio_quality: AudioQuality,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    Info,
    Notice,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub kind: String,
    pub severity: InsightSeverity,
    pub message: String,
    pub action_items: Vec<String>,
}
