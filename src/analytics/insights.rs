//! Rule-derived meeting insights
//!
//! A small fixed rule set over the other reports; no additional data
//! is consulted.

use super::types::{
    Insight, InsightSeverity, MeetingMetrics, PaceLabel, QualityLabel, QualityMetrics,
    SentimentLabel, SentimentReport, SpeakerAnalytics, TopicRelevance,
};

const DOMINANT_SHARE_PERCENT: f64 = 60.0;
const HIGH_INTERRUPTION_COUNT: usize = 5;

pub fn derive_insights(
    speakers: &[SpeakerAnalytics],
    topics: &[TopicRelevance],
    sentiment: &SentimentReport,
    metrics: &MeetingMetrics,
    quality: &QualityMetrics,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(dominant) = speakers
        .iter()
        .find(|s| s.speaking_time_percent > DOMINANT_SHARE_PERCENT)
    {
        insights.push(Insight {
            kind: "dominant_speaker".to_string(),
            severity: InsightSeverity::Notice,
            message: format!(
                "{} spoke for {:.0}% of the meeting",
                dominant.speaker, dominant.speaking_time_percent
            ),
            action_items: vec![
                "Invite quieter participants to contribute".to_string(),
            ],
        });
    }

    if metrics.pace == PaceLabel::Fast {
        insights.push(Insight {
            kind: "fast_pace".to_string(),
            severity: InsightSeverity::Info,
            message: format!(
                "Conversation pace was fast ({:.0} words per minute)",
                metrics.words_per_minute
            ),
            action_items: Vec::new(),
        });
    }

    if quality.transcript_quality == QualityLabel::Poor {
        insights.push(Insight {
            kind: "poor_quality".to_string(),
            severity: InsightSeverity::Warning,
            message: "Transcript quality was poor; results may be unreliable".to_string(),
            action_items: quality.recommendations.clone(),
        });
    }

    if sentiment.overall_label == SentimentLabel::Negative {
        insights.push(Insight {
            kind: "negative_sentiment".to_string(),
            severity: InsightSeverity::Warning,
            message: format!(
                "Overall sentiment was negative (score {:.2})",
                sentiment.overall_score
            ),
            action_items: vec!["Follow up on unresolved concerns".to_string()],
        });
    }

    if metrics.interruption_count > HIGH_INTERRUPTION_COUNT {
        insights.push(Insight {
            kind: "high_interruptions".to_string(),
            severity: InsightSeverity::Notice,
            message: format!(
                "{} interruptions detected",
                metrics.interruption_count
            ),
            action_items: vec!["Consider a stricter speaking order".to_string()],
        });
    }

    if let Some(top) = topics.first() {
        insights.push(Insight {
            kind: "top_topic".to_string(),
            severity: InsightSeverity::Info,
            message: format!(
                "Most discussed topic: {} ({} keyword mention(s))",
                top.topic, top.keyword_hits
            ),
            action_items: Vec::new(),
        });
    }

    insights
}
