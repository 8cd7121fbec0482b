//! Topic analysis over a fixed keyword dictionary

use super::lexicon::TOPIC_KEYWORDS;
use super::tokenize;
use super::types::TopicRelevance;
use crate::model::TranscriptSegment;

const MAX_TOPICS: usize = 10;

/// Score each topic by keyword hits normalized by segment count; top
/// ten topics, ranked descending by relevance.
pub fn analyze_topics(segments: &[TranscriptSegment]) -> Vec<TopicRelevance> {
    if segments.is_empty() {
        return Vec::new();
    }

    let mut topics: Vec<TopicRelevance> = TOPIC_KEYWORDS
        .iter()
        .filter_map(|(topic, keywords)| {
            let hits: usize = segments
                .iter()
                .map(|segment| {
                    tokenize(&segment.text)
                        .filter(|token| keywords.iter().any(|k| token.starts_with(k)))
                        .count()
                })
                .sum();

            if hits == 0 {
                return None;
            }

            Some(TopicRelevance {
                topic: topic.to_string(),
                relevance: hits as f64 / segments.len() as f64,
                keyword_hits: hits,
            })
        })
        .collect();

    topics.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.topic.cmp(&b.topic))
    });
    topics.truncate(MAX_TOPICS);
    topics
}
