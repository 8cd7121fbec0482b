//! Keyword frequency with a simplified TF-IDF score

use super::lexicon::{contains_word, STOP_WORDS};
use super::tokenize;
use super::types::KeywordFrequency;
use crate::model::TranscriptSegment;
use std::collections::BTreeMap;

const MIN_OCCURRENCES: usize = 2;
const MIN_LENGTH: usize = 3;
const MAX_KEYWORDS: usize = 20;

/// Stop-word-filtered token counts, scored with
/// `tf * ln(segment_count / count)` and capped at the top 20.
pub fn keyword_frequency(segments: &[TranscriptSegment]) -> Vec<KeywordFrequency> {
    if segments.is_empty() {
        return Vec::new();
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_tokens = 0usize;

    for segment in segments {
        for token in tokenize(&segment.text) {
            total_tokens += 1;
            if token.len() < MIN_LENGTH || contains_word(STOP_WORDS, &token) {
                continue;
            }
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    if total_tokens == 0 {
        return Vec::new();
    }

    let segment_count = segments.len() as f64;

    let mut keywords: Vec<KeywordFrequency> = counts
        .into_iter()
        .filter(|(_, count)| *count >= MIN_OCCURRENCES)
        .map(|(keyword, count)| {
            let tf = count as f64 / total_tokens as f64;
            // ln argument can dip below 1 when a word outnumbers the
            // segments; floor the score at zero.
            let idf = (segment_count / count as f64).ln().max(0.0);
            KeywordFrequency {
                keyword,
                count,
                tf_idf: tf * idf,
            }
        })
        .collect();

    keywords.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> TranscriptSegment {
        TranscriptSegment {
            transcription_id: "t1".to_string(),
            speaker: "a".to_string(),
            text: text.to_string(),
            start_time: 0.0,
            end_time: 1.0,
            confidence: 0.9,
            sequence: 1,
        }
    }

    #[test]
    fn stop_words_and_short_tokens_are_excluded() {
        let segments = vec![
            segment("the roadmap is a roadmap"),
            segment("ok ok the and"),
        ];

        let keywords = keyword_frequency(&segments);
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "roadmap");
        assert_eq!(keywords[0].count, 2);
    }

    #[test]
    fn single_occurrences_are_dropped() {
        let segments = vec![segment("migration rollout")];
        assert!(keyword_frequency(&segments).is_empty());
    }

    #[test]
    fn tf_idf_uses_segment_count_over_occurrences() {
        let segments = vec![
            segment("deploy deploy"),
            segment("deploy again"),
            segment("nothing here"),
        ];

        let keywords = keyword_frequency(&segments);
        let deploy = keywords.iter().find(|k| k.keyword == "deploy").unwrap();
        assert_eq!(deploy.count, 3);

        // tf = 3/6, idf = ln(3/3) = 0
        assert!(deploy.tf_idf.abs() < 1e-9);
    }
}
