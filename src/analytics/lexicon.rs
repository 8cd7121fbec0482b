//! Fixed keyword dictionaries for the heuristic analyses
//!
//! These are intentionally simple word lists. The analyses built on
//! them are contracts, not research-grade NLP.

/// Topic name → keywords counted toward that topic's relevance.
pub const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "planning",
        &["plan", "roadmap", "milestone", "deadline", "schedule", "timeline", "sprint"],
    ),
    (
        "budget",
        &["budget", "cost", "spend", "revenue", "price", "invoice", "quarterly", "financial"],
    ),
    (
        "product",
        &["feature", "release", "product", "launch", "design", "prototype", "spec"],
    ),
    (
        "customers",
        &["customer", "client", "feedback", "support", "user", "churn", "satisfaction"],
    ),
    (
        "engineering",
        &["bug", "deploy", "code", "test", "infrastructure", "pipeline", "incident", "outage"],
    ),
    (
        "hiring",
        &["hire", "candidate", "interview", "recruiting", "onboarding", "headcount"],
    ),
    (
        "decisions",
        &["decide", "decision", "agree", "approve", "vote", "consensus"],
    ),
    (
        "action_items",
        &["action", "task", "assign", "follow", "todo", "owner", "next"],
    ),
];

/// Words counted as positive sentiment signals.
pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "agree", "love", "happy", "progress", "success",
    "win", "perfect", "awesome", "thanks", "helpful", "nice", "better", "best",
    "improved", "solved", "glad", "excited",
];

/// Words counted as negative sentiment signals.
pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "problem", "issue", "fail", "failed", "wrong", "blocked", "concern",
    "worried", "risk", "delay", "broken", "worse", "worst", "difficult", "hate",
    "angry", "frustrated", "missed", "bug",
];

/// Tokens excluded from keyword frequency analysis.
pub const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "can", "had", "her",
    "was", "one", "our", "out", "has", "have", "this", "that", "with", "they",
    "them", "then", "than", "will", "would", "could", "should", "what", "when",
    "where", "which", "there", "their", "about", "into", "just", "like", "some",
    "been", "were", "from", "your", "it's", "don't", "we're", "i'm", "let's",
    "going", "really", "think", "know", "yeah", "okay", "right", "well", "because",
];

/// Case-insensitive membership test used by the sentiment and keyword
/// passes.
pub fn contains_word(list: &[&str], word: &str) -> bool {
    list.iter().any(|w| w.eq_ignore_ascii_case(word))
}
