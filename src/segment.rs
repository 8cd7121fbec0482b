//! Transcript segment normalization
//!
//! Both providers funnel their raw utterances through these helpers so
//! downstream code sees a single canonical shape: no blank segments,
//! no empty speaker labels.

/// Canonical label for a speaker the provider could not identify.
pub const UNKNOWN_SPEAKER: &str = "unknown";

/// Normalize a provider-reported speaker label.
///
/// Only truly-unknown labels (empty string, "unknown", or the
/// "speaker_unknown" sentinel, case- and whitespace-insensitive)
/// collapse to [`UNKNOWN_SPEAKER`]. Everything else, including numeric
/// speaker ids like "speaker_0", passes through verbatim so distinct
/// speakers stay distinct.
pub fn normalize_speaker(label: &str) -> String {
    let trimmed = label.trim();
    let lowered = trimmed.to_lowercase();
    if trimmed.is_empty() || lowered == UNKNOWN_SPEAKER || lowered == "speaker_unknown" {
        UNKNOWN_SPEAKER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether an utterance carries any transcribable text.
pub fn has_text(text: &str) -> bool {
    !text.trim().is_empty()
}
