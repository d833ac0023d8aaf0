//! Sign-based sentiment labeling.

use anteraja_core::SentimentLabel;

/// Map a polarity score to a label: positive above zero, negative below,
/// neutral at exactly zero.
#[must_use]
pub fn classify(score: f64) -> SentimentLabel {
    if score > 0.0 {
        SentimentLabel::Positive
    } else if score < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
