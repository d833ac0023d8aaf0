//! Sentiment pipeline for Anteraja social and review text.
//!
//! Translates Indonesian text to English, strips mentions, emoji and
//! non-English tokens, scores polarity with a lexicon and labels each record.
//! Source adapters for Twitter and Google Play feed the pipeline; daily and
//! per-label aggregates feed the charts.

pub mod aggregate;
pub mod classify;
pub mod dictionary;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod scorer;
pub mod sources;
pub mod translate;

mod rate_limit;

pub use aggregate::{daily_mean, label_counts, DailySentiment, LabelCounts};
pub use classify::classify;
pub use dictionary::Dictionary;
pub use error::SentimentError;
pub use normalize::{normalize, normalize_with};
pub use pipeline::{annotate, run, PipelineOptions};
pub use scorer::score;
pub use sources::{PlayStoreClient, TwitterClient};
pub use translate::{translate_batch, GoogleTranslator, LanguagePair, Translator};
