//! Record types shared by the pipeline, the storage sink and the CLI.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraped text unit, as delivered by a source feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Author handle (tweets) or reviewer display name (Play Store).
    pub identifier: String,
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl RawRecord {
    pub fn new(
        identifier: impl Into<String>,
        timestamp: DateTime<Utc>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            timestamp,
            text: text.into(),
        }
    }
}

/// Categorical sentiment derived from the sign of a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label: {other}")),
        }
    }
}

/// A [`RawRecord`] carried through translation, cleaning, scoring and labeling.
///
/// Fields are filled in pipeline order; none is rewritten once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    pub raw: RawRecord,
    pub translated_text: String,
    pub cleaned_text: String,
    /// Polarity in `[-1.0, 1.0]`, computed from `cleaned_text` only.
    pub polarity_score: f64,
    pub label: SentimentLabel,
}

/// Annotated records in input order. Dropped records are simply absent.
pub type ResultTable = Vec<AnnotatedRecord>;

/// The two fixed feeds this job processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Twitter,
    PlayStore,
}

impl SourceKind {
    pub const ALL: [SourceKind; 2] = [SourceKind::Twitter, SourceKind::PlayStore];

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            SourceKind::Twitter => "twitter",
            SourceKind::PlayStore => "play_store",
        }
    }

    /// Blob / file name the exported table is stored under.
    #[must_use]
    pub fn blob_name(self) -> &'static str {
        match self {
            SourceKind::Twitter => "TwitterSentimentAnalysis.csv",
            SourceKind::PlayStore => "PlaystoreSentimentAnalysis.csv",
        }
    }

    /// Column names for identifier, timestamp and text in the exported table.
    #[must_use]
    pub fn columns(self) -> [&'static str; 3] {
        match self {
            SourceKind::Twitter => ["username", "date", "tweet"],
            SourceKind::PlayStore => ["userName", "at", "content"],
        }
    }

    /// Human readable title used on charts.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            SourceKind::Twitter => "Sentiment of tweets of Anteraja",
            SourceKind::PlayStore => "Sentiment of review of Anteraja on Google Play",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
