//! Sentiment pipeline orchestration.

use anteraja_core::{AnnotatedRecord, RawRecord, ResultTable};
use chrono::{DateTime, Utc};

use crate::classify::classify;
use crate::dictionary::Dictionary;
use crate::normalize::normalize_with;
use crate::scorer::score;
use crate::translate::{translate_batch, LanguagePair, Translator};

/// Per-source pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub languages: LanguagePair,
    /// Records timestamped before this instant are discarded before translation.
    pub cutoff: Option<DateTime<Utc>>,
    /// Delay between translation calls.
    pub translate_delay_ms: u64,
}

impl PipelineOptions {
    pub fn new(languages: LanguagePair) -> Self {
        Self {
            languages,
            cutoff: None,
            translate_delay_ms: 0,
        }
    }

    #[must_use]
    pub fn with_cutoff(mut self, cutoff: Option<DateTime<Utc>>) -> Self {
        self.cutoff = cutoff;
        self
    }

    #[must_use]
    pub fn with_translate_delay_ms(mut self, delay_ms: u64) -> Self {
        self.translate_delay_ms = delay_ms;
        self
    }
}

/// Run the pipeline over one source's records.
///
/// 1. Discard records older than the cutoff (if any).
/// 2. Translate every remaining text in one pass; drop failed translations.
/// 3. Clean, score and label each survivor independently.
///
/// Output order follows input order. Records are only ever dropped, never
/// duplicated or reordered.
pub async fn run<T: Translator>(
    records: Vec<RawRecord>,
    translator: &T,
    dictionary: &Dictionary,
    options: &PipelineOptions,
) -> ResultTable {
    let fetched = records.len();
    let records = apply_cutoff(records, options.cutoff);
    let after_cutoff = records.len();

    let texts: Vec<&str> = records.iter().map(|r| r.text.as_str()).collect();
    let translations = translate_batch(
        translator,
        &texts,
        &options.languages,
        options.translate_delay_ms,
    )
    .await;

    let table: ResultTable = records
        .into_iter()
        .zip(translations)
        .filter_map(|(raw, translated)| {
            let translated = translated?;
            annotate(raw, translated, dictionary)
        })
        .collect();

    tracing::info!(
        fetched,
        after_cutoff,
        annotated = table.len(),
        "pipeline run complete"
    );
    table
}

/// Keep records at or after `cutoff`; a `None` cutoff keeps everything.
#[must_use]
pub fn apply_cutoff(records: Vec<RawRecord>, cutoff: Option<DateTime<Utc>>) -> Vec<RawRecord> {
    let Some(cutoff) = cutoff else {
        return records;
    };
    records
        .into_iter()
        .filter(|r| r.timestamp >= cutoff)
        .collect()
}

/// Clean, score and label one translated record.
///
/// Returns `None` when scoring yields a non-finite value; the record is
/// logged and dropped.
#[must_use]
pub fn annotate(
    raw: RawRecord,
    translated_text: String,
    dictionary: &Dictionary,
) -> Option<AnnotatedRecord> {
    let cleaned_text = normalize_with(&translated_text, dictionary);
    let polarity_score = score(&cleaned_text);
    if !polarity_score.is_finite() {
        tracing::warn!(
            identifier = %raw.identifier,
            "scoring produced a non-finite value; dropping record"
        );
        return None;
    }
    let label = classify(polarity_score);

    Some(AnnotatedRecord {
        raw,
        translated_text,
        cleaned_text,
        polarity_score,
        label,
    })
}
