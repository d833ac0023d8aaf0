//! End-to-end pipeline behaviour with an in-process translator.
//!
//! The translator is a lookup table so every scenario is deterministic and
//! needs no network.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{TimeZone, Utc};

use anteraja_core::{RawRecord, SentimentLabel};
use anteraja_sentiment::{
    run, Dictionary, LanguagePair, PipelineOptions, SentimentError, Translator,
};

/// Translates from a fixed table; unknown texts fail.
struct TableTranslator {
    table: HashMap<&'static str, &'static str>,
    calls: AtomicU32,
}

impl TableTranslator {
    fn new(entries: &[(&'static str, &'static str)]) -> Self {
        Self {
            table: entries.iter().copied().collect(),
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Translator for TableTranslator {
    fn translate(
        &self,
        text: &str,
        _languages: &LanguagePair,
    ) -> impl Future<Output = Result<String, SentimentError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .table
            .get(text)
            .map(|t| (*t).to_string())
            .ok_or_else(|| SentimentError::Translation(format!("no entry for {text:?}")));
        async move { result }
    }
}

fn options() -> PipelineOptions {
    PipelineOptions::new(LanguagePair::new("id", "en"))
}

fn record(id: &str, day: u32, text: &str) -> RawRecord {
    RawRecord::new(
        id,
        Utc.with_ymd_and_hms(2021, 11, day, 9, 30, 0).unwrap(),
        text,
    )
}

// ---------------------------------------------------------------------------
// Scenario A – Indonesian complaint with a handle and a hashtag
// ---------------------------------------------------------------------------

#[tokio::test]
async fn complaint_tweet_is_labeled_negative() {
    let source = "@anteraja_id pengiriman lambat sekali #kecewa";
    let translator = TableTranslator::new(&[(
        source,
        "@anteraja_id shipment is very slow #disappointed",
    )]);

    let table = run(
        vec![record("budi", 12, source)],
        &translator,
        Dictionary::bundled(),
        &options(),
    )
    .await;

    assert_eq!(table.len(), 1);
    let row = &table[0];
    assert_eq!(row.raw.text, source);
    assert!(!row.cleaned_text.contains('@'));
    assert!(!row.cleaned_text.contains('#'));
    assert!(row.cleaned_text.contains("slow"));
    assert!(row.cleaned_text.contains("disappointed"));
    assert!(row.polarity_score < 0.0, "got {}", row.polarity_score);
    assert_eq!(row.label, SentimentLabel::Negative);
}

// ---------------------------------------------------------------------------
// Scenario B – empty text
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_text_is_neutral_without_provider_call() {
    let translator = TableTranslator::new(&[]);

    let table = run(
        vec![record("andi", 12, "")],
        &translator,
        Dictionary::bundled(),
        &options(),
    )
    .await;

    assert_eq!(table.len(), 1);
    assert_eq!(table[0].translated_text, "");
    assert_eq!(table[0].cleaned_text, "");
    assert_eq!(table[0].polarity_score, 0.0);
    assert_eq!(table[0].label, SentimentLabel::Neutral);
    assert_eq!(translator.calls(), 0);
}

// ---------------------------------------------------------------------------
// Scenario C – cutoff
// ---------------------------------------------------------------------------

#[tokio::test]
async fn review_before_cutoff_is_absent() {
    let translator = TableTranslator::new(&[("lama", "old"), ("baru", "new")]);
    let cutoff = Utc.with_ymd_and_hms(2021, 11, 11, 0, 0, 0).unwrap();

    let table = run(
        vec![record("a", 10, "lama"), record("b", 12, "baru")],
        &translator,
        Dictionary::bundled(),
        &options().with_cutoff(Some(cutoff)),
    )
    .await;

    assert_eq!(table.len(), 1);
    assert_eq!(table[0].raw.identifier, "b");
    // the old review is never sent for translation
    assert_eq!(translator.calls(), 1);
}

// ---------------------------------------------------------------------------
// Scenario D – one translation failure among five
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_translation_drops_only_that_record() {
    let translator = TableTranslator::new(&[
        ("satu", "one good"),
        ("dua", "two bad"),
        ("empat", "four"),
        ("lima", "five great"),
    ]);
    let records = vec![
        record("r1", 12, "satu"),
        record("r2", 12, "dua"),
        record("r3", 12, "tiga"),
        record("r4", 12, "empat"),
        record("r5", 12, "lima"),
    ];

    let table = run(records, &translator, Dictionary::bundled(), &options()).await;

    let ids: Vec<&str> = table.iter().map(|r| r.raw.identifier.as_str()).collect();
    assert_eq!(ids, ["r1", "r2", "r4", "r5"]);
    assert_eq!(translator.calls(), 5);
}

// ---------------------------------------------------------------------------
// Table-level properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn table_keeps_length_and_order_when_nothing_fails() {
    let translator = TableTranslator::new(&[
        ("a", "fast delivery"),
        ("b", "late parcel"),
        ("c", "ok"),
    ]);
    let records = vec![record("1", 13, "a"), record("2", 11, "b"), record("3", 12, "c")];

    let table = run(records.clone(), &translator, Dictionary::bundled(), &options()).await;

    assert_eq!(table.len(), records.len());
    for (row, raw) in table.iter().zip(&records) {
        assert_eq!(&row.raw, raw);
    }
}

#[tokio::test]
async fn labels_agree_with_scores() {
    let translator = TableTranslator::new(&[
        ("a", "the courier was very friendly"),
        ("b", "terrible service"),
        ("c", "parcel arrived"),
    ]);
    let records = vec![record("1", 12, "a"), record("2", 12, "b"), record("3", 12, "c")];

    let table = run(records, &translator, Dictionary::bundled(), &options()).await;

    for row in &table {
        let expected = if row.polarity_score > 0.0 {
            SentimentLabel::Positive
        } else if row.polarity_score < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        assert_eq!(row.label, expected, "{row:?}");
        assert!((-1.0..=1.0).contains(&row.polarity_score));
    }
    assert_eq!(table[0].label, SentimentLabel::Positive);
    assert_eq!(table[1].label, SentimentLabel::Negative);
    assert_eq!(table[2].label, SentimentLabel::Neutral);
}

#[tokio::test]
async fn empty_input_yields_empty_table() {
    let translator = TableTranslator::new(&[]);
    let table = run(vec![], &translator, Dictionary::bundled(), &options()).await;
    assert!(table.is_empty());
}
