//! Per-day and per-label summaries of a result table, used for charts.

use std::collections::BTreeMap;

use anteraja_core::{AnnotatedRecord, SentimentLabel};
use chrono::NaiveDate;

/// Mean polarity of all records on one UTC calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySentiment {
    pub day: NaiveDate,
    pub mean_score: f64,
    pub count: usize,
}

/// Number of records carrying each label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }

    /// Counts in chart order: positive, neutral, negative.
    #[must_use]
    pub fn ordered(&self) -> [(SentimentLabel, usize); 3] {
        [
            (SentimentLabel::Positive, self.positive),
            (SentimentLabel::Neutral, self.neutral),
            (SentimentLabel::Negative, self.negative),
        ]
    }

    /// Whole-number share of `count` in the total, `0` for an empty table.
    #[must_use]
    pub fn percent(&self, count: usize) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let pct = ((count as f64 / total as f64) * 100.0).round() as u32;
        pct
    }
}

/// Group records by UTC calendar day and average their polarity.
///
/// Days are returned in ascending order; days with no records are absent.
#[must_use]
pub fn daily_mean(table: &[AnnotatedRecord]) -> Vec<DailySentiment> {
    let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for record in table {
        let entry = by_day
            .entry(record.raw.timestamp.date_naive())
            .or_insert((0.0, 0));
        entry.0 += record.polarity_score;
        entry.1 += 1;
    }

    by_day
        .into_iter()
        .map(|(day, (sum, count))| {
            #[allow(clippy::cast_precision_loss)]
            let mean_score = sum / count as f64;
            DailySentiment {
                day,
                mean_score,
                count,
            }
        })
        .collect()
}

#[must_use]
pub fn label_counts(table: &[AnnotatedRecord]) -> LabelCounts {
    table
        .iter()
        .fold(LabelCounts::default(), |mut counts, record| {
            match record.label {
                SentimentLabel::Positive => counts.positive += 1,
                SentimentLabel::Neutral => counts.neutral += 1,
                SentimentLabel::Negative => counts.negative += 1,
            }
            counts
        })
}

#[cfg(test)]
mod tests {
    use anteraja_core::RawRecord;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::classify::classify;

    fn annotated(day: u32, hour: u32, score: f64) -> AnnotatedRecord {
        AnnotatedRecord {
            raw: RawRecord::new(
                "u",
                Utc.with_ymd_and_hms(2021, 10, day, hour, 0, 0).unwrap(),
                "t",
            ),
            translated_text: "t".to_string(),
            cleaned_text: "t".to_string(),
            polarity_score: score,
            label: classify(score),
        }
    }

    #[test]
    fn daily_mean_groups_by_calendar_day() {
        let table = vec![
            annotated(11, 1, 0.5),
            annotated(10, 23, -0.4),
            annotated(11, 22, -0.1),
            annotated(10, 2, 0.0),
        ];
        let days = daily_mean(&table);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, NaiveDate::from_ymd_opt(2021, 10, 10).unwrap());
        assert_eq!(days[0].count, 2);
        assert!((days[0].mean_score - (-0.2)).abs() < 1e-9);
        assert_eq!(days[1].day, NaiveDate::from_ymd_opt(2021, 10, 11).unwrap());
        assert!((days[1].mean_score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn daily_mean_of_empty_table_is_empty() {
        assert!(daily_mean(&[]).is_empty());
    }

    #[test]
    fn label_counts_tally_each_label() {
        let table = vec![
            annotated(10, 1, 0.3),
            annotated(10, 2, 0.0),
            annotated(10, 3, -0.3),
            annotated(10, 4, -0.9),
        ];
        let counts = label_counts(&table);
        assert_eq!(
            counts,
            LabelCounts {
                positive: 1,
                neutral: 1,
                negative: 2
            }
        );
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.percent(counts.negative), 50);
    }

    #[test]
    fn percent_of_empty_is_zero() {
        assert_eq!(LabelCounts::default().percent(0), 0);
    }
}
