//! Terminal charts for a result table.

use std::fs;
use std::path::Path;

use anteraja_core::{AnnotatedRecord, SourceKind};
use anteraja_sentiment::{daily_mean, label_counts, DailySentiment, LabelCounts};
use anyhow::Context;

/// Bar cells on each side of the zero axis in the daily chart.
const HALF_WIDTH: usize = 20;
/// Bar cells for a 100 % share in the label chart.
const SHARE_WIDTH: usize = 50;

/// Both charts for one source, ready to print.
pub(crate) fn render(source: SourceKind, table: &[AnnotatedRecord]) -> String {
    let mut out = format!("{}\n", source.title());
    out.push_str(&format!("{} records\n\n", table.len()));
    out.push_str(&render_daily(&daily_mean(table)));
    out.push('\n');
    out.push_str(&render_labels(&label_counts(table)));
    out
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn cells(fraction: f64, width: usize) -> usize {
    ((fraction.abs().min(1.0) * width as f64).round() as usize).min(width)
}

/// Horizontal bar per day, negative to the left of the axis.
pub(crate) fn render_daily(days: &[DailySentiment]) -> String {
    if days.is_empty() {
        return "daily mean polarity: no data\n".to_string();
    }
    let mut out = String::from("daily mean polarity\n");
    for day in days {
        let bar = "█".repeat(cells(day.mean_score, HALF_WIDTH));
        let (left, right) = if day.mean_score < 0.0 {
            (bar, String::new())
        } else {
            (String::new(), bar)
        };
        out.push_str(&format!(
            "{}  {left:>w$}|{right:<w$}  {:+.3}  n={}\n",
            day.day,
            day.mean_score,
            day.count,
            w = HALF_WIDTH
        ));
    }
    out
}

/// Share of each label, in whole percent.
pub(crate) fn render_labels(counts: &LabelCounts) -> String {
    let mut out = String::from("label share\n");
    for (label, count) in counts.ordered() {
        let pct = counts.percent(count);
        let bar = "█".repeat(cells(f64::from(pct) / 100.0, SHARE_WIDTH));
        out.push_str(&format!(
            "{:<9}{bar:<w$} {pct:>3}% ({count})\n",
            label.as_str(),
            w = SHARE_WIDTH
        ));
    }
    out
}

/// Which source wrote an export, judged by its identifier column name.
pub(crate) fn detect_source(header_line: &str) -> Option<SourceKind> {
    let id_col = header_line.split(',').nth(1)?.trim();
    SourceKind::ALL
        .into_iter()
        .find(|source| source.columns()[0] == id_col)
}

/// `report` command: render charts from an exported CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be read, its header is not an export
/// header, or a row fails to parse.
pub(crate) fn run_report(path: &Path) -> anyhow::Result<()> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let header = contents.lines().next().unwrap_or_default();
    let source = detect_source(header)
        .with_context(|| format!("{} is not a sentiment export", path.display()))?;
    let table = anteraja_storage::read_csv(contents.as_bytes())?;
    println!("{}", render(source, &table));
    Ok(())
}

#[cfg(test)]
mod tests {
    use anteraja_core::{RawRecord, SentimentLabel};
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;

    fn day(d: u32, mean_score: f64, count: usize) -> DailySentiment {
        DailySentiment {
            day: NaiveDate::from_ymd_opt(2021, 11, d).unwrap(),
            mean_score,
            count,
        }
    }

    #[test]
    fn daily_bars_sit_on_the_right_side_of_the_axis() {
        let out = render_daily(&[day(11, -0.5, 2), day(12, 0.25, 4)]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);

        let neg = lines[1];
        assert!(neg.starts_with("2021-11-11"));
        assert!(neg.contains(&format!("{}|", "█".repeat(10))));
        assert!(neg.contains("-0.500"));

        let pos = lines[2];
        assert!(pos.contains(&format!("|{}", "█".repeat(5))));
        assert!(pos.contains("+0.250"));
        assert!(pos.ends_with("n=4"));
    }

    #[test]
    fn empty_daily_chart_says_so() {
        assert!(render_daily(&[]).contains("no data"));
    }

    #[test]
    fn label_chart_lists_positive_neutral_negative() {
        let counts = LabelCounts {
            positive: 1,
            neutral: 1,
            negative: 2,
        };
        let out = render_labels(&counts);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].starts_with("positive"));
        assert!(lines[1].contains(" 25% (1)"));
        assert!(lines[2].starts_with("neutral"));
        assert!(lines[3].starts_with("negative"));
        assert!(lines[3].contains(" 50% (2)"));
        assert!(lines[3].contains(&"█".repeat(25)));
    }

    #[test]
    fn detects_source_from_header() {
        assert_eq!(
            detect_source("idx,username,date,tweet,sentiment_score,sentiment"),
            Some(SourceKind::Twitter)
        );
        assert_eq!(
            detect_source("idx,userName,at,content,sentiment_score,sentiment"),
            Some(SourceKind::PlayStore)
        );
        assert_eq!(detect_source("a,b,c"), None);
    }

    #[test]
    fn render_includes_title_and_count() {
        let record = AnnotatedRecord {
            raw: RawRecord::new(
                "budi",
                Utc.with_ymd_and_hms(2021, 11, 12, 1, 0, 0).unwrap(),
                "x",
            ),
            translated_text: "bad".to_string(),
            cleaned_text: "bad".to_string(),
            polarity_score: -0.7,
            label: SentimentLabel::Negative,
        };
        let out = render(SourceKind::Twitter, &[record]);
        assert!(out.starts_with(SourceKind::Twitter.title()));
        assert!(out.contains("1 records"));
        assert!(out.contains("negative"));
    }

    #[test]
    fn report_reads_exported_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PlaystoreSentimentAnalysis.csv");
        fs::write(
            &path,
            "idx,userName,at,content,sentiment_score,sentiment\n\
             0,Siti,2021-11-12 07:08:09+00:00,good,0.7,positive\n",
        )
        .unwrap();
        run_report(&path).unwrap();
    }

    #[test]
    fn report_rejects_foreign_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        assert!(run_report(&path).is_err());
    }
}
