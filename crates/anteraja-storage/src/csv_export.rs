//! CSV rendition of a result table.
//!
//! Columns: `idx`, the source's identifier/timestamp/text names, then
//! `sentiment_score` and `sentiment`. The text column holds the cleaned text
//! that was scored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anteraja_core::{AnnotatedRecord, RawRecord, ResultTable, SentimentLabel, SourceKind};
use chrono::{DateTime, Utc};

use crate::error::StorageError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

fn io_error(path: &Path, source: io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Serialize `table` with `source`'s column names.
///
/// # Errors
///
/// Returns [`StorageError::Csv`] if a row cannot be written.
pub fn to_csv(table: &[AnnotatedRecord], source: SourceKind) -> Result<String, StorageError> {
    let [id_col, ts_col, text_col] = source.columns();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["idx", id_col, ts_col, text_col, "sentiment_score", "sentiment"])?;

    for (idx, record) in table.iter().enumerate() {
        writer.write_record([
            idx.to_string(),
            record.raw.identifier.clone(),
            record.raw.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            record.cleaned_text.clone(),
            record.polarity_score.to_string(),
            record.label.as_str().to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| io_error(Path::new("<memory>"), e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| io_error(Path::new("<memory>"), io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Write `csv` to `<dir>/<blob name>`, creating `dir` if needed.
///
/// # Errors
///
/// Returns [`StorageError::Io`] if the directory or file cannot be written.
pub fn write_local(dir: &Path, source: SourceKind, csv: &str) -> Result<PathBuf, StorageError> {
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    let path = dir.join(source.blob_name());
    fs::write(&path, csv).map_err(|e| io_error(&path, e))?;
    tracing::info!(source = %source, path = %path.display(), bytes = csv.len(), "wrote local CSV");
    Ok(path)
}

/// Read a table previously written by [`to_csv`].
///
/// Columns are read by position, so exports from either source load. The
/// text column fills the raw, translated and cleaned text alike.
///
/// # Errors
///
/// - [`StorageError::Csv`] for malformed CSV.
/// - [`StorageError::InvalidRecord`] for rows with a bad timestamp, score or label.
pub fn read_csv<R: io::Read>(reader: R) -> Result<ResultTable, StorageError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut table = Vec::new();

    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, csv::Position::line);
        let field = |i: usize| row.get(i).unwrap_or_default();
        let invalid = |reason: String| StorageError::InvalidRecord { line, reason };

        let timestamp = DateTime::parse_from_str(field(2), TIMESTAMP_PARSE_FORMAT)
            .map_err(|e| invalid(format!("timestamp {:?}: {e}", field(2))))?
            .with_timezone(&Utc);
        let polarity_score: f64 = field(4)
            .parse()
            .map_err(|e| invalid(format!("sentiment_score {:?}: {e}", field(4))))?;
        let label: SentimentLabel = field(5)
            .parse()
            .map_err(|e| invalid(format!("sentiment {:?}: {e}", field(5))))?;
        let text = field(3).to_string();

        table.push(AnnotatedRecord {
            raw: RawRecord::new(field(1), timestamp, text.clone()),
            translated_text: text.clone(),
            cleaned_text: text,
            polarity_score,
            label,
        });
    }

    Ok(table)
}
