use chrono::NaiveDate;

use crate::error::{AppError, Result};
use crate::models::{CandidateArticle, RawRecord, UNKNOWN_SOURCE};

use super::columns::{Column, EventRow};

const DATE_FORMAT: &str = "%Y%m%d";

/// The feed reports tone on a [-100, 100] scale.
const TONE_SCALE: f64 = 100.0;

#[derive(Debug, Default)]
pub struct Normalized {
    pub articles: Vec<CandidateArticle>,
    pub dropped: usize,
    /// Rows wider than the codebook; their extra fields are carried but unread.
    pub overflowing: usize,
    pub widest_overflow: usize,
}

/// Maps raw rows onto candidate articles. Rows that cannot be attributed or
/// parsed are dropped and counted; they never fail the batch.
pub fn normalize(rows: &[RawRecord]) -> Normalized {
    let mut normalized = Normalized::default();

    for (line, record) in rows.iter().enumerate() {
        let row = EventRow::bind(record);
        let extra = row.overflow().len();
        if extra > 0 {
            normalized.overflowing += 1;
            normalized.widest_overflow = normalized.widest_overflow.max(extra);
        }

        match candidate_from_row(row) {
            Ok(article) => normalized.articles.push(article),
            Err(e) => {
                tracing::debug!(line = line + 1, "Dropping row: {}", e);
                normalized.dropped += 1;
            }
        }
    }

    if normalized.overflowing > 0 {
        tracing::debug!(
            rows = normalized.overflowing,
            extra_columns = normalized.widest_overflow,
            "Rows wider than the event schema, extra columns ignored"
        );
    }

    normalized
}

fn candidate_from_row(row: EventRow<'_>) -> Result<CandidateArticle> {
    let url = row
        .source_url()
        .ok_or_else(|| missing(Column::SourceUrl, &row))?;

    let external_id = row
        .global_event_id()
        .ok_or_else(|| missing(Column::GlobalEventId, &row))?;

    let raw_date = row.sql_date().ok_or_else(|| missing(Column::SqlDate, &row))?;
    let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|e| {
        AppError::RecordMalformed(format!("event {}: bad SQLDATE {:?}: {}", external_id, raw_date, e))
    })?;

    let tone = row.avg_tone().map(parse_tone).transpose().map_err(|e| {
        AppError::RecordMalformed(format!("event {}: {}", external_id, e))
    })?;

    Ok(CandidateArticle {
        external_id: external_id.to_string(),
        date,
        source: row.actor1_name().unwrap_or(UNKNOWN_SOURCE).to_string(),
        url: url.to_string(),
        tone,
    })
}

fn parse_tone(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|e| format!("bad AvgTone {:?}: {}", raw, e))?;
    if !value.is_finite() {
        return Err(format!("non-finite AvgTone {:?}", raw));
    }
    Ok(value / TONE_SCALE)
}

fn missing(column: Column, row: &EventRow<'_>) -> AppError {
    AppError::RecordMalformed(format!(
        "missing {} in row of {} fields",
        column.name(),
        row.width()
    ))
}
