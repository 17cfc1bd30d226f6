use csv::StringRecord;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use crate::pipeline::PipelineError;

pub const TIMESTAMP_COLUMN: &str = "timestamp";
pub const KWH_COLUMN: &str = "kwh";

/// Positions of the required columns within a CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredColumns {
    pub timestamp: usize,
    pub kwh: usize,
}

/// Schema check run once per file, before any row is read.
///
/// Header names are compared after trimming surrounding whitespace, so a
/// ` kwh ` header satisfies `kwh`; an export tool that pads headers is not
/// rejected for it. Matching is otherwise exact and case-sensitive. When a
/// name repeats, the first occurrence is used.
pub fn required_columns(headers: &StringRecord) -> Result<RequiredColumns, PipelineError> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    match (position(TIMESTAMP_COLUMN), position(KWH_COLUMN)) {
        (Some(timestamp), Some(kwh)) => Ok(RequiredColumns { timestamp, kwh }),
        (ts, kwh) => {
            let mut missing = Vec::new();
            if ts.is_none() {
                missing.push(TIMESTAMP_COLUMN);
            }
            if kwh.is_none() {
                missing.push(KWH_COLUMN);
            }
            Err(PipelineError::Schema { missing })
        }
    }
}

/// Parse a naive timestamp.
///
/// Accepts `YYYY-MM-DD[ T]HH:MM[:SS[.f]]`, a bare date (midnight) and RFC 3339
/// with an offset, which is converted to UTC before the offset is dropped.
/// `/` is accepted as the date separator. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let s = trimmed.replace('/', "-").replacen(' ', "T", 1);

    if let Ok(ts) = OffsetDateTime::parse(&s, &Rfc3339) {
        let utc = ts.to_offset(UtcOffset::UTC);
        return Some(PrimitiveDateTime::new(utc.date(), utc.time()));
    }

    PrimitiveDateTime::parse(
        &s,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| PrimitiveDateTime::parse(&s, format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")))
    .or_else(|_| PrimitiveDateTime::parse(&s, format_description!("[year]-[month]-[day]T[hour]:[minute]")))
    .ok()
    .or_else(|| {
        Date::parse(&s, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(Date::midnight)
    })
}

/// Parse a consumption value. Blank, non-numeric and non-finite cells are null.
pub fn parse_kwh(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce one CSV row into `(timestamp, kwh)`, or `None` if the row is dropped.
///
/// A cell missing because the row is short counts as null.
pub fn coerce_row(record: &StringRecord, columns: RequiredColumns) -> Option<(PrimitiveDateTime, f64)> {
    let timestamp = record.get(columns.timestamp).and_then(parse_timestamp)?;
    let kwh = record.get(columns.kwh).and_then(parse_kwh)?;
    Some((timestamp, kwh))
}
