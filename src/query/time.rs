use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};

use crate::query::QueryError;

/// Parse one caller-supplied time bound to UTC.
///
/// A trailing `Z` or an explicit offset is honored as-is. A bare wall-clock
/// time is interpreted in `assumed_local` - the configured stand-in for the
/// caller's timezone - and converted. Malformed input reports which field
/// was at fault instead of failing the whole request pipeline.
pub fn parse_time_bound(
    field: &'static str,
    raw: &str,
    assumed_local: FixedOffset,
) -> Result<DateTime<Utc>, QueryError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let Ok(naive) = raw.parse::<NaiveDateTime>() else {
        return Err(QueryError::InvalidTimeBound { field, value: raw.to_string() });
    };
    Ok(naive.and_utc() - Duration::seconds(i64::from(assumed_local.local_minus_utc())))
}

/// Widen the lookback window so the modification-time scan still reaches
/// files old enough to contain `start`.
///
/// The widened value is the day gap between now and the start bound plus a
/// one-day margin; the absolute value tolerates a future-dated start.
pub fn effective_lookback_days(
    days_back: u32,
    start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> u32 {
    let Some(start) = start else {
        return days_back;
    };
    let gap_days = (now - start).num_days() + 1;
    let widened = gap_days.unsigned_abs().saturating_add(1);
    days_back.max(u32::try_from(widened).unwrap_or(u32::MAX))
}
