use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use lazy_static::lazy_static;

use crate::error::TimestampError;

lazy_static! {
    /// 1904-01-01 00:00:00 UTC, the reference instant of LabVIEW timestamps
    pub static ref LABVIEW_EPOCH: DateTime<Utc> = NaiveDate::from_ymd_opt(1904, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .expect("1904-01-01 00:00:00 is a valid instant");

    /// Earliest and latest instants a spreadsheet date cell can hold
    pub static ref MIN_INSTANT: NaiveDateTime = NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("0001-01-01 00:00:00 is a valid instant");
    pub static ref MAX_INSTANT: NaiveDateTime = NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_micro_opt(23, 59, 59, 999_999))
        .expect("9999-12-31 23:59:59.999999 is a valid instant");
}

/// Text written in place of a timestamp that could not be decoded
pub const INVALID_TIMESTAMP_TEXT: &str = "Timestamp Invalido";

/// Parses the raw timestamp field into seconds, accepting `,` as decimal separator.
pub fn parse_seconds(raw: &str) -> Result<f64, TimestampError> {
    let normalized = raw.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(seconds) if !seconds.is_nan() => Ok(seconds),
        _ => Err(TimestampError::InvalidNumber(raw.to_string())),
    }
}

/// Converts seconds past the LabVIEW epoch to a naive (offset-free) instant.
///
/// Fractional seconds are kept to microsecond precision. Results outside
/// years 1 to 9999, the span a spreadsheet date can hold, fail with
/// [`TimestampError::Overflow`] instead of wrapping.
///
/// # Arguments
/// * `seconds` - Seconds since 1904-01-01 00:00:00 UTC
///
/// # Returns
/// * `Result<NaiveDateTime, TimestampError>` - The instant with its UTC offset stripped
///
/// # Examples
/// ```
/// use labview_xlsx::timestamp::seconds_to_datetime;
///
/// let instant = seconds_to_datetime(86_400.5).unwrap();
/// assert_eq!(instant.to_string(), "1904-01-02 00:00:00.500");
/// assert!(seconds_to_datetime(3e11).is_err());
/// ```
pub fn seconds_to_datetime(seconds: f64) -> Result<NaiveDateTime, TimestampError> {
    let micros = (seconds * 1_000_000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(TimestampError::Overflow(seconds));
    }

    LABVIEW_EPOCH
        .checked_add_signed(TimeDelta::microseconds(micros as i64))
        .map(|instant| instant.naive_utc())
        .filter(|instant| (*MIN_INSTANT..=*MAX_INSTANT).contains(instant))
        .ok_or(TimestampError::Overflow(seconds))
}

/// Full decode of one timestamp field.
pub fn decode(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    seconds_to_datetime(parse_seconds(raw)?)
}

/// Inverse of [`seconds_to_datetime`].
pub fn datetime_to_seconds(instant: &NaiveDateTime) -> f64 {
    let delta = instant.signed_duration_since(LABVIEW_EPOCH.naive_utc());
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}
