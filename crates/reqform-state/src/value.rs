//! Calendar and clock values stored in documents.
//!
//! Date pickers hand over either a calendar date or a Unix timestamp, and time
//! pickers hand over either a formatted clock string or seconds since
//! midnight. Both shapes are kept as given so a round trip does not alter
//! what the form sent.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Timestamps above this magnitude are read as milliseconds.
const MILLIS_THRESHOLD: u64 = 9_999_999_999;

/// A date as supplied by a date field.
///
/// # Examples
///
/// ```
/// use reqform_state::DateValue;
/// use chrono::NaiveDate;
///
/// let from_millis = DateValue::Timestamp(1_714_521_600_000);
/// assert_eq!(from_millis.to_date(), NaiveDate::from_ymd_opt(2024, 5, 1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    /// An ISO-8601 calendar date (`2024-05-01`).
    Calendar(NaiveDate),
    /// A Unix timestamp in seconds or milliseconds.
    Timestamp(i64),
}

impl DateValue {
    /// Resolve to a calendar date in UTC.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Calendar(date) => Some(*date),
            DateValue::Timestamp(ts) if ts.unsigned_abs() > MILLIS_THRESHOLD => {
                DateTime::from_timestamp_millis(*ts).map(|dt| dt.date_naive())
            }
            DateValue::Timestamp(ts) => DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Calendar(date)
    }
}

/// A time of day as supplied by a time field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// A clock string such as `08:00 AM` or `17:30`.
    Clock(String),
    /// Seconds since midnight.
    Seconds(u32),
}

impl TimeValue {
    /// Create a clock value.
    #[inline]
    pub fn clock(s: impl Into<String>) -> Self {
        TimeValue::Clock(s.into())
    }

    /// Whether no time has been entered.
    pub fn is_blank(&self) -> bool {
        matches!(self, TimeValue::Clock(s) if s.trim().is_empty())
    }

    /// Parse into a time of day. Accepts 12-hour (`%I:%M %p`) and 24-hour
    /// (`%H:%M`) clock strings.
    pub fn to_time(&self) -> Option<NaiveTime> {
        match self {
            TimeValue::Clock(s) => {
                let s = s.trim();
                NaiveTime::parse_from_str(s, "%I:%M %p")
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                    .ok()
            }
            TimeValue::Seconds(secs) => NaiveTime::from_num_seconds_from_midnight_opt(*secs, 0),
        }
    }
}

impl Default for TimeValue {
    fn default() -> Self {
        TimeValue::Clock(String::new())
    }
}
