//! Calendar bucketing of timestamps.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};

use forumlens_core::Granularity;

/// First day of the calendar unit containing `ts`.
///
/// Weeks start on Monday (ISO 8601); months on the 1st.
#[must_use]
pub fn bucket_start(ts: DateTime<Utc>, granularity: Granularity) -> NaiveDate {
    let day = ts.date_naive();
    match granularity {
        Granularity::Day => day,
        Granularity::Week => {
            let offset = i64::from(day.weekday().num_days_from_monday());
            day - TimeDelta::days(offset)
        }
        Granularity::Month => day.with_day(1).unwrap_or(day),
    }
}
