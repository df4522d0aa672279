//! Normalization of forum date strings ("2 hours ago") to UTC timestamps.

use chrono::{DateTime, Months, NaiveDate, NaiveDateTime, SubsecRound, TimeDelta, Utc};

/// Resolves a forum date string against `now`.
///
/// Accepts `"N <unit>(s) ago"` for seconds through years, `"a"`/`"an"` as a
/// count of one, `"just now"`, `"yesterday"`, and absolute RFC 3339,
/// `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` values. Months and years are
/// subtracted on the calendar (day clamped to the end of a shorter month).
///
/// Returns `None` for anything else; callers must not substitute a guess.
#[must_use]
pub fn parse_relative_time(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let now = now.trunc_subsecs(0);
    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "just now" | "now" | "moments ago" => return Some(now),
        "yesterday" => return now.checked_sub_signed(TimeDelta::try_days(1)?),
        _ => {}
    }

    if let Some(phrase) = lower.strip_suffix(" ago") {
        return subtract_phrase(phrase.trim(), now);
    }

    parse_absolute(trimmed)
}

fn subtract_phrase(phrase: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut parts = phrase.split_whitespace();
    let amount_raw = parts.next()?;
    let unit_raw = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let amount: u32 = match amount_raw {
        "a" | "an" | "one" => 1,
        digits => digits.parse().ok()?,
    };
    let amount_i64 = i64::from(amount);

    match unit_raw.trim_end_matches('s') {
        "second" | "sec" => now.checked_sub_signed(TimeDelta::try_seconds(amount_i64)?),
        "minute" | "min" => now.checked_sub_signed(TimeDelta::try_minutes(amount_i64)?),
        "hour" | "hr" => now.checked_sub_signed(TimeDelta::try_hours(amount_i64)?),
        "day" => now.checked_sub_signed(TimeDelta::try_days(amount_i64)?),
        "week" => now.checked_sub_signed(TimeDelta::try_weeks(amount_i64)?),
        "month" => now.checked_sub_months(Months::new(amount)),
        "year" => now.checked_sub_months(Months::new(amount.checked_mul(12)?)),
        _ => None,
    }
}

fn parse_absolute(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
