// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Earliest birthdate accepted by the profile and registration forms.
pub const MIN_BIRTHDATE: (i32, u32, u32) = (1900, 1, 1);

/// Format a UTC timestamp as ISO 8601 with millisecond precision and a `Z`
/// suffix (`1990-05-01T00:00:00.000Z`). Used to compare dates for equality.
pub fn format_iso_millis(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp, a naive timestamp (taken as UTC), or a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalized ISO form of a stored date string, if it parses.
pub fn normalize_iso(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(format_iso_millis)
}

/// Format a date for display as `DD/MM/YYYY`, or `N/A` when missing or
/// unparseable.
pub fn format_display_date(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// The date 18 years before `today`. 29 February maps to 1 March when the
/// target year has no leap day.
pub fn eighteen_years_ago(today: NaiveDate) -> NaiveDate {
    let year = today.year() - 18;
    today
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(today)
}

/// Earliest accepted birthdate as a date.
pub fn min_birthdate() -> NaiveDate {
    let (y, m, d) = MIN_BIRTHDATE;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}
