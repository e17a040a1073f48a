// Publish-date resolution. Listing pages expose dates in wildly inconsistent
// formats and places (a dedicated date field, or free text somewhere in the
// container), so parsing is layered: relative phrases first, then numeric
// patterns, then month-name text. Every function takes an explicit `now`.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3})\s*(day|days|hour|hours|hr|hrs)\s+ago\b").expect("valid regex")
});

/// Day-month-year with `/`, `-` or `.` separators, e.g. "15/03/2024".
static DMY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[./-](\d{1,2})[./-](\d{4})\b").expect("valid regex"));

/// Year-month-day with `/`, `-` or `.` separators, e.g. "2024-03-15".
static YMD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})[./-](\d{1,2})[./-](\d{1,2})\b").expect("valid regex"));

/// "15 March 2024", "3rd Feb, 2024", "15 Sept 2024".
static DAY_MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?:st|nd|rd|th)?\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+(\d{4})\b",
    )
    .expect("valid regex")
});

/// "March 15, 2024", "Mar 15 2024".
static MONTH_DAY_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b",
    )
    .expect("valid regex")
});

/// Parse "today", "yesterday", "<n> day(s) ago" and "<n> hour(s)/hr(s) ago",
/// offset from `now`.
pub fn parse_relative_date(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let lowered = text.to_lowercase();
    if lowered.contains("today") {
        return Some(now);
    }
    if lowered.contains("yesterday") {
        return Some(now - Duration::days(1));
    }
    let caps = RELATIVE_RE.captures(&lowered)?;
    let amount: i64 = caps[1].parse().ok()?;
    if caps[2].starts_with("day") {
        Some(now - Duration::days(amount))
    } else {
        Some(now - Duration::hours(amount))
    }
}

/// Parse an absolute date embedded in `text`: day-month-year numerics first,
/// then year-month-day, then month-name forms. Resolves to midnight UTC.
/// Numeric years before 2000 are rejected as noise (phone numbers, ids).
pub fn parse_absolute_date(text: &str) -> Option<DateTime<Utc>> {
    if let Some(caps) = DMY_RE.captures(text) {
        let (day, month, year) = (parse_u32(&caps[1]), parse_u32(&caps[2]), parse_i32(&caps[3]));
        if let Some(date) = valid_numeric_date(year, month, day) {
            return midnight_utc(date);
        }
    }
    if let Some(caps) = YMD_RE.captures(text) {
        let (year, month, day) = (parse_i32(&caps[1]), parse_u32(&caps[2]), parse_u32(&caps[3]));
        if let Some(date) = valid_numeric_date(year, month, day) {
            return midnight_utc(date);
        }
    }
    if let Some(caps) = DAY_MONTH_YEAR_RE.captures(text) {
        let day = parse_u32(&caps[1]);
        let month = month_from_prefix(&caps[2])?;
        let year = parse_i32(&caps[3]);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return midnight_utc(date);
        }
    }
    if let Some(caps) = MONTH_DAY_YEAR_RE.captures(text) {
        let month = month_from_prefix(&caps[1])?;
        let day = parse_u32(&caps[2]);
        let year = parse_i32(&caps[3]);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return midnight_utc(date);
        }
    }
    None
}

/// Resolve a listing's publish date: relative then absolute on the primary
/// date text, then relative then absolute on the fallback text. First
/// success wins, so an explicit "2 days ago" beats a stray date elsewhere
/// in the container.
pub fn parse_published_date(
    date_text: &str,
    fallback_text: &str,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    parse_relative_date(date_text, now)
        .or_else(|| parse_absolute_date(date_text))
        .or_else(|| parse_relative_date(fallback_text, now))
        .or_else(|| parse_absolute_date(fallback_text))
}

/// A date is inside the lookback window when it is at most `lookback_days`
/// old and at most one day in the future. The future slack tolerates clock
/// skew and timezone quirks on the scraped sites.
pub fn is_within_lookback(date: DateTime<Utc>, lookback_days: i64, now: DateTime<Utc>) -> bool {
    let age = now - date;
    age >= Duration::days(-1) && age <= Duration::days(lookback_days)
}

fn parse_u32(digits: &str) -> u32 {
    digits.parse().unwrap_or(0)
}

fn parse_i32(digits: &str) -> i32 {
    digits.parse().unwrap_or(0)
}

fn valid_numeric_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if year < 2000 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn month_from_prefix(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}
