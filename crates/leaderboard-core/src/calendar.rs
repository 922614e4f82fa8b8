//! Month-granularity date handling for puzzle records.
//!
//! Puzzle dates arrive as `"March 2025"` style strings. [`MonthCalendar`]
//! parses them (with a per-string cache and a logged fallback to "today"),
//! and [`MonthKey`] is the chronologically ordered bucket used for activity
//! tracking, rendered as `"Mar 2025"`.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::error::LeaderboardError;

/// `strftime` pattern of a rendered month key, e.g. `"Jan 2023"`.
pub const MONTH_KEY_FORMAT: &str = "%b %Y";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ── MonthKey ──────────────────────────────────────────────────────────────────

/// A calendar month. Ordering is chronological (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a key, returning `None` unless `month` is in `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, `1..=12`.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Signed number of calendar months from `self` to `other`.
    ///
    /// `Jan 2020 → Feb 2020` is `1`, `Dec 2019 → Jan 2020` is `1`.
    pub fn months_until(&self, other: &MonthKey) -> i64 {
        other.index() - self.index()
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbr = MONTH_ABBREVIATIONS[(self.month - 1) as usize];
        write!(f, "{} {:04}", abbr, self.year)
    }
}

impl FromStr for MonthKey {
    type Err = LeaderboardError;

    /// Parse the `"<Mon> <YYYY>"` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LeaderboardError::InvalidDate(s.to_string());
        let (abbr, year) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(abbr))
            .ok_or_else(invalid)?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;
        Ok(Self {
            year,
            month: month as u32 + 1,
        })
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Parse `"<FullMonthName> <YYYY>"` to the first day of that month.
///
/// Abbreviated month names are accepted as well. Returns `None` for anything
/// else; use [`MonthCalendar::parse_month_year`] for the cached, fallback
/// variant.
pub fn parse_month_year_strict(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("1 {}", trimmed), "%d %B %Y").ok()
}

/// Whole calendar months elapsed from `from` to `to`.
///
/// A partial month does not count: `2024-01-15 → 2024-02-14` is `0`.
/// Negative when `to` precedes `from`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let raw = i64::from(to.year() - from.year()) * 12 + i64::from(to.month())
        - i64::from(from.month());
    if raw > 0 && to.day() < from.day() {
        raw - 1
    } else if raw < 0 && to.day() > from.day() {
        raw + 1
    } else {
        raw
    }
}

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve a timezone name, treating `"auto"` as the system timezone.
///
/// `"auto"` never fails: a system zone unknown to `chrono-tz` becomes UTC.
pub fn resolve_timezone(name: &str) -> crate::error::Result<Tz> {
    if name.eq_ignore_ascii_case("auto") {
        let system = get_system_timezone();
        return Ok(system.parse::<Tz>().unwrap_or_else(|_| {
            warn!("Unknown system time zone \"{}\", using UTC", system);
            Tz::UTC
        }));
    }
    name.parse::<Tz>()
        .map_err(|_| LeaderboardError::InvalidTimezone(name.to_string()))
}

/// The current calendar date in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

// ── MonthCalendar ─────────────────────────────────────────────────────────────

/// Caching parser/formatter for puzzle dates.
///
/// `today` is both the fallback for unparsable text and the reference point
/// for "recent" computations downstream.
#[derive(Debug, Clone)]
pub struct MonthCalendar {
    today: NaiveDate,
    parsed: HashMap<String, NaiveDate>,
    formatted: HashMap<NaiveDate, String>,
    failures: Vec<String>,
}

impl MonthCalendar {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            parsed: HashMap::new(),
            formatted: HashMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Parse a puzzle date, caching the result per input string.
    ///
    /// Unparsable text is logged, recorded in [`failures`](Self::failures)
    /// and mapped to `today`.
    pub fn parse_month_year(&mut self, text: &str) -> NaiveDate {
        if let Some(date) = self.parsed.get(text) {
            return *date;
        }

        let date = match parse_month_year_strict(text) {
            Some(date) => date,
            None => {
                warn!(
                    "MonthCalendar: could not parse date \"{}\", using {}",
                    text, self.today
                );
                self.failures.push(text.to_string());
                self.today
            }
        };

        self.parsed.insert(text.to_string(), date);
        date
    }

    /// Render `date` as a month key string (`"Jan 2023"`), cached per date.
    pub fn format_month_key(&mut self, date: NaiveDate) -> String {
        self.formatted
            .entry(date)
            .or_insert_with(|| date.format(MONTH_KEY_FORMAT).to_string())
            .clone()
    }

    /// Parse `text` and return the month it falls in.
    pub fn month_key(&mut self, text: &str) -> MonthKey {
        MonthKey::from_date(self.parse_month_year(text))
    }

    /// Distinct date strings that failed to parse, in first-seen order.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Number of distinct date strings parsed so far.
    pub fn cached_dates(&self) -> usize {
        self.parsed.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
