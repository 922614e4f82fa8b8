//! Report rendering for the puzzle leaderboard.
//!
//! Every renderer reads an immutable [`LeaderboardResult`]; none of them
//! recompute statistics.

pub mod markdown;
pub mod summary;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use leaderboard_core::calendar::{parse_month_year_strict, MonthCalendar};
use leaderboard_core::error::{LeaderboardError, Result};
use leaderboard_core::models::LeaderboardResult;

pub use leaderboard_core as core;

// ── ReportFormat ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
    Summary,
}

impl FromStr for ReportFormat {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "summary" => Ok(Self::Summary),
            other => Err(LeaderboardError::Config(format!(
                "unknown report format '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Summary => "summary",
        })
    }
}

// ── ReportOptions ─────────────────────────────────────────────────────────────

/// Presentation knobs shared by the renderers.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Rows in the champions table.
    pub top: usize,
    /// Date printed as "last updated"; defaults to the result's reference date.
    pub updated: Option<NaiveDate>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Puzzle Leaderboard".to_string(),
            top: 50,
            updated: None,
        }
    }
}

/// Render `result` in the requested format.
pub fn render(result: &LeaderboardResult, format: ReportFormat, options: &ReportOptions) -> Result<String> {
    let output = match format {
        ReportFormat::Markdown => markdown::render_markdown(result, options),
        ReportFormat::Json => render_json(result)?,
        ReportFormat::Summary => summary::render_summary(result),
    };
    tracing::debug!(%format, bytes = output.len(), "report rendered");
    Ok(output)
}

/// Pretty-printed JSON of the full result.
pub fn render_json(result: &LeaderboardResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

/// Short `"Mon YYYY"` form of a puzzle date text, or the text itself when it
/// does not parse.
pub(crate) fn short_month(calendar: &mut MonthCalendar, date_text: &str) -> String {
    match parse_month_year_strict(date_text) {
        Some(date) => calendar.format_month_key(date),
        None if date_text.trim().is_empty() => "N/A".to_string(),
        None => date_text.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
