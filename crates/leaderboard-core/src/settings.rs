use chrono::NaiveDate;
use clap::Parser;
use chrono_tz::Tz;
use std::path::PathBuf;

use crate::calendar::{resolve_timezone, today_in};
use crate::error::{LeaderboardError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Leaderboard statistics for a monthly puzzle archive
#[derive(Parser, Debug, Clone)]
#[command(
    name = "puzzle-leaderboard",
    about = "Leaderboard statistics for a monthly puzzle archive",
    version
)]
pub struct Settings {
    /// Puzzle snapshot (JSON array of puzzle records)
    #[arg(long, env = "LEADERBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "markdown", value_parser = ["markdown", "json", "summary"])]
    pub format: String,

    /// Write the report to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Number of rows in the champions table
    #[arg(long, default_value = "50", value_parser = clap::value_parser!(usize))]
    pub top: usize,

    /// Reference date (YYYY-MM-DD) for rising-star eligibility; defaults to today
    #[arg(long)]
    pub as_of: Option<String>,

    /// Timezone used to determine today's date (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse process arguments and apply [`resolve`](Self::resolve).
    pub fn load() -> Result<Self> {
        Self::parse().resolve()
    }

    /// Parse an explicit argument list (used by tests).
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
            .map_err(|e| LeaderboardError::Config(e.to_string()))?
            .resolve()
    }

    /// Resolve `"auto"` values, validate free-form fields and apply `--debug`.
    pub fn resolve(mut self) -> Result<Self> {
        let tz = resolve_timezone(&self.timezone)?;
        self.timezone = tz.name().to_string();

        if let Some(as_of) = &self.as_of {
            parse_reference_date(as_of)?;
        }

        if self.top == 0 {
            return Err(LeaderboardError::Config("--top must be at least 1".to_string()));
        }

        if self.debug {
            self.log_level = "DEBUG".to_string();
        }

        Ok(self)
    }

    /// The resolved timezone. Falls back to UTC for an unresolved name.
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    /// The pinned reference date, or `None` to follow the wall clock.
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.as_of
            .as_deref()
            .and_then(|s| parse_reference_date(s).ok())
    }

    /// The date rising stars are measured against right now.
    pub fn effective_today(&self) -> NaiveDate {
        self.reference_date().unwrap_or_else(|| today_in(self.tz()))
    }
}

/// Parse a `YYYY-MM-DD` reference date.
pub fn parse_reference_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LeaderboardError::InvalidDate(s.to_string()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["puzzle-leaderboard"]);

        assert!(settings.output.is_none());
        assert_eq!(settings.format, "markdown");
        assert_eq!(settings.top, 50);
        assert!(settings.as_of.is_none());
        assert_eq!(settings.timezone, "auto");
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_data_path() {
        let settings = Settings::parse_from(["puzzle-leaderboard", "--data", "/tmp/data.json"]);
        assert_eq!(settings.data, Some(PathBuf::from("/tmp/data.json")));
    }

    #[test]
    fn test_settings_rejects_unknown_format() {
        assert!(Settings::try_parse_from(["puzzle-leaderboard", "--format", "html"]).is_err());
    }

    #[test]
    fn test_resolve_named_timezone() {
        let settings = Settings::load_from_args([
            "puzzle-leaderboard",
            "--timezone",
            "America/New_York",
        ])
        .unwrap();
        assert_eq!(settings.timezone, "America/New_York");
        assert_eq!(settings.tz(), Tz::America__New_York);
    }

    #[test]
    fn test_resolve_invalid_timezone() {
        let err = Settings::load_from_args(["puzzle-leaderboard", "--timezone", "Nowhere/Land"])
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidTimezone(_)));
    }

    #[test]
    fn test_resolve_debug_overrides_log_level() {
        let settings = Settings::load_from_args([
            "puzzle-leaderboard",
            "--timezone",
            "UTC",
            "--debug",
        ])
        .unwrap();
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_resolve_rejects_zero_top() {
        let err = Settings::load_from_args(["puzzle-leaderboard", "--timezone", "UTC", "--top", "0"])
            .unwrap_err();
        assert!(matches!(err, LeaderboardError::Config(_)));
    }

    #[test]
    fn test_as_of_pins_reference_date() {
        let settings = Settings::load_from_args([
            "puzzle-leaderboard",
            "--timezone",
            "UTC",
            "--as-of",
            "2025-06-15",
        ])
        .unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert_eq!(settings.reference_date(), Some(expected));
        assert_eq!(settings.effective_today(), expected);
    }

    #[test]
    fn test_invalid_as_of_is_rejected() {
        let err = Settings::load_from_args([
            "puzzle-leaderboard",
            "--timezone",
            "UTC",
            "--as-of",
            "June 2025",
        ])
        .unwrap_err();
        assert!(matches!(err, LeaderboardError::InvalidDate(_)));
    }
}
