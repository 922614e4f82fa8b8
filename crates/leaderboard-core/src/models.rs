use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::MonthKey;

// ── Input ─────────────────────────────────────────────────────────────────────

/// One puzzle from the collected snapshot.
///
/// Deserialization never rejects an object because of a field's type: text
/// fields holding numbers or booleans are stringified, anything else reads as
/// empty, and a non-string `solution_url` reads as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPuzzleRecord")]
pub struct PuzzleRecord {
    /// Human-readable month and year, e.g. `"March 2025"`.
    pub date_text: String,
    /// Puzzle title.
    pub name: String,
    /// Link to the published solution, when there is one.
    pub solution_url: Option<String>,
    /// Raw credit strings; one entry may name several people (`"A & B"`).
    ///
    /// The collector writes a string note or `null` when no list exists;
    /// both read as an empty list, and non-string members are dropped.
    pub solvers: Vec<String>,
    /// Length of the credit array as published, including members dropped
    /// from `solvers`.
    #[serde(skip_serializing)]
    pub credit_entries: usize,
}

impl PuzzleRecord {
    pub fn new(date_text: impl Into<String>, name: impl Into<String>, solvers: Vec<String>) -> Self {
        Self {
            date_text: date_text.into(),
            name: name.into(),
            solution_url: None,
            credit_entries: solvers.len(),
            solvers,
        }
    }
}

/// Wire shape of a snapshot element before type coercion.
#[derive(Deserialize)]
struct RawPuzzleRecord {
    #[serde(default)]
    date_text: Value,
    #[serde(default)]
    name: Value,
    #[serde(default)]
    solution_url: Value,
    #[serde(default)]
    solvers: Value,
}

impl From<RawPuzzleRecord> for PuzzleRecord {
    fn from(raw: RawPuzzleRecord) -> Self {
        let (solvers, credit_entries) = match raw.solvers {
            Value::Array(items) => {
                let total = items.len();
                let names = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect();
                (names, total)
            }
            _ => (Vec::new(), 0),
        };

        Self {
            date_text: lenient_text(raw.date_text),
            name: lenient_text(raw.name),
            solution_url: match raw.solution_url {
                Value::String(url) => Some(url),
                _ => None,
            },
            solvers,
            credit_entries,
        }
    }
}

fn lenient_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

// ── Per-solver state ──────────────────────────────────────────────────────────

/// A run of consecutive active months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    pub start: MonthKey,
    pub end: MonthKey,
    /// Number of months in the run, always at least 2.
    pub length: u32,
}

/// Everything accumulated about one solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverRecord {
    /// Normalized (trimmed, case-preserving) solver name.
    pub name: String,
    pub puzzles_solved: u32,
    /// Date text of the earliest credited puzzle.
    pub first_appearance: String,
    /// Date text of the latest credited puzzle.
    pub last_solve: String,
    /// Months with at least one credited puzzle.
    pub monthly_activity: BTreeMap<MonthKey, bool>,
    /// Detected streaks, longest first.
    pub streaks: Vec<Streak>,
}

impl SolverRecord {
    /// A fresh record first seen on a puzzle dated `date_text`.
    pub fn new(name: impl Into<String>, date_text: impl Into<String>) -> Self {
        let date_text = date_text.into();
        Self {
            name: name.into(),
            puzzles_solved: 0,
            first_appearance: date_text.clone(),
            last_solve: date_text,
            monthly_activity: BTreeMap::new(),
            streaks: Vec::new(),
        }
    }

    /// Active months in chronological order.
    pub fn active_months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.monthly_activity
            .iter()
            .filter(|(_, active)| **active)
            .map(|(month, _)| *month)
    }

    pub fn is_active_in(&self, month: &MonthKey) -> bool {
        self.monthly_activity.get(month).copied().unwrap_or(false)
    }

    /// The longest streak, if the solver has any.
    pub fn best_streak(&self) -> Option<&Streak> {
        self.streaks.first()
    }
}

// ── Output ────────────────────────────────────────────────────────────────────

/// One row of the global longest-streak ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakEntry {
    pub solver: String,
    pub length: u32,
    pub start: MonthKey,
    pub end: MonthKey,
}

/// A recent solver ranked by solve rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RisingStar {
    pub solver: String,
    pub puzzles_solved: u32,
    /// Puzzles per month since first appearance.
    pub solve_rate: f64,
    pub first_appearance: String,
}

/// Distinct active solvers in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyParticipation {
    pub month: MonthKey,
    pub solvers: usize,
}

/// Cumulative distinct solvers up to and including `month`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPoint {
    pub month: MonthKey,
    pub total_solvers: usize,
}

/// A puzzle ranked by how many credit entries it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleRanking {
    /// `"<year>-<month>"` with an unpadded month; not unique.
    pub id: String,
    pub name: String,
    pub solvers: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution_url: Option<String>,
}

/// Bookkeeping produced alongside the statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardMetadata {
    /// RFC 3339 timestamp of the computation.
    pub generated_at: String,
    /// "Today" as used for rising-star eligibility and date fallbacks.
    pub reference_date: NaiveDate,
    pub records_processed: usize,
    /// Individual solver credits after name splitting.
    pub solver_credits: usize,
    /// Date texts that could not be parsed and were placed at the reference date.
    pub parse_failures: Vec<String>,
    pub compute_time_seconds: f64,
}

/// The complete, immutable leaderboard snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResult {
    pub total_puzzles: usize,
    pub unique_solvers: usize,
    /// All solvers, most puzzles first.
    pub top_solvers: Vec<SolverRecord>,
    pub longest_streaks: Vec<StreakEntry>,
    pub rising_stars: Vec<RisingStar>,
    pub monthly_participation: Vec<MonthlyParticipation>,
    pub solvers_growth: Vec<GrowthPoint>,
    pub most_solved_puzzles: Vec<PuzzleRanking>,
    pub metadata: LeaderboardMetadata,
}

impl LeaderboardResult {
    /// Look up a solver by exact name.
    pub fn solver(&self, name: &str) -> Option<&SolverRecord> {
        self.top_solvers.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puzzle_record_deserializes_solver_list() {
        let json = r#"{
            "date_text": "March 2025",
            "name": "Robot Tug of War",
            "solution_url": "https://example.com/solution",
            "solvers": ["Alice", "Bob & Carol"]
        }"#;
        let record: PuzzleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date_text, "March 2025");
        assert_eq!(record.solvers, vec!["Alice", "Bob & Carol"]);
        assert_eq!(record.solution_url.as_deref(), Some("https://example.com/solution"));
    }

    #[test]
    fn test_puzzle_record_string_note_reads_as_empty() {
        let json = r#"{
            "date_text": "October 2015",
            "name": "Old Puzzle",
            "solution_url": null,
            "solvers": "Submissions not available before November 2015"
        }"#;
        let record: PuzzleRecord = serde_json::from_str(json).unwrap();
        assert!(record.solvers.is_empty());
        assert!(record.solution_url.is_none());
    }

    #[test]
    fn test_puzzle_record_null_and_missing_fields() {
        let record: PuzzleRecord =
            serde_json::from_str(r#"{"date_text": "May 2020", "name": null, "solvers": null}"#)
                .unwrap();
        assert_eq!(record.name, "");
        assert!(record.solvers.is_empty());

        let record: PuzzleRecord = serde_json::from_str(r#"{"date_text": "May 2020"}"#).unwrap();
        assert!(record.solvers.is_empty());

        let record: PuzzleRecord = serde_json::from_str(r#"{"name": "Undated"}"#).unwrap();
        assert_eq!(record.date_text, "");
    }

    #[test]
    fn test_puzzle_record_drops_non_string_members() {
        let record: PuzzleRecord = serde_json::from_str(
            r#"{"date_text": "May 2020", "name": "x", "solvers": ["Alice", null, 3, "Bob"]}"#,
        )
        .unwrap();
        assert_eq!(record.solvers, vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_puzzle_record_counts_raw_credit_entries() {
        let record: PuzzleRecord = serde_json::from_str(
            r#"{"date_text": "May 2020", "name": "x", "solvers": ["Alice", null, 3, "Bob"]}"#,
        )
        .unwrap();
        assert_eq!(record.credit_entries, 4);

        let record: PuzzleRecord =
            serde_json::from_str(r#"{"date_text": "May 2020", "solvers": "Not available"}"#)
                .unwrap();
        assert_eq!(record.credit_entries, 0);

        let built = PuzzleRecord::new("May 2020", "x", vec!["Alice & Bob".to_string()]);
        assert_eq!(built.credit_entries, 1);
    }

    #[test]
    fn test_puzzle_record_coerces_mistyped_fields() {
        let record: PuzzleRecord = serde_json::from_str(
            r#"{"date_text": 202401, "name": true, "solution_url": 5, "solvers": ["Alice"]}"#,
        )
        .unwrap();
        assert_eq!(record.date_text, "202401");
        assert_eq!(record.name, "true");
        assert!(record.solution_url.is_none());
        assert_eq!(record.solvers, vec!["Alice"]);

        let record: PuzzleRecord =
            serde_json::from_str(r#"{"date_text": {"month": 1}, "name": ["x"]}"#).unwrap();
        assert_eq!(record.date_text, "");
        assert_eq!(record.name, "");
    }

    #[test]
    fn test_puzzle_record_serializes_without_credit_count() {
        let value = serde_json::to_value(PuzzleRecord::new("May 2020", "x", Vec::new())).unwrap();
        assert!(value.get("credit_entries").is_none());
        assert_eq!(value["date_text"], "May 2020");
    }

    #[test]
    fn test_solver_record_new() {
        let record = SolverRecord::new("Alice", "June 2024");
        assert_eq!(record.puzzles_solved, 0);
        assert_eq!(record.first_appearance, "June 2024");
        assert_eq!(record.last_solve, "June 2024");
        assert!(record.best_streak().is_none());
    }

    #[test]
    fn test_solver_record_serializes_camel_case() {
        let mut record = SolverRecord::new("Alice", "June 2024");
        record.puzzles_solved = 1;
        record
            .monthly_activity
            .insert(MonthKey::new(2024, 6).unwrap(), true);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["puzzlesSolved"], 1);
        assert_eq!(value["firstAppearance"], "June 2024");
        assert_eq!(value["monthlyActivity"]["Jun 2024"], true);
    }

    #[test]
    fn test_active_months_are_chronological() {
        let mut record = SolverRecord::new("Alice", "March 2020");
        for key in ["Mar 2020", "Dec 2019", "Jan 2020"] {
            record.monthly_activity.insert(key.parse().unwrap(), true);
        }
        let months: Vec<String> = record.active_months().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["Dec 2019", "Jan 2020", "Mar 2020"]);
        assert!(record.is_active_in(&"Jan 2020".parse().unwrap()));
        assert!(!record.is_active_in(&"Feb 2020".parse().unwrap()));
    }
}
