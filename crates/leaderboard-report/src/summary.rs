//! Plain-text summary for terminals and logs.

use std::fmt::Write;

use leaderboard_core::formatting::{format_count, format_months, format_solve_rate};
use leaderboard_core::models::LeaderboardResult;

/// Number of entries listed per ranking.
const SUMMARY_ROWS: usize = 5;

pub fn render_summary(result: &LeaderboardResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} puzzles, {} unique solvers (as of {})",
        format_count(result.total_puzzles),
        format_count(result.unique_solvers),
        result.metadata.reference_date.format("%Y-%m-%d")
    );

    if !result.top_solvers.is_empty() {
        let _ = writeln!(out, "\nTop solvers:");
        for (i, solver) in result.top_solvers.iter().take(SUMMARY_ROWS).enumerate() {
            let _ = writeln!(out, "  {:>2}. {} ({})", i + 1, solver.name, solver.puzzles_solved);
        }
    }

    if let Some(streak) = result.longest_streaks.first() {
        let _ = writeln!(
            out,
            "\nLongest streak: {}, {} ({} to {})",
            streak.solver,
            format_months(streak.length),
            streak.start,
            streak.end
        );
    }

    if !result.rising_stars.is_empty() {
        let _ = writeln!(out, "\nRising stars:");
        for star in result.rising_stars.iter().take(SUMMARY_ROWS) {
            let _ = writeln!(out, "  {} ({})", star.solver, format_solve_rate(star.solve_rate));
        }
    }

    if let Some(puzzle) = result.most_solved_puzzles.first() {
        let _ = writeln!(
            out,
            "\nMost solved: {} ({} solvers)",
            puzzle.name, puzzle.solvers
        );
    }

    if !result.metadata.parse_failures.is_empty() {
        let _ = writeln!(
            out,
            "\nUnparsed dates: {}",
            result.metadata.parse_failures.join(", ")
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_result;

    #[test]
    fn test_summary_lines() {
        let text = render_summary(&sample_result());
        assert!(text.starts_with("4 puzzles, 4 unique solvers (as of 2026-04-15)\n"));
        assert!(text.contains("   1. Alice (3)"));
        assert!(text.contains("Longest streak: Alice, 3 months (Jan 2026 to Mar 2026)"));
        assert!(text.contains("  Alice (1.00 puzzles/month)"));
        assert!(text.contains("Most solved: Knight Moves (2 solvers)"));
        assert!(!text.contains("Unparsed dates"));
    }

    #[test]
    fn test_summary_reports_parse_failures() {
        let records = vec![leaderboard_core::models::PuzzleRecord::new(
            "Smarch 2020",
            "Bad",
            vec!["Alice".to_string()],
        )];
        let result = leaderboard_data::analysis::build_leaderboard(
            &records,
            chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        let text = render_summary(&result);
        assert!(text.contains("Unparsed dates: Smarch 2020"));
    }
}
