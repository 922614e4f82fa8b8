//! Markdown leaderboard page.
//!
//! Sections: overview, champions, consistency streaks, rising stars, most
//! solved puzzles, monthly participation and solver growth. Empty rankings
//! render a short placeholder line instead of an empty table.

use std::fmt::Write;

use leaderboard_core::calendar::MonthCalendar;
use leaderboard_core::formatting::{format_count, format_months, format_solve_rate};
use leaderboard_core::models::LeaderboardResult;

use crate::{short_month, ReportOptions};

/// Render the full Markdown page.
pub fn render_markdown(result: &LeaderboardResult, options: &ReportOptions) -> String {
    let mut md = String::new();
    let mut calendar = MonthCalendar::new(result.metadata.reference_date);
    write_overview(&mut md, result, options, &mut calendar);
    write_champions(&mut md, result, options.top, &mut calendar);
    write_streaks(&mut md, result);
    write_rising_stars(&mut md, result, &mut calendar);
    write_most_solved(&mut md, result);
    write_participation(&mut md, result);
    write_growth(&mut md, result);
    md
}

// ── Sections ──────────────────────────────────────────────────────────────────

fn write_overview(
    md: &mut String,
    result: &LeaderboardResult,
    options: &ReportOptions,
    calendar: &mut MonthCalendar,
) {
    let updated = options.updated.unwrap_or(result.metadata.reference_date);
    let _ = writeln!(md, "# {}\n", options.title);
    let _ = writeln!(md, "## Overview\n");
    let _ = writeln!(md, "*Last updated: {}*\n", updated.format("%Y-%m-%d"));
    let _ = writeln!(md, "- **Puzzles Published**: {}", format_count(result.total_puzzles));
    let _ = writeln!(md, "- **Unique Solvers**: {}", format_count(result.unique_solvers));
    if !result.metadata.parse_failures.is_empty() {
        let _ = writeln!(
            md,
            "- **Undated Puzzles**: {} (counted in {})",
            result.metadata.parse_failures.len(),
            calendar.format_month_key(result.metadata.reference_date)
        );
    }
}

fn write_champions(
    md: &mut String,
    result: &LeaderboardResult,
    top: usize,
    calendar: &mut MonthCalendar,
) {
    let _ = writeln!(md, "\n## Puzzle-Solving Champions\n");
    if result.top_solvers.is_empty() {
        let _ = writeln!(md, "_No solvers yet._");
        return;
    }
    let _ = writeln!(md, "These solvers have completed the most puzzles:\n");
    let _ = writeln!(md, "| Rank | Solver | Puzzles Solved | First Appeared | Most Recent Solve |");
    let _ = writeln!(md, "|------|--------|----------------|----------------|-------------------|");
    for (i, solver) in result.top_solvers.iter().take(top).enumerate() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} |",
            i + 1,
            escape_cell(&solver.name),
            solver.puzzles_solved,
            short_month(calendar, &solver.first_appearance),
            short_month(calendar, &solver.last_solve)
        );
    }
}

fn write_streaks(md: &mut String, result: &LeaderboardResult) {
    let _ = writeln!(md, "\n## Consistency Streaks\n");
    if result.longest_streaks.is_empty() {
        let _ = writeln!(md, "_No solver has solved puzzles in consecutive months yet._");
        return;
    }
    let _ = writeln!(md, "The longest runs of consecutive monthly solves:\n");
    let _ = writeln!(md, "| Rank | Solver | Streak Length | Start | End |");
    let _ = writeln!(md, "|------|--------|---------------|-------|-----|");
    for (i, streak) in result.longest_streaks.iter().enumerate() {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} | {} |",
            i + 1,
            escape_cell(&streak.solver),
            format_months(streak.length),
            streak.start,
            streak.end
        );
    }
}

fn write_rising_stars(md: &mut String, result: &LeaderboardResult, calendar: &mut MonthCalendar) {
    if result.rising_stars.is_empty() {
        return;
    }
    let _ = writeln!(md, "\n## Rising Stars\n");
    let _ = writeln!(
        md,
        "Solvers who started within the past year, ranked by puzzles solved per month since their first appearance.\n"
    );
    let _ = writeln!(md, "| Solver | Puzzles Solved | Solve Rate | First Appearance |");
    let _ = writeln!(md, "|--------|----------------|------------|------------------|");
    for star in &result.rising_stars {
        let _ = writeln!(
            md,
            "| {} | {} | {} | {} |",
            escape_cell(&star.solver),
            star.puzzles_solved,
            format_solve_rate(star.solve_rate),
            short_month(calendar, &star.first_appearance)
        );
    }
}

fn write_most_solved(md: &mut String, result: &LeaderboardResult) {
    if result.most_solved_puzzles.is_empty() {
        return;
    }
    let _ = writeln!(md, "\n## Most Solved Puzzles\n");
    let _ = writeln!(md, "| Puzzle | Month | Solvers |");
    let _ = writeln!(md, "|--------|-------|---------|");
    for puzzle in &result.most_solved_puzzles {
        let name = escape_cell(&puzzle.name);
        let title = match &puzzle.solution_url {
            Some(url) => format!("[{}]({})", name, url),
            None => name,
        };
        let _ = writeln!(md, "| {} | {} | {} |", title, puzzle.id, puzzle.solvers);
    }
}

fn write_participation(md: &mut String, result: &LeaderboardResult) {
    if result.monthly_participation.is_empty() {
        return;
    }
    let _ = writeln!(md, "\n## Monthly Participation\n");
    let _ = writeln!(md, "| Month | Active Solvers |");
    let _ = writeln!(md, "|-------|----------------|");
    for point in &result.monthly_participation {
        let _ = writeln!(md, "| {} | {} |", point.month, format_count(point.solvers));
    }
}

fn write_growth(md: &mut String, result: &LeaderboardResult) {
    let (Some(first), Some(last)) = (result.solvers_growth.first(), result.solvers_growth.last()) else {
        return;
    };
    let _ = writeln!(md, "\n## Solver Growth\n");
    let _ = writeln!(
        md,
        "From {} solver{} in {} to {} by {}.",
        format_count(first.total_solvers),
        if first.total_solvers == 1 { "" } else { "s" },
        first.month,
        format_count(last.total_solvers),
        last.month
    );
}

/// Escape characters that would break a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_result;

    #[test]
    fn test_overview_counts() {
        let md = render_markdown(&sample_result(), &ReportOptions::default());
        assert!(md.starts_with("# Puzzle Leaderboard\n"));
        assert!(md.contains("*Last updated: 2026-04-15*"));
        assert!(md.contains("- **Puzzles Published**: 4"));
        assert!(md.contains("- **Unique Solvers**: 4"));
        assert!(!md.contains("Undated Puzzles"));
    }

    #[test]
    fn test_champions_table_rows() {
        let md = render_markdown(&sample_result(), &ReportOptions::default());
        assert!(md.contains("| 1 | Alice | 3 | Jan 2026 | Mar 2026 |"));
        assert!(md.contains("| 2 | Bob | 2 | Jan 2026 | Feb 2026 |"));
    }

    #[test]
    fn test_champions_table_respects_top() {
        let options = ReportOptions {
            top: 1,
            ..Default::default()
        };
        let md = render_markdown(&sample_result(), &options);
        assert!(md.contains("| 1 | Alice | 3 | Jan 2026 | Mar 2026 |"));
        assert!(!md.contains("| 2 | Bob | 2 | Jan 2026 | Feb 2026 |"));
    }

    #[test]
    fn test_streaks_and_rising_stars() {
        let md = render_markdown(&sample_result(), &ReportOptions::default());
        assert!(md.contains("| 1 | Alice | 3 months | Jan 2026 | Mar 2026 |"));
        assert!(md.contains("| 2 | Bob | 2 months | Jan 2026 | Feb 2026 |"));
        assert!(md.contains("| Alice | 3 | 1.00 puzzles/month | Jan 2026 |"));
    }

    #[test]
    fn test_most_solved_links_and_escapes() {
        let md = render_markdown(&sample_result(), &ReportOptions::default());
        assert!(md.contains("| [Robot Tug](https://example.com/robot-tug) | 2026-2 | 2 |"));
        assert!(md.contains("| Some \\| Pipes | 2026-3 | 1 |"));
    }

    #[test]
    fn test_series_sections() {
        let md = render_markdown(&sample_result(), &ReportOptions::default());
        assert!(md.contains("| Jan 2026 | 3 |"));
        assert!(md.contains("From 1 solver in Dec 2020 to 4 by Mar 2026."));
    }

    #[test]
    fn test_empty_result_renders_placeholders() {
        let empty = leaderboard_data::analysis::build_leaderboard(
            &[],
            chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        );
        let md = render_markdown(&empty, &ReportOptions::default());
        assert!(md.contains("_No solvers yet._"));
        assert!(!md.contains("## Rising Stars"));
        assert!(!md.contains("## Solver Growth"));
    }

    #[test]
    fn test_overview_reports_undated_puzzles() {
        let records = vec![
            leaderboard_core::models::PuzzleRecord::new("Smarch 2020", "Bad", vec!["Alice".into()]),
            leaderboard_core::models::PuzzleRecord::new("May 2020", "Good", vec!["Alice".into()]),
        ];
        let result = leaderboard_data::analysis::build_leaderboard(
            &records,
            chrono::NaiveDate::from_ymd_opt(2026, 1, 9).unwrap(),
        );
        let md = render_markdown(&result, &ReportOptions::default());
        assert!(md.contains("- **Undated Puzzles**: 1 (counted in Jan 2026)"));
        // The raw text is shown where it cannot be shortened.
        assert!(md.contains("| 1 | Alice | 2 | May 2020 | Smarch 2020 |"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("line\nbreak"), "line break");
    }
}
