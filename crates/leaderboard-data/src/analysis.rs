//! Leaderboard analysis pipeline.
//!
//! Runs accumulation, streak detection, rising-star scoring, the monthly
//! series and the most-solved ranking, returning a [`LeaderboardResult`]
//! ready for the report layer.

use std::collections::{BTreeSet, HashMap};

use chrono::{Months, NaiveDate, Utc};
use leaderboard_core::calendar::{months_between, MonthCalendar, MonthKey};
use leaderboard_core::models::{
    GrowthPoint, LeaderboardMetadata, LeaderboardResult, MonthlyParticipation, PuzzleRanking,
    PuzzleRecord, RisingStar, SolverRecord, Streak, StreakEntry,
};
use tracing::debug;

use crate::aggregator::SolverAggregator;

// ── AnalysisConfig ────────────────────────────────────────────────────────────

/// Ranking and sampling policy for [`build_leaderboard_with`].
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Length of the streak, rising-star and most-solved rankings.
    pub top_limit: usize,
    /// How far back a first appearance may be to count as a rising star.
    pub rising_star_window_months: u32,
    /// Minimum puzzles for rising-star eligibility.
    pub rising_star_min_puzzles: u32,
    /// Participation series longer than this is decimated.
    pub participation_sample_threshold: usize,
    /// Keep every n-th month when decimating.
    pub participation_sample_stride: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_limit: 20,
            rising_star_window_months: 12,
            rising_star_min_puzzles: 3,
            participation_sample_threshold: 48,
            participation_sample_stride: 3,
        }
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run the full pipeline with the default [`AnalysisConfig`].
///
/// `today` is the reference date for rising stars and the fallback for
/// unparsable puzzle dates.
pub fn build_leaderboard(records: &[PuzzleRecord], today: NaiveDate) -> LeaderboardResult {
    build_leaderboard_with(records, today, &AnalysisConfig::default())
}

/// Run the full pipeline.
///
/// 1. Accumulate per-solver records.
/// 2. Score rising stars.
/// 3. Rank solvers and detect their streaks.
/// 4. Build the participation and growth series.
/// 5. Rank the most-solved puzzles.
pub fn build_leaderboard_with(
    records: &[PuzzleRecord],
    today: NaiveDate,
    config: &AnalysisConfig,
) -> LeaderboardResult {
    let started = std::time::Instant::now();
    let mut calendar = MonthCalendar::new(today);

    // ── Step 1: Accumulate ────────────────────────────────────────────────────
    let aggregated = SolverAggregator::aggregate(records, &mut calendar);
    debug!(
        records = aggregated.records,
        solvers = aggregated.solvers.len(),
        months = aggregated.months.len(),
        "solver accumulation complete"
    );

    // ── Step 2: Rising stars (first-seen order) ──────────────────────────────
    let rising_stars = rising_stars(&aggregated.solvers, &mut calendar, config);

    // ── Step 3: Rank + streaks ────────────────────────────────────────────────
    let mut top_solvers = rank_solvers(aggregated.solvers);
    for solver in &mut top_solvers {
        solver.streaks = detect_streaks(solver.active_months());
    }
    let longest_streaks = longest_streaks(&top_solvers, config.top_limit);

    // ── Step 4: Series ────────────────────────────────────────────────────────
    let monthly_participation = monthly_participation(&aggregated.months, &top_solvers, config);
    let solvers_growth = solvers_growth(&aggregated.months, &top_solvers, &mut calendar);

    // ── Step 5: Most-solved puzzles ───────────────────────────────────────────
    let most_solved_puzzles = most_solved_puzzles(records, &mut calendar, config.top_limit);

    let metadata = LeaderboardMetadata {
        generated_at: Utc::now().to_rfc3339(),
        reference_date: today,
        records_processed: aggregated.records,
        solver_credits: aggregated.credits,
        parse_failures: calendar.failures().to_vec(),
        compute_time_seconds: started.elapsed().as_secs_f64(),
    };

    debug!(
        solvers = top_solvers.len(),
        streaks = longest_streaks.len(),
        rising_stars = rising_stars.len(),
        parse_failures = metadata.parse_failures.len(),
        "leaderboard computed in {:.3}s",
        metadata.compute_time_seconds
    );

    LeaderboardResult {
        total_puzzles: records.len(),
        unique_solvers: top_solvers.len(),
        top_solvers,
        longest_streaks,
        rising_stars,
        monthly_participation,
        solvers_growth,
        most_solved_puzzles,
        metadata,
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

/// Order solvers by puzzles solved, most first; ties keep their input order.
pub fn rank_solvers(mut solvers: Vec<SolverRecord>) -> Vec<SolverRecord> {
    solvers.sort_by(|a, b| b.puzzles_solved.cmp(&a.puzzles_solved));
    solvers
}

/// Find runs of consecutive months among `months`.
///
/// Input order does not matter and duplicates are ignored. Only runs of two
/// or more months are returned, longest first (earlier runs first on ties).
pub fn detect_streaks(months: impl IntoIterator<Item = MonthKey>) -> Vec<Streak> {
    let sorted: BTreeSet<MonthKey> = months.into_iter().collect();
    let mut streaks = Vec::new();
    let mut iter = sorted.into_iter();

    let Some(first) = iter.next() else {
        return streaks;
    };
    let mut current = Streak {
        start: first,
        end: first,
        length: 1,
    };

    for month in iter {
        if current.end.months_until(&month) == 1 {
            current.end = month;
            current.length += 1;
        } else {
            if current.length >= 2 {
                streaks.push(current);
            }
            current = Streak {
                start: month,
                end: month,
                length: 1,
            };
        }
    }
    if current.length >= 2 {
        streaks.push(current);
    }

    streaks.sort_by(|a, b| b.length.cmp(&a.length));
    streaks
}

/// Best streak of each solver, longest first, truncated to `limit`.
///
/// `ranked` must already be in top-solver order; equal lengths keep it.
pub fn longest_streaks(ranked: &[SolverRecord], limit: usize) -> Vec<StreakEntry> {
    let mut entries: Vec<StreakEntry> = ranked
        .iter()
        .filter_map(|solver| {
            solver.best_streak().map(|streak| StreakEntry {
                solver: solver.name.clone(),
                length: streak.length,
                start: streak.start,
                end: streak.end,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.length.cmp(&a.length));
    entries.truncate(limit);
    entries
}

/// Recent solvers with enough puzzles, ranked by puzzles per month.
///
/// `solvers` should be in first-seen order; equal rates keep it.
///
/// A solver is eligible when their first appearance is no earlier than
/// `rising_star_window_months` before the calendar's today and they have at
/// least `rising_star_min_puzzles`. The rate divides by the whole months
/// since first appearance, floored at one.
pub fn rising_stars(
    solvers: &[SolverRecord],
    calendar: &mut MonthCalendar,
    config: &AnalysisConfig,
) -> Vec<RisingStar> {
    let today = calendar.today();
    let cutoff = today
        .checked_sub_months(Months::new(config.rising_star_window_months))
        .unwrap_or(NaiveDate::MIN);

    let mut stars: Vec<RisingStar> = solvers
        .iter()
        .filter(|solver| solver.puzzles_solved >= config.rising_star_min_puzzles)
        .filter_map(|solver| {
            let first = calendar.parse_month_year(&solver.first_appearance);
            if first < cutoff {
                return None;
            }
            let months = months_between(first, today).max(1);
            Some(RisingStar {
                solver: solver.name.clone(),
                puzzles_solved: solver.puzzles_solved,
                solve_rate: f64::from(solver.puzzles_solved) / months as f64,
                first_appearance: solver.first_appearance.clone(),
            })
        })
        .collect();

    stars.sort_by(|a, b| b.solve_rate.total_cmp(&a.solve_rate));
    stars.truncate(config.top_limit);
    stars
}

/// Keep every `stride`-th month plus the last one when `months` is longer
/// than `threshold`; otherwise return all of them.
pub fn sample_months(months: &[MonthKey], threshold: usize, stride: usize) -> Vec<MonthKey> {
    if months.len() <= threshold || stride <= 1 {
        return months.to_vec();
    }
    let last = months.len() - 1;
    months
        .iter()
        .enumerate()
        .filter(|(i, _)| i % stride == 0 || *i == last)
        .map(|(_, m)| *m)
        .collect()
}

/// Active solver count for each (sampled) month, chronologically.
pub fn monthly_participation(
    months: &BTreeSet<MonthKey>,
    solvers: &[SolverRecord],
    config: &AnalysisConfig,
) -> Vec<MonthlyParticipation> {
    let mut active: HashMap<MonthKey, usize> = HashMap::new();
    for solver in solvers {
        for month in solver.active_months() {
            *active.entry(month).or_default() += 1;
        }
    }

    let all: Vec<MonthKey> = months.iter().copied().collect();
    sample_months(
        &all,
        config.participation_sample_threshold,
        config.participation_sample_stride,
    )
    .into_iter()
    .map(|month| MonthlyParticipation {
        month,
        solvers: active.get(&month).copied().unwrap_or(0),
    })
    .collect()
}

/// Cumulative distinct solvers for every month, chronologically.
///
/// The final point always equals the number of solvers.
pub fn solvers_growth(
    months: &BTreeSet<MonthKey>,
    solvers: &[SolverRecord],
    calendar: &mut MonthCalendar,
) -> Vec<GrowthPoint> {
    let mut newcomers: HashMap<MonthKey, usize> = HashMap::new();
    for solver in solvers {
        *newcomers
            .entry(calendar.month_key(&solver.first_appearance))
            .or_default() += 1;
    }

    let mut total = 0usize;
    let mut points: Vec<GrowthPoint> = months
        .iter()
        .map(|month| {
            total += newcomers.get(month).copied().unwrap_or(0);
            GrowthPoint {
                month: *month,
                total_solvers: total,
            }
        })
        .collect();

    if let Some(last) = points.last_mut() {
        if last.total_solvers != solvers.len() {
            debug!(
                accumulated = last.total_solvers,
                actual = solvers.len(),
                "clamping final growth point"
            );
            last.total_solvers = solvers.len();
        }
    }

    points
}

/// Puzzles with the most credit entries, in input order on ties.
///
/// Counts every published credit entry, including ones that carried no
/// usable name.
pub fn most_solved_puzzles(
    records: &[PuzzleRecord],
    calendar: &mut MonthCalendar,
    limit: usize,
) -> Vec<PuzzleRanking> {
    let mut ranking: Vec<PuzzleRanking> = records
        .iter()
        .map(|record| {
            let month = calendar.month_key(&record.date_text);
            PuzzleRanking {
                id: format!("{}-{}", month.year(), month.month()),
                name: record.name.clone(),
                solvers: record.credit_entries,
                solution_url: record.solution_url.clone(),
            }
        })
        .collect();
    ranking.sort_by(|a, b| b.solvers.cmp(&a.solvers));
    ranking.truncate(limit);
    ranking
}

// ── Tests ─────────────────────────────────────────────────────────────────────
