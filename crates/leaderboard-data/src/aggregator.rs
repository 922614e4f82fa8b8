//! Per-solver accumulation over puzzle records.
//!
//! Turns the flat record list into one [`SolverRecord`] per distinct solver
//! name plus the set of months seen across the archive. Derived rankings are
//! built from this in [`crate::analysis`].

use std::collections::{BTreeSet, HashMap};

use leaderboard_core::calendar::{MonthCalendar, MonthKey};
use leaderboard_core::models::{PuzzleRecord, SolverRecord};
use leaderboard_core::names::split_solver_names;

// ── AggregatedSolvers ─────────────────────────────────────────────────────────

/// Output of a [`SolverAggregator`] run.
#[derive(Debug, Clone, Default)]
pub struct AggregatedSolvers {
    /// One record per solver, in first-seen order.
    pub solvers: Vec<SolverRecord>,
    /// Every month with at least one puzzle, credited or not.
    pub months: BTreeSet<MonthKey>,
    /// Number of puzzle records consumed.
    pub records: usize,
    /// Individual solver credits after name splitting.
    pub credits: usize,
}

// ── SolverAggregator ──────────────────────────────────────────────────────────

/// Accumulates solver statistics one puzzle record at a time.
#[derive(Debug, Default)]
pub struct SolverAggregator {
    solvers: Vec<SolverRecord>,
    index: HashMap<String, usize>,
    months: BTreeSet<MonthKey>,
    records: usize,
    credits: usize,
}

impl SolverAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate `records` newest-first.
    ///
    /// Records sharing a date keep their input order, so first-seen solver
    /// order (the tie-break for every ranking) is deterministic.
    pub fn aggregate(records: &[PuzzleRecord], calendar: &mut MonthCalendar) -> AggregatedSolvers {
        let mut aggregator = Self::new();
        for record in newest_first(records, calendar) {
            aggregator.add_record(record, calendar);
        }
        aggregator.finish()
    }

    /// Credit every solver named on `record`.
    ///
    /// Records without solvers still register their month.
    pub fn add_record(&mut self, record: &PuzzleRecord, calendar: &mut MonthCalendar) {
        let date = calendar.parse_month_year(&record.date_text);
        let month = MonthKey::from_date(date);
        self.months.insert(month);
        self.records += 1;

        for raw in &record.solvers {
            for name in split_solver_names(raw) {
                let idx = match self.index.get(&name) {
                    Some(&idx) => idx,
                    None => {
                        self.solvers
                            .push(SolverRecord::new(name.as_str(), record.date_text.as_str()));
                        let idx = self.solvers.len() - 1;
                        self.index.insert(name, idx);
                        idx
                    }
                };

                let solver = &mut self.solvers[idx];
                solver.puzzles_solved += 1;
                solver.monthly_activity.insert(month, true);

                if date < calendar.parse_month_year(&solver.first_appearance) {
                    solver.first_appearance = record.date_text.clone();
                }
                if date > calendar.parse_month_year(&solver.last_solve) {
                    solver.last_solve = record.date_text.clone();
                }

                self.credits += 1;
            }
        }
    }

    pub fn finish(self) -> AggregatedSolvers {
        AggregatedSolvers {
            solvers: self.solvers,
            months: self.months,
            records: self.records,
            credits: self.credits,
        }
    }
}

/// `records` ordered by parsed date, latest first; stable for equal dates.
pub fn newest_first<'a>(
    records: &'a [PuzzleRecord],
    calendar: &mut MonthCalendar,
) -> Vec<&'a PuzzleRecord> {
    let mut dated: Vec<(chrono::NaiveDate, &PuzzleRecord)> = records
        .iter()
        .map(|r| (calendar.parse_month_year(&r.date_text), r))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().map(|(_, r)| r).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
