//! Compute-once leaderboard store.
//!
//! Owns the puzzle snapshot and lazily runs [`build_leaderboard_with`] the
//! first time the result is requested. Every later call, from any thread,
//! receives the same shared [`LeaderboardResult`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use chrono_tz::Tz;
use leaderboard_core::calendar::today_in;
use leaderboard_core::models::{LeaderboardResult, PuzzleRecord};
use leaderboard_data::analysis::{build_leaderboard_with, AnalysisConfig};

// ── LeaderboardStore ──────────────────────────────────────────────────────────

/// Memoizing owner of a puzzle snapshot.
///
/// # Example
/// ```no_run
/// use leaderboard_runtime::store::LeaderboardStore;
///
/// let store = LeaderboardStore::new(Vec::new());
/// let result = store.get();
/// println!("unique solvers: {}", result.unique_solvers);
/// ```
#[derive(Debug)]
pub struct LeaderboardStore {
    records: Arc<[PuzzleRecord]>,
    /// Pinned "today"; `None` reads the wall clock in `tz` at compute time.
    reference_date: Option<NaiveDate>,
    tz: Tz,
    config: AnalysisConfig,
    cell: OnceLock<Arc<LeaderboardResult>>,
    computations: AtomicUsize,
}

impl LeaderboardStore {
    pub fn new(records: Vec<PuzzleRecord>) -> Self {
        Self {
            records: records.into(),
            reference_date: None,
            tz: Tz::UTC,
            config: AnalysisConfig::default(),
            cell: OnceLock::new(),
            computations: AtomicUsize::new(0),
        }
    }

    pub fn with_reference_date(mut self, date: Option<NaiveDate>) -> Self {
        self.reference_date = date;
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Return the leaderboard, computing it on the first call.
    ///
    /// Concurrent first callers block until the single computation finishes
    /// and then share its result.
    pub fn get(&self) -> Arc<LeaderboardResult> {
        if let Some(result) = self.cell.get() {
            tracing::debug!("returning memoized leaderboard");
            return Arc::clone(result);
        }
        Arc::clone(self.cell.get_or_init(|| Arc::new(self.compute())))
    }

    /// The result if it has already been computed.
    pub fn cached(&self) -> Option<Arc<LeaderboardResult>> {
        self.cell.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn records(&self) -> &[PuzzleRecord] {
        &self.records
    }

    /// Number of times the pipeline has actually run (0 or 1).
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::SeqCst)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| today_in(self.tz))
    }

    fn compute(&self) -> LeaderboardResult {
        self.computations.fetch_add(1, Ordering::SeqCst);
        let today = self.today();
        tracing::info!(
            records = self.records.len(),
            %today,
            "computing leaderboard"
        );
        let result = build_leaderboard_with(&self.records, today, &self.config);
        if !result.metadata.parse_failures.is_empty() {
            tracing::warn!(
                count = result.metadata.parse_failures.len(),
                "some puzzle dates could not be parsed and were placed at {}",
                today
            );
        }
        result
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
