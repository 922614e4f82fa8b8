//! Snapshot loading for the puzzle leaderboard.
//!
//! Reads the collector's JSON array of puzzle records and converts it into
//! [`PuzzleRecord`] structs. Elements that are not record objects are logged
//! and skipped so one bad element never discards the whole snapshot.

use std::path::Path;

use leaderboard_core::error::{LeaderboardError, Result};
use leaderboard_core::models::PuzzleRecord;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every puzzle record from the snapshot file at `path`.
pub fn load_puzzles(path: &Path) -> Result<Vec<PuzzleRecord>> {
    if !path.exists() {
        return Err(LeaderboardError::DataFileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| LeaderboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_puzzles(&content)?;
    debug!("Loaded {} puzzle records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a snapshot document.
///
/// The document must be a JSON array. Elements that are not JSON objects are
/// skipped; objects are always kept, with mistyped fields coerced.
pub fn parse_puzzles(json: &str) -> Result<Vec<PuzzleRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let total = values.len();

    let records: Vec<PuzzleRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping puzzle record #{}: {}", index, e);
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!("{} of {} puzzle records skipped", total - records.len(), total);
    }

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
