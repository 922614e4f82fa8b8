//! Data layer for the puzzle leaderboard.
//!
//! Loads the puzzle snapshot, accumulates per-solver statistics and runs the
//! analysis pipeline that produces a [`core::models::LeaderboardResult`].

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use leaderboard_core as core;
