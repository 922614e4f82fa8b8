//! Runtime layer for the puzzle leaderboard.
//!
//! Holds the memoizing store around the analysis pipeline and the background
//! pre-processing entry point used by the binary.

pub mod orchestrator;
pub mod store;

pub use leaderboard_core as core;
pub use leaderboard_data as data;
