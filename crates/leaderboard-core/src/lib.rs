//! Shared building blocks for the puzzle leaderboard.
//!
//! Data model, error type, month calendar, solver-name splitting, number
//! formatting and command-line settings. No I/O happens here.

pub mod calendar;
pub mod error;
pub mod formatting;
pub mod models;
pub mod names;
pub mod settings;

pub use error::{LeaderboardError, Result};
