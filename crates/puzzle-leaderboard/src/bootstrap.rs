use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a tracing filter directive.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr so a report written to stdout stays clean. Unknown level
/// names fall back to `info`.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(())
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Candidate snapshot locations, most specific first.
fn candidate_paths(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![cwd.join("data").join("data.json"), cwd.join("puzzles.json")];
    if let Some(home) = home {
        candidates.push(home.join(".puzzle-leaderboard").join("data.json"));
    }
    candidates
}

/// First existing snapshot under `cwd` or `home`.
pub fn discover_data_path_in(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    candidate_paths(cwd, home).into_iter().find(|p| p.is_file())
}

/// Locate the puzzle snapshot when `--data` was not given.
///
/// Checks, in order:
/// 1. `./data/data.json`
/// 2. `./puzzles.json`
/// 3. `~/.puzzle-leaderboard/data.json`
pub fn discover_data_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let home = dirs::home_dir();
    discover_data_path_in(&cwd, home.as_deref())
}

// ── Output ─────────────────────────────────────────────────────────────────────

/// Write `report` to `path`, or to stdout when no path is given.
pub fn write_report(report: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── filter_directive ──────────────────────────────────────────────────────

    #[test]
    fn test_filter_directive_maps_level_names() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("info"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("TRACE"), "trace");
    }

    // ── discover_data_path_in ─────────────────────────────────────────────────

    #[test]
    fn test_discover_returns_none_when_absent() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        assert!(discover_data_path_in(cwd.path(), Some(home.path())).is_none());
    }

    #[test]
    fn test_discover_prefers_data_dir() {
        let cwd = TempDir::new().expect("tempdir");
        let nested = cwd.path().join("data").join("data.json");
        std::fs::create_dir_all(nested.parent().unwrap()).expect("mkdir");
        std::fs::write(&nested, "[]").expect("write");
        std::fs::write(cwd.path().join("puzzles.json"), "[]").expect("write");

        assert_eq!(discover_data_path_in(cwd.path(), None), Some(nested));
    }

    #[test]
    fn test_discover_falls_back_to_puzzles_json() {
        let cwd = TempDir::new().expect("tempdir");
        let flat = cwd.path().join("puzzles.json");
        std::fs::write(&flat, "[]").expect("write");

        assert_eq!(discover_data_path_in(cwd.path(), None), Some(flat));
    }

    #[test]
    fn test_discover_finds_home_snapshot() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        let snapshot = home.path().join(".puzzle-leaderboard").join("data.json");
        std::fs::create_dir_all(snapshot.parent().unwrap()).expect("mkdir");
        std::fs::write(&snapshot, "[]").expect("write");

        assert_eq!(discover_data_path_in(cwd.path(), Some(home.path())), Some(snapshot));
    }

    #[test]
    fn test_discover_ignores_directories() {
        let cwd = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(cwd.path().join("puzzles.json")).expect("mkdir");
        assert!(discover_data_path_in(cwd.path(), None).is_none());
    }

    // ── write_report ──────────────────────────────────────────────────────────

    #[test]
    fn test_write_report_to_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("out").join("README.md");

        write_report("# Leaderboard\n", Some(&path)).expect("write report");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Leaderboard\n");
    }
}
