mod bootstrap;

use std::sync::Arc;

use anyhow::{bail, Result};
use leaderboard_core::settings::Settings;
use leaderboard_data::reader::load_puzzles;
use leaderboard_report::{render, ReportFormat, ReportOptions};
use leaderboard_runtime::orchestrator::pre_process;
use leaderboard_runtime::store::LeaderboardStore;
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Puzzle Leaderboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Format: {}, Timezone: {}, Reference date: {}",
        settings.format,
        settings.timezone,
        settings.effective_today()
    );

    let data_path = match settings.data.clone().or_else(bootstrap::discover_data_path) {
        Some(path) => path,
        None => bail!(
            "no puzzle snapshot found; pass --data or set LEADERBOARD_DATA \
             (searched ./data/data.json, ./puzzles.json, ~/.puzzle-leaderboard/data.json)"
        ),
    };
    tracing::info!("Reading puzzles from {}", data_path.display());

    let records = load_puzzles(&data_path)?;
    let store = Arc::new(
        LeaderboardStore::new(records)
            .with_reference_date(settings.reference_date())
            .with_timezone(settings.tz()),
    );

    let (tx, rx) = oneshot::channel();
    let handle = pre_process(Arc::clone(&store), move |result| {
        let _ = tx.send(result);
    });

    let result = tokio::select! {
        result = rx => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; abandoning leaderboard computation");
            handle.abort();
            return Ok(());
        }
    };

    tracing::info!(
        "{} puzzles, {} unique solvers, computed in {:.3}s",
        result.total_puzzles,
        result.unique_solvers,
        result.metadata.compute_time_seconds
    );

    let format: ReportFormat = settings.format.parse()?;
    let options = ReportOptions {
        top: settings.top,
        ..Default::default()
    };
    let report = render(&result, format, &options)?;
    bootstrap::write_report(&report, settings.output.as_deref())?;

    Ok(())
}
