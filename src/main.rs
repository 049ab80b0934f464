//! meeting-sync CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use core_runtime::logging::init_logging;
use meeting_sync::cli::{Cli, Command};
use meeting_sync::{
    bootstrap_desktop, bootstrap_fetcher, FileOutcome, MeetingSyncService, RunSummary,
};
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.logging_config()) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "meeting-sync failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Sync { every, json } => {
            let config = cli
                .settings
                .to_config()
                .context("Invalid configuration")?;
            let state_db = cli.state_db_path()?;

            let service = bootstrap_desktop(&config, state_db.clone())
                .await
                .with_context(|| {
                    format!("Failed to start with state database {}", state_db.display())
                })?;

            match every {
                None => {
                    let summary = service.run_once().await.context("Sync run aborted")?;
                    print_summary(&summary, *json)?;
                }
                Some(minutes) => {
                    let period = minutes
                        .checked_mul(60)
                        .map(Duration::from_secs)
                        .context("Sync interval is too long")?;
                    run_every(&service, period, *json).await?;
                }
            }
        }
        Command::FetchRecording { file_id, output } => {
            let config = cli
                .settings
                .to_fetch_config()
                .context("Invalid configuration")?;
            let fetcher = bootstrap_fetcher(&config).context("Failed to start fetcher")?;

            let bytes = fetcher
                .fetch(file_id, output)
                .await
                .with_context(|| format!("Failed to fetch recording {file_id}"))?;
            println!("Wrote {} bytes to {}", bytes, output.display());
        }
    }

    Ok(())
}

/// Run sequentially on a fixed interval until Ctrl-C. A run that aborts is
/// logged and the next tick tries again.
async fn run_every(service: &MeetingSyncService, period: Duration, json: bool) -> Result<()> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(period_secs = period.as_secs(), "Starting scheduled sync");

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("Interrupted, stopping scheduled sync");
                return Ok(());
            }
            _ = ticker.tick() => {
                match service.run_once().await {
                    Ok(summary) => print_summary(&summary, json)?,
                    Err(e) => error!(error = %e, "Sync run aborted"),
                }
            }
        }
    }
}

fn print_summary(summary: &RunSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!(
        "run {}: {} synced, {} skipped, {} failed, {} pruned",
        summary.run_id, summary.synced, summary.skipped, summary.errored, summary.pruned
    );

    for report in &summary.outcomes {
        match &report.outcome {
            FileOutcome::Synced { path, .. } => println!("  + {} -> {}", report.name, path),
            FileOutcome::Failed { reason } => println!("  ! {}: {}", report.name, reason),
            FileOutcome::Skipped { .. } => {}
        }
    }

    Ok(())
}
