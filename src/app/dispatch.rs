use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result, bail};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use whalewatch::Config;
use whalewatch::alerts::create_sink;
use whalewatch::diagnostics::health::HealthMonitor;
use whalewatch::gate::CircuitBreakerGate;
use whalewatch::quality::{Validator, render_report};
use whalewatch::scheduler;
use whalewatch::store::SqliteStore;

async fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.storage.resolved_database_path();
    SqliteStore::open(&path)
        .await
        .with_context(|| format!("Failed to open database at {}", path.display()))
}

/// One validation run. The exit code mirrors the overall status.
async fn run_validate(mut config: Config, json: bool, hours: Option<u32>) -> Result<ExitCode> {
    if let Some(hours) = hours {
        if hours == 0 {
            bail!("--hours must be at least 1");
        }
        config.validator.lookback_hours = hours;
    }

    let store = open_store(&config).await?;
    let session = store.session().await?;
    let mut validator = Validator::new(session)
        .with_settings(config.validator.check_settings())
        .with_checks(config.validator.check_kinds());
    let report = validator.run_all_checks().await;

    if json {
        println!(
            "{}",
            report
                .to_json_pretty()
                .context("Failed to serialize report")?
        );
    } else {
        println!("{}", render_report(&report));
    }

    Ok(ExitCode::from(report.exit_code()))
}

async fn run_watch(config: Config) -> Result<ExitCode> {
    let store = open_store(&config).await?;
    let sink = create_sink(&config.alerts);
    info!(sink = sink.name(), "alerts configured");
    let monitor = HealthMonitor::new();
    let gate = CircuitBreakerGate::new(sink).with_monitor(monitor.clone());

    tokio::select! {
        res = scheduler::run(Arc::new(config), store, gate, None) => res?,
        _ = tokio::signal::ctrl_c() => {
            info!(health = %monitor.snapshot_json(), "shutdown requested, stopping scheduler");
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_init_db(config: &Config) -> Result<ExitCode> {
    let store = open_store(config).await?;
    if !store.health_check().await {
        bail!("Database opened but failed its health check");
    }
    println!(
        "Database ready at {}",
        config.storage.resolved_database_path().display()
    );
    Ok(ExitCode::SUCCESS)
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<ExitCode> {
    match cli.command {
        Commands::Validate { json, hours } => run_validate(config, json, hours).await,
        Commands::Watch => run_watch(config).await,
        Commands::InitDb => run_init_db(&config).await,
    }
}
