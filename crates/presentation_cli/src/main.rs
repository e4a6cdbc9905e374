//! busboard CLI
//!
//! Polls the AtB departure API for the configured stops and keeps the
//! latest departure times as entity state.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use application::ports::DeparturePort;
use application::{StopMonitor, parse_local_timestamp};
use clap::{Parser, Subcommand};
use domain::{EntitySnapshot, SensorState, Timezone};
use infrastructure::{
    AppConfig, AtbDepartureAdapter, LoggingConfig, SchedulerConfig, SharedMonitor, StateStore,
    TaskScheduler, build_monitors, init_logging, poll_once, schedule_polls,
};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

/// busboard CLI
#[derive(Parser)]
#[command(name = "busboard")]
#[command(author, version, about = "AtB bus departure monitor", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll every configured stop on the configured schedule until Ctrl-C
    Run {
        /// Configuration file (default: ./busboard.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Poll every configured stop once and print the entity snapshots
    Poll {
        /// Configuration file (default: ./busboard.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Load and validate the configuration
    CheckConfig {
        /// Configuration file (default: ./busboard.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Parse a naive local departure time the way the API reports it
    ///
    /// Example: busboard parse-time 2021-03-01T08:15:00
    ParseTime {
        /// Timestamp without offset, e.g. 2021-03-01T08:15:00
        value: String,

        /// IANA zone the value is local to
        #[arg(short, long, default_value = "Europe/Oslo")]
        timezone: String,
    },
}

/// Log filter for a verbosity count; `None` keeps the configured filter
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Apply the CLI verbosity on top of the configured logging settings
fn logging_config(configured: &LoggingConfig, verbose: u8) -> LoggingConfig {
    log_filter_from_verbosity(verbose).map_or_else(
        || configured.clone(),
        |filter| configured.clone().with_filter(filter),
    )
}

/// Load the configuration and fail on any validation problem
fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load(path).context("Failed to load configuration")?;
    if let Err(errors) = config.validate() {
        anyhow::bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }
    Ok(config)
}

fn departure_port(config: &AppConfig) -> anyhow::Result<Arc<dyn DeparturePort>> {
    Ok(Arc::new(AtbDepartureAdapter::from_config(&config.atb)?))
}

/// Check that the departure API answers; an unreachable API is only a warning
async fn api_available(port: &dyn DeparturePort) -> bool {
    let available = port.is_available().await;
    if available {
        info!("Departure API reachable");
    } else {
        warn!("Departure API unreachable, polls will keep retrying on schedule");
    }
    available
}

fn log_task_stats(scheduler: &TaskScheduler) {
    for stats in scheduler.get_all_stats() {
        info!(
            task = %stats.name,
            successes = stats.success_count,
            failures = stats.failure_count,
            last_success = ?stats.last_success,
            last_error = ?stats.last_error,
            "Poll task statistics"
        );
    }
}

async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store = StateStore::new();
    let port = departure_port(config)?;
    api_available(&*port).await;

    let monitors: Vec<SharedMonitor> = build_monitors(config, &port, &store.publisher())
        .into_iter()
        .map(|monitor| Arc::new(AsyncMutex::new(monitor)))
        .collect();

    // Initial refresh so state is populated before the first tick
    for monitor in &monitors {
        if let Err(e) = poll_once(&mut *monitor.lock().await).await {
            warn!(error = %e, "Initial poll failed, waiting for the schedule");
        }
    }

    let scheduler = TaskScheduler::new(SchedulerConfig { auto_start: false }).await?;
    schedule_polls(&scheduler, &config.schedule, &monitors).await?;
    scheduler.start().await?;

    info!(stops = monitors.len(), schedule = %config.schedule, "busboard running");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!(entities = store.len(), "Shutting down");
    scheduler.stop().await?;
    log_task_stats(&scheduler);
    Ok(())
}

async fn poll(config: &AppConfig) -> anyhow::Result<()> {
    let store = StateStore::new();
    let mut monitors = build_monitors(config, &departure_port(config)?, &store.publisher());

    let mut failures = 0usize;
    for monitor in &mut monitors {
        if poll_once(monitor).await.is_err() {
            failures += 1;
        }
    }

    let snapshots: Vec<EntitySnapshot> = monitors.iter().flat_map(StopMonitor::snapshots).collect();
    println!("{}", serde_json::to_string_pretty(&snapshots)?);

    if failures > 0 {
        warn!(failures, "Some stops could not be polled");
        anyhow::bail!("{failures} of {} polls failed", monitors.len());
    }
    Ok(())
}

async fn check_config(config: &AppConfig) -> anyhow::Result<()> {
    let reachable = api_available(&*departure_port(config)?).await;

    println!("✅ Configuration valid");
    println!("   Timezone: {}", config.timezone);
    println!("   Schedule: {}", config.schedule);
    println!(
        "   API: {} (timeout {}s, {})",
        config.atb.base_url,
        config.atb.timeout_secs,
        if reachable { "reachable" } else { "unreachable" }
    );
    println!("   Sensors:");
    for (device, sensor) in &config.sensors {
        let monitor = sensor.to_monitor_config(device);
        let filter = sensor
            .bus_filter
            .as_ref()
            .map_or_else(|| "all lines".to_string(), |f| f.lines().join(", "));
        println!(
            "   - {} stop {} [{filter}]{}",
            domain::stop_entity_id(&monitor.device),
            sensor.stop_id,
            if monitor.expose_departures {
                " + 5 departures"
            } else {
                ""
            }
        );
    }
    Ok(())
}

fn parse_time(value: &str, timezone: &str) -> anyhow::Result<()> {
    let timezone = Timezone::new(timezone)?;
    let parsed = parse_local_timestamp(value, timezone)?;
    println!("{}", SensorState::Timestamp(parsed));
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => {
            let config = load_config(config.as_deref())?;
            init_logging(&logging_config(&config.logging, cli.verbose))?;
            run(&config).await?;
        },

        Commands::Poll { config } => {
            let config = load_config(config.as_deref())?;
            init_logging(&logging_config(&config.logging, cli.verbose))?;
            poll(&config).await?;
        },

        Commands::CheckConfig { config } => {
            let config = load_config(config.as_deref())?;
            check_config(&config).await?;
        },

        Commands::ParseTime { value, timezone } => {
            init_logging(&logging_config(&LoggingConfig::default(), cli.verbose))?;
            parse_time(&value, &timezone)?;
        },
    }

    Ok(())
}
