//! Flight Status Monitor CLI
//!
//! Checks a fixed set of flights against an upstream provider and sends a
//! WhatsApp message for every status or schedule change, at most once.

use clap::{Args, Parser, Subcommand, ValueEnum};
use flightwatch::{
    fr24::{Fr24Config, Fr24Source, ZoneBounds},
    lookup::{LookupConfig, LookupSource},
    monitor::{Monitor, MonitorConfig},
    notify::{CallMeBotConfig, CallMeBotSink},
    source::FlightSource,
    store::StatusStore,
    types::{FlightId, KeyPolicy},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "flightwatch")]
#[command(about = "Flight status change monitor with WhatsApp alerts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the persisted status file
    #[arg(short, long, default_value = "last_status.json")]
    state_path: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single check over the configured flights
    Check {
        #[command(flatten)]
        opts: CheckOpts,
    },

    /// Check continuously at a fixed interval
    Watch {
        #[command(flatten)]
        opts: CheckOpts,

        /// Seconds between checks
        #[arg(short, long, default_value = "300")]
        interval: u64,
    },

    /// Print the persisted per-flight state
    Status,
}

#[derive(Args)]
struct CheckOpts {
    /// Flight designator to monitor (repeatable)
    #[arg(short, long = "flight", required = true)]
    flights: Vec<String>,

    /// Upstream data provider
    #[arg(long, value_enum, default_value_t = Provider::Fr24)]
    provider: Provider,

    /// API key for the lookup provider
    #[arg(long, env = "FLIGHT_LOOKUP_API_KEY")]
    lookup_api_key: Option<String>,

    /// WhatsApp destination phone, international format
    #[arg(long, env = "CALLMEBOT_PHONE")]
    phone: String,

    /// CallMeBot API key
    #[arg(long, env = "CALLMEBOT_APIKEY")]
    api_key: String,

    /// Track the status label only, ignoring schedule times
    #[arg(long)]
    status_only: bool,

    /// Zone bounds for the fr24 provider: south north west east
    #[arg(long, num_args = 4, value_names = ["S", "N", "W", "E"])]
    bounds: Option<Vec<f64>>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Provider {
    /// Flightradar24 zone feed (status only, no credentials)
    Fr24,
    /// Flights-lookup REST API (status plus schedule times)
    Lookup,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Check { opts } => run(&cli.state_path, opts, None).await?,
        Commands::Watch { opts, interval } => {
            run(&cli.state_path, opts, Some(Duration::from_secs(interval))).await?
        }
        Commands::Status => show_status(&cli.state_path),
    }

    Ok(())
}

async fn run(
    state_path: &PathBuf,
    opts: CheckOpts,
    watch_interval: Option<Duration>,
) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(opts.timeout);
    let sink = CallMeBotSink::new(
        CallMeBotConfig::new(opts.phone.clone(), opts.api_key.clone()).with_timeout(timeout),
    )?;

    match opts.provider {
        Provider::Fr24 => {
            let mut config = Fr24Config::default().with_timeout(timeout);
            if let Some(b) = &opts.bounds {
                config = config.with_bounds(ZoneBounds::new(b[0], b[1], b[2], b[3]));
            }
            let source = Fr24Source::new(config)?;
            drive(source, sink, state_path, opts, watch_interval).await
        }
        Provider::Lookup => {
            let api_key = opts
                .lookup_api_key
                .clone()
                .ok_or("--lookup-api-key is required for the lookup provider")?;
            let source = LookupSource::new(LookupConfig::new(api_key).with_timeout(timeout))?;
            drive(source, sink, state_path, opts, watch_interval).await
        }
    }
}

async fn drive<S: FlightSource>(
    source: S,
    sink: CallMeBotSink,
    state_path: &PathBuf,
    opts: CheckOpts,
    watch_interval: Option<Duration>,
) -> Result<(), Box<dyn std::error::Error>> {
    let flights: Vec<FlightId> = opts.flights.iter().map(|f| FlightId::from(f.as_str())).collect();

    tracing::info!("Monitoring {} flights", flights.len());
    tracing::info!("State path: {}", state_path.display());

    let mut config = MonitorConfig::new(flights);
    if opts.status_only {
        config = config.with_key_policy(KeyPolicy::status_only());
    }

    let store = StatusStore::load(state_path);
    let mut monitor = Monitor::new(source, sink, store, config);
    let stats = monitor.stats();

    let Some(interval) = watch_interval else {
        let report = monitor.run_once().await?;
        tracing::info!("Run complete: {}", report);
        return Ok(());
    };

    tracing::info!("Checking every {:?}", interval);
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, shutting down...");
                break;
            }
            _ = ticker.tick() => {
                match monitor.run_once().await {
                    Ok(report) => tracing::info!("Run complete: {}", report),
                    // Persist failures must stay visible: until the state
                    // file is written again, changes will re-notify.
                    Err(e) => tracing::error!("Run failed: {}", e),
                }
            }
        }
    }

    let s = stats.snapshot();
    tracing::info!("Final statistics:");
    tracing::info!("  Runs: {}", s.runs);
    tracing::info!("  Notifications sent: {}", s.notifications_sent);
    tracing::info!("  Fetch errors: {}", s.fetch_errors);
    tracing::info!("  Delivery errors: {}", s.delivery_errors);

    Ok(())
}

fn show_status(state_path: &PathBuf) {
    let store = StatusStore::load(state_path);

    if store.is_empty() {
        println!("No persisted state at {}", state_path.display());
        return;
    }

    let mut entries: Vec<_> = store.iter().collect();
    entries.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));

    for (id, key) in entries {
        println!("{}\t{}", id, key);
    }
}
