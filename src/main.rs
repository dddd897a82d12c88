use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pingwatch::duration::{format_duration, parse_duration};
use pingwatch::{Monitor, MonitorConfig, Snapshot};

#[derive(Parser, Debug)]
#[command(name = "pingwatch")]
#[command(about = "Track packet loss to a host and print status-line snapshots")]
struct Args {
    /// Config file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host or address to probe
    #[arg(short, long)]
    target: Option<String>,

    /// Time between probes (e.g. "4s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// How long to wait for each reply
    #[arg(long)]
    timeout: Option<String>,

    /// Payload bytes per probe
    #[arg(short = 's', long)]
    packet_size: Option<u32>,

    /// How long statistics accumulate before resetting (e.g. "5m")
    #[arg(short, long)]
    window: Option<String>,

    /// How often to print a snapshot
    #[arg(short, long, default_value = "1s")]
    refresh: String,

    /// Print an empty line while the current window has no loss
    #[arg(long)]
    hide_if_zero: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays one snapshot per line.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pingwatch=info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(&args)?;
    let refresh = parse_duration(&args.refresh).context("Invalid --refresh")?;
    anyhow::ensure!(!refresh.is_zero(), "--refresh must be greater than zero");

    let monitor = Monitor::builder()
        .config(config)
        .build()
        .context("Invalid monitor configuration")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(monitor, refresh, args.hide_if_zero))
}

/// Layer command-line overrides on top of file and environment settings.
fn load_config(args: &Args) -> Result<MonitorConfig> {
    let mut config = MonitorConfig::load(args.config.as_deref())
        .with_context(|| match &args.config {
            Some(path) => format!("Failed to load config from {}", path.display()),
            None => "Failed to load config".to_string(),
        })?;

    if let Some(target) = &args.target {
        config.target = target.clone();
    }
    if let Some(interval) = &args.interval {
        config.interval = parse_duration(interval).context("Invalid --interval")?;
    }
    if let Some(timeout) = &args.timeout {
        config.timeout = parse_duration(timeout).context("Invalid --timeout")?;
    }
    if let Some(packet_size) = args.packet_size {
        config.packet_size = packet_size;
    }
    if let Some(window) = &args.window {
        config.window = parse_duration(window).context("Invalid --window")?;
    }

    Ok(config)
}

/// Print snapshots until interrupted, then stop the monitor cleanly.
async fn run(monitor: Monitor, refresh: Duration, hide_if_zero: bool) -> Result<()> {
    monitor.start()?;

    let config = monitor.config();
    info!(
        "probing {} every {} (window {}, timeout {})",
        config.target,
        format_duration(config.interval),
        format_duration(config.window),
        format_duration(config.timeout)
    );

    let result = print_until_interrupted(&monitor, refresh, hide_if_zero).await;
    monitor.stop().await;
    result
}

async fn print_until_interrupted(
    monitor: &Monitor,
    refresh: Duration,
    hide_if_zero: bool,
) -> Result<()> {
    let mut ticker = tokio::time::interval(refresh);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                info!("interrupted, shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                print_snapshot(&monitor.snapshot(), hide_if_zero)?;
            }
        }
    }
}

/// Print one snapshot as a JSON line.
fn print_snapshot(snapshot: &Snapshot, hide_if_zero: bool) -> Result<()> {
    let line = if hide_if_zero && !snapshot.statistics.has_loss() {
        String::new()
    } else {
        serde_json::to_string(snapshot)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}
