//! Face Metrics server - facial emotion and gaze analysis over HTTP.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use face_metrics_server::{routes, AppConfig, AppState, CliOverrides};

/// Face Metrics - facial emotion and gaze analysis service.
#[derive(Debug, Parser)]
#[command(name = "face-metrics", version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<IpAddr>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Allowed CORS origin (overrides config)
    #[arg(long, value_name = "ORIGIN")]
    origin: Option<String>,

    /// Custom models directory (overrides config)
    #[arg(long, value_name = "DIR")]
    models_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = AppConfig::load(cli.config.as_deref())?;

    // CLI flags take precedence over file values.
    config.apply_cli(CliOverrides {
        host: cli.host,
        port: cli.port,
        origin: cli.origin,
        models_dir: cli.models_dir,
    });

    // Startup-fatal: without models the process must not claim readiness.
    let state = AppState::initialize(&config).context("model initialization failed")?;

    let app = routes::router(state, &config.cors.allowed_origin)?;

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to install ctrl-c handler: {e}");
    }
}
