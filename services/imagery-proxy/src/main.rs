//! Imagery Proxy Server
//!
//! Serves field imagery, terrain tiles, and scene search backed by the
//! EOSDA render API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use imagery_proxy::config::ProxyConfig;
use imagery_proxy::state::AppState;

/// Imagery Proxy Server
#[derive(Parser, Debug)]
#[command(name = "imagery-proxy")]
#[command(about = "Field imagery and terrain proxy for the EOSDA render API")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8090", env = "IMAGERY_LISTEN_ADDR")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "IMAGERY_WORKER_THREADS")]
    worker_threads: Option<usize>,

    /// YAML configuration file (environment variables override it)
    #[arg(short, long, env = "IMAGERY_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    let prometheus_handle = imagery_proxy::metrics::install_recorder()?;
    info!("Prometheus metrics exporter initialized");

    let config = ProxyConfig::load(args.config.as_deref())?;
    info!(
        render_base_url = %config.imagery.render_base(),
        search_url = %config.imagery.search_url,
        default_zoom = config.imagery.default_zoom,
        "Loaded configuration"
    );
    if config.imagery.api_key.is_none() {
        warn!("EOSDA_API_KEY is not set; provider requests will fail with 503");
    }

    let state = Arc::new(AppState::new(config, Some(prometheus_handle))?);
    let app = imagery_proxy::build_router(state);

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", args.listen))?;

    info!("Imagery proxy listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
