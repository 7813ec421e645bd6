use anyhow::Result;
use clap::Parser;
use hotpuppy_server::app::AppContext;
use hotpuppy_server::config;
use hotpuppy_server::server;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the HotPuppy evolving image", long_about = None)]
struct Args {
    /// Listen address, overrides HOTPUPPY_BIND
    #[arg(long)]
    bind: Option<String>,

    /// Database file, overrides HOTPUPPY_DB
    #[arg(long)]
    db: Option<PathBuf>,

    /// Static asset directory, overrides HOTPUPPY_STATIC_DIR
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

fn init_logging(log_level: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut cfg = config::ServerConfig::from_env();
    if let Some(bind) = args.bind {
        cfg.bind_addr = bind;
    }
    if let Some(db) = args.db {
        cfg.db_path = db;
    }
    if let Some(dir) = args.static_dir {
        cfg.static_dir = dir;
    }

    init_logging(&cfg.log_level);

    tracing::info!(event = "server_start", config = ?cfg);
    if cfg.debug {
        tracing::debug!(event = "debug_mode", "debug mode enabled");
    }
    if cfg.uses_default_secret() {
        tracing::warn!(event = "default_session_secret", "SESSION_SECRET not set, using the built-in default");
    }

    let addr = cfg.socket_addr()?;

    // Store and seed must be in place before the first request is accepted.
    let ctx = AppContext::from_config(cfg).inspect_err(|e| {
        tracing::error!(event = "startup_failed", error = %format!("{e:#}"));
    })?;
    ctx.ensure_seeded().await.inspect_err(|e| {
        tracing::error!(event = "startup_failed", error = %format!("{e:#}"));
    })?;

    server::run(Arc::new(ctx), addr).await
}
