use crate::app::AppContext;
use crate::routes::routes;
use std::net::SocketAddr;
use std::sync::Arc;

/// Serves until Ctrl-C, then drains in-flight requests.
pub async fn run(ctx: Arc<AppContext>, addr: SocketAddr) -> anyhow::Result<()> {
    let (bound, server) =
        warp::serve(routes(ctx)).try_bind_with_graceful_shutdown(addr, shutdown_signal())?;

    tracing::info!(event = "listening", addr = %bound);
    server.await;
    tracing::info!(event = "server_stop");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(event = "signal_error", error = %e);
        std::future::pending::<()>().await;
    }
    tracing::info!(event = "shutdown_signal");
}
