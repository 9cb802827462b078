/// HTTP server: serves the API until ctrl-c.
use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};

use crate::api::api_router;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_router().layer(cors).with_state(state)
}

pub async fn serve(state: AppState, shutdown: watch::Sender<bool>) -> std::io::Result<()> {
    let addr = format!("{}:{}", state.bind_address, state.port);
    let listener = TcpListener::bind(&addr).await?;
    serve_on(listener, state, shutdown, ctrl_c()).await
}

/// Serve until `signal` resolves. Open event streams are closed through
/// `shutdown` so graceful shutdown does not wait on them.
async fn serve_on(
    listener: TcpListener,
    state: AppState,
    shutdown: watch::Sender<bool>,
    signal: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    log::info!(
        "HTTP server listening on http://{}",
        listener.local_addr()?
    );

    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            log::info!("Shutdown requested");
            let _ = shutdown.send(true);
        })
        .await?;
    log::info!("HTTP server stopped");
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
