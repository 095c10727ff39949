//! Router assembly and the serve loop.

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;

use crate::handlers::{books, health, metrics as metrics_handlers};
use crate::metrics::http::http_metrics_middleware;
use crate::metrics::setup::detached_handle;
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Book routes. The first segment after `/book` must carry the same
/// parameter name on every route that has one.
fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/book", post(books::create_book))
        .route(
            "/api/v1/book/{key}",
            get(books::list_by_category)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/api/v1/book/{key}/{author}", get(books::find_by_title_author))
}

fn metrics_routes(state: &AppState, prometheus: PrometheusHandle) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handlers::metrics_handler))
        .with_state(metrics_handlers::MetricsState {
            prometheus,
            cache: state.catalog().cache().clone(),
        })
}

/// Creates a router with the given application state and metrics handle.
///
/// Layers run outermost first: request id, logging, then HTTP metrics.
pub fn create_router_with_state(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let metrics = metrics_routes(&state, prometheus_handle);

    let app = book_routes()
        .route("/health", get(health::health_check))
        .with_state(state);

    app.merge(metrics)
        .layer(axum::middleware::from_fn(http_metrics_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(RequestIdLayer)
                .layer(LoggingLayer),
        )
}

/// Router whose Prometheus recorder is not installed globally, so any
/// number of them can coexist in one process (tests, benches).
pub fn create_router(state: AppState) -> Router {
    create_router_with_state(state, detached_handle())
}

/// Binds `addr` and serves until Ctrl+C or SIGTERM.
pub async fn run_server_with_state(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, create_router_with_state(state, prometheus_handle))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on the first termination signal. A handler that cannot be
/// installed never fires; the other one still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Ctrl+C received"),
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for Ctrl+C");
                std::future::pending::<()>().await
            },
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("SIGTERM received");
            },
            Err(e) => {
                tracing::error!(error = %e, "Cannot install SIGTERM handler");
                std::future::pending::<()>().await
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutting down gracefully");
}
