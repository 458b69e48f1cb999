//! Liveness HTTP endpoint.
//!
//! Serves `GET /healthz` for orchestrator probes on its own task, fully
//! independent of job handling: a wedged session never blocks a probe, and a
//! probe never touches session state. Individual requests are not logged so
//! frequent polling cannot flood the log.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Probe response, computed fresh per request.
#[derive(Debug, Clone, Serialize)]
pub struct LivenessStatus {
    pub status: &'static str,
    /// Current time, not process start time.
    pub timestamp: String,
    pub service: String,
}

async fn healthz(State(service): State<Arc<str>>) -> Json<LivenessStatus> {
    Json(LivenessStatus {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
        service: service.to_string(),
    })
}

/// Builds the liveness router: `/healthz` answers, everything else is 404
/// with an empty body.
pub fn router(service_name: &str) -> Router {
    let service: Arc<str> = Arc::from(service_name);
    Router::new()
        .route("/healthz", get(healthz))
        .with_state(service)
}

/// Starts the liveness endpoint on its own task.
///
/// A bind failure only costs probe availability: it is logged and the agent
/// keeps running.
pub fn spawn(addr: SocketAddr, service_name: String) -> JoinHandle<()> {
    tokio::spawn(async move {
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!(%addr, error = %e, "liveness endpoint failed to bind, probes will be unavailable");
                return;
            }
        };

        tracing::info!(%addr, "liveness endpoint listening");

        if let Err(e) = axum::serve(listener, router(&service_name)).await {
            tracing::error!(error = %e, "liveness endpoint stopped serving");
        }
    })
}
