//! Parley worker binary — a long-running voice agent process.
//!
//! Loads `.env` and the TOML config, initializes structured logging, spawns
//! the liveness endpoint, registers the session bootstrapper as the job
//! entrypoint, and serves jobs until SIGTERM/SIGINT.

use parley_agent::{config, health};
use parley_session::{
    BackgroundVoiceCancellation, Bootstrapper, DispatchPoller, LiveKitRoomService,
    MultilingualTurnDetector, SessionConfig, SileroVad, Worker, WorkerOptions,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("PARLEY_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    // Provider credentials come from the environment; a missing .env file is
    // fine, anything else (unreadable, malformed) is not.
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            eprintln!("failed to load .env file: {e}");
            std::process::exit(1);
        }
    }

    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    // Load configuration
    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration — the worker cannot start without valid config");

    // Initialize tracing
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        "resolved startup configuration path"
    );

    // Liveness endpoint runs for the whole process lifetime, independent of
    // job handling. A failed bind is logged inside spawn and never fatal.
    let health_addr = SocketAddr::new(config.server.host, config.server.port);
    let _health = health::spawn(health_addr, config.agent.service_name.clone());

    // Capability providers, fixed for the process lifetime.
    let session_config = SessionConfig {
        stt: config.agent.stt.clone(),
        llm: config.agent.llm.clone(),
        tts: config.agent.tts.clone(),
        vad: Arc::new(SileroVad::load()),
        turn_detection: Arc::new(MultilingualTurnDetector::new()),
        noise_cancellation: Arc::new(BackgroundVoiceCancellation::new()),
    };

    let room_service = Arc::new(LiveKitRoomService::new(config.livekit.clone()));
    if !room_service.is_enabled() {
        tracing::warn!("livekit.url is empty — set LIVEKIT_URL or the [livekit] config section");
    }

    let worker = Worker::new(WorkerOptions {
        entrypoint: Arc::new(Bootstrapper::new(session_config)),
    });

    let poller = DispatchPoller::new(
        room_service,
        worker.dispatcher(),
        Duration::from_secs(config.agent.dispatch_interval_seconds),
    );
    let poller_task = tokio::spawn(poller.run());

    tracing::info!(
        service = %config.agent.service_name,
        url = %config.livekit.url,
        "parley worker started"
    );

    tokio::select! {
        () = worker.run() => {
            tracing::info!("worker loop exited");
        }
        () = shutdown_signal() => {}
    }

    poller_task.abort();
    tracing::info!("parley worker shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
