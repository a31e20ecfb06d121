//! scam-honeypot server.
//!
//! Reads configuration from `HONEYPOT__*` environment variables (and `.env`),
//! serves `POST /api/engage` and `GET /health`, and on SIGINT/SIGTERM stops
//! accepting requests, interrupts reply pacing, and waits for in-flight
//! report deliveries before exiting.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use scam_honeypot::adapters::http::{app_router, ApiKeyState, EngageHandlers};
use scam_honeypot::adapters::{HttpReportSink, HttpReportSinkConfig, InMemorySessionStore};
use scam_honeypot::application::{
    DispatcherConfig, EngageMessageHandler, Pacer, ReportDispatcher,
};
use scam_honeypot::config::{AppConfig, ServerConfig};
use scam_honeypot::domain::engagement::ConversationPolicy;
use scam_honeypot::domain::intel::IntelMerger;
use scam_honeypot::ports::SessionStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Ports
    let store = Arc::new(InMemorySessionStore::new());
    let sink = HttpReportSink::new(
        HttpReportSinkConfig::new(config.callback.url.clone())
            .with_timeout(config.callback.timeout()),
    )?;
    let dispatcher = Arc::new(ReportDispatcher::with_config(
        Arc::new(sink),
        DispatcherConfig::default()
            .with_max_attempts(config.callback.max_attempts)
            .with_initial_backoff(config.callback.initial_backoff()),
    ));

    // Turn handler
    let handler = EngageMessageHandler::new(store.clone(), dispatcher.clone())
        .with_policy(ConversationPolicy::new(config.engagement.policy_config()?))
        .with_merger(IntelMerger::new(config.engagement.intel_cap))
        .with_pacer(Pacer::new(config.engagement.pacing(), shutdown_rx))
        .with_interim_report_turn(config.engagement.interim_report_turn);

    let app = app_router(
        EngageHandlers::new(Arc::new(handler)),
        ApiKeyState::new(config.auth.api_key().cloned()),
        config.server.request_timeout(),
    );

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        max_turns = config.engagement.max_turns,
        mode = ?config.engagement.mode,
        pacing_ms = config.engagement.pacing_ms,
        api_key = config.auth.is_enabled(),
        callback_url = %config.callback.url,
        "scam-honeypot listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await?;

    let undelivered = dispatcher.shutdown(config.server.shutdown_grace()).await;
    let dropped = store.drain().await;
    tracing::info!(undelivered, dropped_sessions = dropped, "shutdown complete");

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if server.is_production() {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Resolves on SIGINT or SIGTERM, after telling pacers to stop waiting.
async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
    shutdown.send_replace(true);
}
