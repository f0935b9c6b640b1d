use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use armis_events::{
    AlertDispatcher, EmailConfig, EmailNotifier, Notifier, WebhookConfig, WebhookNotifier,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use armis_api::config::ServerConfig;
use armis_api::router::build_app_router;
use armis_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "armis_api=debug,armis_core=info,armis_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        risk_max_score = config.risk_policy.max_score(),
        dashboard_gate = config.dashboard_token.is_some(),
        "Loaded server configuration"
    );

    // --- Alert delivery ---
    let dispatcher = AlertDispatcher::new(
        build_notifiers(),
        Duration::from_secs(config.notify_timeout_secs),
    );
    if dispatcher.is_enabled() {
        tracing::info!(notifiers = ?dispatcher.notifier_names(), "Alert notifiers configured");
    } else {
        tracing::warn!("No alert notifier configured; alerts will be logged only");
    }

    let shutdown_grace = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );

    // --- App state + router ---
    let state = AppState::new(config, dispatcher.clone());
    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining alert dispatches");
    if !dispatcher.shutdown(shutdown_grace).await {
        tracing::warn!("Alert dispatches still running at shutdown deadline, abandoning them");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Construct every notifier whose configuration is present.
///
/// A channel whose configuration is present but invalid is logged and left
/// out rather than stopping the server; alerts are best-effort.
fn build_notifiers() -> Vec<Arc<dyn Notifier>> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();

    match EmailConfig::from_env().map(EmailNotifier::new) {
        Some(Ok(email)) => notifiers.push(Arc::new(email)),
        Some(Err(e)) => tracing::error!(error = %e, "Email notifier misconfigured, disabled"),
        None => tracing::info!("Email credentials not set, email alerts disabled"),
    }

    match WebhookConfig::from_env().map(WebhookNotifier::new) {
        Some(Ok(webhook)) => notifiers.push(Arc::new(webhook)),
        Some(Err(e)) => tracing::error!(error = %e, "Webhook notifier misconfigured, disabled"),
        None => {}
    }

    notifiers
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
