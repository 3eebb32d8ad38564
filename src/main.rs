// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::chart_service::ChartService;
use crate::application::notifier::Notifier;
use crate::application::sample_log::SampleLog;
use crate::application::watchdog_service::WatchdogService;
use crate::infrastructure::config::load_server_config;
use crate::infrastructure::file_log::FileSampleLog;
use crate::infrastructure::twilio::{LogOnlyNotifier, TwilioNotifier};
use crate::infrastructure::watchdog_store::JsonWatchdogStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    append_log, append_log_bare, checkin, fallback, plot_index, plot_metric, summary,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_server_config()?;
    let data_dir = Path::new(&config.server.data_dir);

    // Create repositories (infrastructure layer)
    let sample_log: Arc<dyn SampleLog> = Arc::new(FileSampleLog::new(data_dir));
    let registry = Arc::new(JsonWatchdogStore::new(data_dir));
    let notifier: Arc<dyn Notifier> = match config.twilio {
        Some(settings) => Arc::new(TwilioNotifier::new(settings)),
        None => {
            tracing::warn!("no twilio credentials configured, alerts will only be logged");
            Arc::new(LogOnlyNotifier)
        }
    };

    // Create services (application layer)
    let chart_service = ChartService::new(
        sample_log.clone(),
        config.charts.usage_metric,
        config.charts.display_offset_secs,
    );
    let watchdog_service = WatchdogService::new(registry, notifier);

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        watchdog_service,
        sample_log,
    });

    // Build router (presentation layer)
    // Note: the bare "/:name" capture is the check-in path, so it must come
    // after the static routes it would otherwise shadow
    let router = Router::new()
        .route("/", get(summary))
        .route("/log", get(append_log_bare))
        .route("/log/*msg", get(append_log))
        .route("/plots", get(plot_index))
        .route("/plot/:metric", get(plot_metric))
        .route("/:name", get(checkin))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("starting uptime-watchdog service on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
