//! Main application entry point.
//!
//! Loads configuration, starts the async runtime that owns the pollers and
//! hands the window over to eframe.

use std::sync::Arc;

use eframe::egui;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use trafficwatch::api::{Backend, Endpoints, FetchError, HttpBackend};
use trafficwatch::config::{Config, ConfigError};
use trafficwatch::ui::MonitorApp;

#[derive(Debug, Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] FetchError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("window error: {0}")]
    Window(#[from] eframe::Error),
}

fn main() -> Result<(), AppError> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "trafficwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        violation_poll = ?config.violation_poll,
        video_poll = ?config.video_poll,
        "starting monitor"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
        Endpoints::new(config.api_base_url.clone()),
        config.request_timeout,
    )?);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Traffic Violation Monitor")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    eframe::run_native(
        "trafficwatch",
        native_options,
        Box::new(move |cc| Box::new(MonitorApp::new(cc, handle, backend, &config))),
    )?;

    runtime.shutdown_timeout(std::time::Duration::from_secs(1));
    Ok(())
}
