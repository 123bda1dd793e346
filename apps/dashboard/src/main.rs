use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hiring_dashboard::a11y::announcer::Announcer;
use hiring_dashboard::api_client::HttpRecruitmentApi;
use hiring_dashboard::config::Config;
use hiring_dashboard::dashboard::controller::DashboardController;
use hiring_dashboard::routes::build_router;
use hiring_dashboard::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hiring dashboard v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the recruitment API client
    let api = HttpRecruitmentApi::new(
        &config.api_base_url,
        config.api_token.clone(),
        config.request_timeout,
    )?;
    info!(
        "Recruitment API client initialized ({}, timeout {}s)",
        config.api_base_url,
        config.request_timeout.as_secs()
    );

    // Build the dashboard and load the first page of data
    let dashboard = Arc::new(DashboardController::new(
        Arc::new(api),
        Announcer::new(config.announce_delay),
    ));
    let initial = dashboard.refresh().await;
    if initial.notification.is_some() {
        warn!("Initial application fetch failed; serving an empty dashboard");
    } else {
        info!("Loaded {} applications", initial.counts.all);
    }

    let app = build_router(AppState { dashboard })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the company portal origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
