//! services/dashboard/src/bin/dashboard.rs

use club_dashboard_core::controller::{DashboardContext, DashboardController};
use club_dashboard_core::ports::SystemClock;
use dashboard_lib::{
    adapters::{HttpBackend, TerminalView},
    commands::{dispatch, Command, Flow, HELP},
    config::Config,
    error::DashboardError,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Backend at {}", config.api_base);

    // --- 2. Initialize Adapters & Controller ---
    let backend = Arc::new(HttpBackend::new(&config.api_base, config.http_timeout)?);
    let view = Arc::new(TerminalView::stdout());
    let mut dashboard = DashboardController::new(DashboardContext {
        backend,
        view,
        clock: Arc::new(SystemClock),
        members_limit: config.members_limit,
    });

    // --- 3. Initial Health Check (loads data when the backend is up) ---
    dashboard.notify(HELP);
    dashboard.check_health().await;

    // --- 4. Input Loop ---
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if dispatch(&mut dashboard, Command::parse(&line)).await == Flow::Exit {
            break;
        }
    }

    info!("Dashboard closed.");
    Ok(())
}
