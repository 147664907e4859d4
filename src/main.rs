//! GitBoost pre-launch backend.
//!
//! Captures early-access email signups and serves the rate-limited
//! project blueprint generator backing the pre-launch page.

mod blueprints;
mod cli;
mod config;
mod mailer;
mod models;
mod rate_limit;
mod repository;
mod schema;
mod server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "prelaunch=info"
    } else {
        "prelaunch=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
