//! Unsafe-report LINE bot - Entry point.

use anyhow::{Context, Result};
use line_client::{LineClient, SignatureVerifier};
use report_bot::{
    api::{create_router, AppState},
    catalog::{default_presets, default_units},
    Bot, Config, Notifier,
};
use report_store::ReportStore;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    init_logging(&config.log.level);

    info!("Starting Unsafe-Report LINE bot...");

    // Initialize clients
    let line = LineClient::new(
        &config.line.api_url,
        &config.line.channel_access_token,
        config.line.timeout,
    )
    .context("Failed to create LINE client")?;

    let store = ReportStore::firebase(&config.store.base_url, config.store.timeout)
        .context("Failed to create store client")?;

    // Check services
    if line.health_check().await {
        info!("LINE API healthy");
    } else {
        warn!("LINE API health check failed - check the channel access token");
    }

    if config.catalog.seed_on_startup {
        store
            .seed_units(&default_units())
            .await
            .context("Failed to seed unit catalog")?;
    }

    let verifier = if config.webhook.verify_signature {
        Some(SignatureVerifier::new(&config.line.channel_secret))
    } else {
        warn!("Webhook signature verification is DISABLED");
        None
    };

    if config.notify.api_key.is_none() {
        info!("Notify endpoint has no API key configured");
    }

    let bot = Bot::new(
        line.clone(),
        store.clone(),
        default_presets(),
        config.catalog.match_policy,
    );
    let notifier = Notifier::new(store, line);
    let state = AppState::new(bot, notifier, verifier, config.notify.api_key.clone());
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
