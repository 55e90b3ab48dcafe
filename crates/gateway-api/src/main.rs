//! # Payment Gateway Simulator
//!
//! Accounts, API keys and self-resolving invoices over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! # Optional overrides (also read from .env and config/gateway.toml)
//! export PORT=8080
//! export GATEWAY_RNG_SEED=42
//!
//! # Run the server
//! gateway
//! ```

use gateway_api::{routes, AppConfig, AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let config = AppConfig::load()?;
    let addr = config.socket_addr()?;
    let is_prod = config.is_production();

    info!("Environment: {}", config.environment);
    match config.rng_seed {
        Some(seed) => info!("Invoice processor seeded with {}", seed),
        None => info!("Invoice processor using thread RNG"),
    }

    let state = AppState::new(config);
    let app = routes::create_router(state);

    info!("Gateway starting on http://{}", addr);

    if !is_prod {
        info!("Register: POST http://{}/accounts", addr);
        info!("Invoices: POST http://{}/invoice (X-API-KEY)", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_banner() {
    println!(
        r#"
  Payment Gateway Simulator
  ━━━━━━━━━━━━━━━━━━━━━━━━━
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
