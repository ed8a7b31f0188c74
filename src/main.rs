// src/main.rs
mod auth;
mod config;
mod database;
mod dtos;
mod error;
mod handlers;
mod middleware;
mod routes;
mod state;
mod store;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::process::ExitCode;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::auth::TokenService;
use crate::config::AppConfig;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let store = match database::connect_store(&config.store).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Error connecting to the document store");
            return ExitCode::FAILURE;
        }
    };

    let tokens = TokenService::new(config.signing_secret.as_deref());
    if !tokens.has_secret() {
        tracing::warn!("ACCESS_TOKEN is not set; token issuance will fail and every credential will be rejected");
    }

    // Create application state
    let app_state = state::AppState::new(store, tokens);
    let app = routes::create_router(&app_state).with_state(app_state);

    // Try base_port..base_port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => { bound = Some((l, addr)); break; }
                Err(e) => {
                    if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Bistro Boss is running on {}", addr);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", config.port, config.host);
                return ExitCode::FAILURE;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
