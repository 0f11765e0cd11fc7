#![warn(clippy::pedantic)]

mod client;
mod components;
mod error;
mod health;
mod layout;
mod pages;
mod state;
#[cfg(test)]
mod test_support;

use crate::client::ApiClient;
use crate::state::{AppState, Report};
use axum::{Router, routing::get};
use shared::error::InitializationError;
use shared::{load_config, report_timezone};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    let timezone = report_timezone(&config)?;
    let portal = config
        .portal
        .ok_or(InitializationError::MissingSection("portal"))?;
    let api = ApiClient::new(&portal)?;

    let state = AppState {
        api,
        report: Report { timezone },
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .merge(pages::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    const LISTEN_ADDR: &str = "0.0.0.0:8081";
    info!("starting portal at {LISTEN_ADDR}");
    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shared::shutdown_listener(None))
        .await?;

    Ok(())
}
