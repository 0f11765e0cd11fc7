#![warn(clippy::pedantic)]

mod api;
mod state;

use crate::state::{AppState, Db, Report};
use axum::http::StatusCode;
use axum::{Router, routing::get};
use shared::error::InitializationError;
use shared::{initialize_db, load_config, report_timezone};
use tower_http::cors::{Any, CorsLayer};
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
    let postgres = config
        .postgres
        .ok_or(InitializationError::MissingSection("postgres"))?;
    let pool = initialize_db(&postgres, true).await?;

    let state = AppState {
        db: Db { pool },
        report: Report { timezone },
    };

    let app = Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/api", api::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    const LISTEN_ADDR: &str = "0.0.0.0:8080";
    info!("starting server at {LISTEN_ADDR}");
    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shared::shutdown_listener(None))
        .await?;

    Ok(())
}
