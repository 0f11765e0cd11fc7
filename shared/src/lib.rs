pub mod dto;
pub mod hours;

use crate::error::{ConfigError, InitializationError};
use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

pub const ENV_VAR_PREFIX: &str = "LOSAP__";
pub const SETTINGS_FILE: &str = "Settings.toml";

/// Fallback when no `[report]` section is configured.
pub const DEFAULT_REPORT_TIMEZONE: &str = "UTC";

/// Shortest member-search term either side will act on.
pub const MIN_SEARCH_LEN: usize = 3;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub postgres: Option<PostgresConfig>,
    pub report: Option<ReportConfig>,
    pub portal: Option<PortalConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// IANA timezone name used for month/year report boundaries and the
    /// sleep-in overnight window, e.g. "America/New_York".
    pub timezone: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub request_timeout_seconds: Option<u64>,
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .extract::<Config>()?)
}

/// Resolves the configured report timezone, falling back to UTC when no
/// `[report]` section is present.
pub fn report_timezone(config: &Config) -> Result<Tz, InitializationError> {
    let name = config
        .report
        .as_ref()
        .map_or(DEFAULT_REPORT_TIMEZONE, |r| r.timezone.as_str());
    name.parse::<Tz>()
        .map_err(|_| InitializationError::UnknownTimezone(name.to_string()))
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] ConfigError),
        #[error(transparent)]
        Migration(#[from] sqlx::migrate::MigrateError),
        #[error(transparent)]
        Db(#[from] sqlx::Error),
        #[error("missing configuration section [{0}]")]
        MissingSection(&'static str),
        #[error("unknown report timezone {0}")]
        UnknownTimezone(String),
    }
}

#[instrument]
pub async fn initialize_db(
    pg_config: &PostgresConfig,
    migrate: bool,
) -> Result<Pool<Postgres>, InitializationError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&pg_config.connection_string)
        .await?;

    info!(name: "db.connected", "db pool created and connected");

    // Run any new migrations
    if migrate {
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    Ok(pool)
}

pub async fn shutdown_listener(token: Option<CancellationToken>) {
    let ctrl_c = signal::ctrl_c();
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(name: "signal.ctrlc.received", "received Ctrl+C signal, shutting down"),
        _ = terminate => info!(name: "signal.sigterm.received", "received SIGTERM signal, shutting down"),
    }

    if let Some(token) = token {
        token.cancel();
    }
}
