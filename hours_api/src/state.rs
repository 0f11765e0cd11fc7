use axum::extract::FromRef;
use chrono_tz::Tz;
use sqlx::{Pool, Postgres};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Db,
    pub report: Report,
}

#[derive(Clone)]
pub struct Db {
    pub pool: Pool<Postgres>,
}

/// Reporting parameters shared by every aggregation handler.
#[derive(Clone, Copy)]
pub struct Report {
    pub timezone: Tz,
}
