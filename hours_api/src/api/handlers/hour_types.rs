use crate::api::db::queries;
use crate::api::error::ApiError;
use crate::state::Db;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn get_hour_types(State(db): State<Db>) -> Result<impl IntoResponse, ApiError> {
    let hour_types = queries::get_hour_types(&db.pool).await?;
    Ok((StatusCode::OK, Json(hour_types)))
}
