use crate::api::db::queries::QueryError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use shared::hours::{HourCategory, ScopeError};
use thiserror::Error;
use tracing::warn;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    #[serde(serialize_with = "serialize_status")]
    pub status_code: StatusCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("member {0} not found")]
    MemberNotFound(i32),
    #[error("a {body} entry cannot be submitted to the {endpoint} endpoint")]
    CategoryMismatch {
        body: HourCategory,
        endpoint: HourCategory,
    },
    #[error("{new} cannot overlap with a {existing}")]
    Overlap {
        new: HourCategory,
        existing: HourCategory,
    },
    #[error("Sleep In cannot be the same day as another Sleep In")]
    DuplicateSleepIn,
    #[error("end time must be after start time")]
    EndNotAfterStart,
    #[error("{0} does not map to a valid overnight window")]
    UnmappableDate(NaiveDate),
    #[error("hour type {0} is not configured")]
    UnknownHourType(&'static str),
    #[error("search term must be at least {0} characters")]
    SearchTermTooShort(usize),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MemberNotFound(badge_num) => {
                warn!(badge_num, "member not found");
                ErrorMessage::from((
                    StatusCode::NOT_FOUND,
                    format!("member {badge_num} not found"),
                ))
                .into_response()
            }
            ApiError::CategoryMismatch { body, endpoint } => {
                warn!(body = %body, endpoint = %endpoint, "entry category does not match endpoint");
                ErrorMessage::from((
                    StatusCode::BAD_REQUEST,
                    format!("a {body} entry cannot be submitted to the {endpoint} endpoint"),
                ))
                .into_response()
            }
            ApiError::Overlap { new, existing } => {
                warn!(new = %new, existing = %existing, "overlapping entry rejected");
                ErrorMessage::from((
                    StatusCode::BAD_REQUEST,
                    format!("{new} cannot overlap with a {existing}"),
                ))
                .into_response()
            }
            ApiError::DuplicateSleepIn => {
                warn!("duplicate sleep-in rejected");
                ErrorMessage::from((
                    StatusCode::BAD_REQUEST,
                    "Sleep In cannot be the same day as another Sleep In",
                ))
                .into_response()
            }
            ApiError::EndNotAfterStart => {
                warn!("entry with non-positive duration rejected");
                ErrorMessage::from((StatusCode::BAD_REQUEST, "end time must be after start time"))
                    .into_response()
            }
            ApiError::UnmappableDate(date) => {
                warn!(%date, "date does not map to a valid overnight window");
                ErrorMessage::from((
                    StatusCode::BAD_REQUEST,
                    format!("{date} does not map to a valid overnight window"),
                ))
                .into_response()
            }
            ApiError::UnknownHourType(name) => {
                warn!(name, "hour type missing from reference table");
                ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, "")).into_response()
            }
            ApiError::SearchTermTooShort(min) => {
                ErrorMessage::from((
                    StatusCode::BAD_REQUEST,
                    format!("search term must be at least {min} characters"),
                ))
                .into_response()
            }
            ApiError::Scope(e) => {
                warn!(error = %e, "invalid report scope");
                ErrorMessage::from((StatusCode::BAD_REQUEST, e.to_string())).into_response()
            }
            ApiError::Query(e) => match e {
                QueryError::Sql(e) => {
                    warn!(error = ?e, "sql error");
                    ErrorMessage::from((StatusCode::INTERNAL_SERVER_ERROR, "")).into_response()
                }
                QueryError::IllegalArgs(e) => {
                    warn!(error = e, "illegal arguments for Db query");
                    ErrorMessage::from((StatusCode::BAD_REQUEST, e)).into_response()
                }
            },
        }
    }
}

fn serialize_status<S>(value: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(value.as_u16())
}

impl From<(StatusCode, String)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, String)) -> Self {
        Self {
            status_code,
            message,
        }
    }
}

impl From<(StatusCode, &str)> for ErrorMessage {
    fn from((status_code, message): (StatusCode, &str)) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ErrorMessage {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
