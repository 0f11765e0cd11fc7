use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::hours::ScopeError;
use thiserror::Error;
use tracing::warn;

use crate::layout;

#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Upstream(#[from] reqwest::Error),
    #[error(transparent)]
    Scope(#[from] ScopeError),
    #[error("invalid {field} value {value:?}")]
    Filter { field: &'static str, value: String },
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Upstream(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                warn!(name: "portal.not_found", error = %e, "upstream resource not found");
                (StatusCode::NOT_FOUND, "No such member.".to_string())
            }
            Self::Upstream(e) => {
                warn!(name: "portal.upstream_error", error = %e, "hours API request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "The hours service is currently unavailable.".to_string(),
                )
            }
            Self::Scope(e) => {
                warn!(name: "portal.bad_scope", error = %e, "request addressed an invalid reporting period");
                (
                    StatusCode::NOT_FOUND,
                    format!("Not a valid reporting period: {e}."),
                )
            }
            Self::Filter { .. } => {
                warn!(name: "portal.bad_filter", error = %self, "filter form carried an invalid value");
                (StatusCode::BAD_REQUEST, self.to_string())
            }
        };
        (status, layout::error_page(status, &message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_errors_render_as_not_found_pages() {
        let response = PortalError::Scope(ScopeError::InvalidMonth(13)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn filter_errors_are_bad_requests() {
        let response = PortalError::Filter {
            field: "year",
            value: "20x4".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
