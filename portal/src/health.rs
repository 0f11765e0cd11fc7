use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::client::ApiClient;

/// Liveness probe. Reports reachability of the hours API together
/// with the time of the last successful round trip.
pub async fn health_check(State(api): State<ApiClient>) -> impl IntoResponse {
    match api.health().await {
        Ok(()) => (StatusCode::OK, "OK".to_string()),
        Err(e) => {
            let last_contact = api
                .last_contact()
                .map_or_else(|| "never".to_string(), |at| at.to_rfc3339());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Hours API is unreachable: {e}. Last successful contact: {last_contact}"),
            )
        }
    }
}
