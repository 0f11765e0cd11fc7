//! In-process stand-in for the hours API. Client and page tests point
//! an `ApiClient` at it and assert against the canned data and the
//! request log.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use parking_lot::RwLock;
use serde_json::json;
use shared::PortalConfig;

use crate::client::ApiClient;

#[derive(Clone, Default)]
pub struct FakeApi {
    requests: Arc<RwLock<Vec<String>>>,
}

impl FakeApi {
    pub fn request_log(&self) -> Vec<String> {
        self.requests.read().clone()
    }
}

pub async fn start_fake_api() -> (SocketAddr, FakeApi) {
    let fake = FakeApi::default();
    let app = Router::new().fallback(respond).with_state(fake.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, fake)
}

pub fn client_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(&PortalConfig {
        api_base_url: format!("http://{addr}"),
        request_timeout_seconds: Some(2),
    })
    .unwrap()
}

async fn respond(State(fake): State<FakeApi>, method: Method, uri: Uri) -> Response {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_owned(), ToString::to_string);
    fake.requests.write().push(format!("{method} {target}"));
    route(&method, uri.path())
}

fn route(method: &Method, path: &str) -> Response {
    if *method == Method::POST {
        return match path {
            "/api/stand-by" => (
                StatusCode::CREATED,
                Json(json!({
                    "kind": "stand-by",
                    "id": "01924d13-0914-7dd8-9fbd-64b39fd2f8c9",
                    "startDateTime": "2023-10-02T10:00:00Z",
                    "endDateTime": "2023-10-02T13:59:00Z",
                    "losapValid": true,
                })),
            )
                .into_response(),
            "/api/sleep-in" => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "statusCode": 400,
                    "message": "Sleep In cannot be the same day as another Sleep In",
                })),
            )
                .into_response(),
            _ => StatusCode::NOT_FOUND.into_response(),
        };
    }
    match path {
        "/health" => StatusCode::OK.into_response(),
        "/api/hour-type" => Json(json!([
            {"name": "Collateral Duty", "min_hours": 4},
            {"name": "Sleep In", "min_hours": null},
            {"name": "Stand By", "min_hours": 4},
        ]))
        .into_response(),
        "/api/member/" => Json(json!([
            {"badge_num": 12345, "first_name": "John", "last_name": "Smith"},
        ]))
        .into_response(),
        "/api/member/12345" => Json(json!(
            {"badge_num": 12345, "first_name": "John", "last_name": "Smith"}
        ))
        .into_response(),
        "/api/member/12345/hours/" => Json(json!([
            {
                "kind": "stand-by",
                "id": "01924d13-0914-7dd8-9fbd-64b39fd2f8c9",
                "startDateTime": "2023-10-02T10:00:00Z",
                "endDateTime": "2023-10-02T13:59:00Z",
                "losapValid": true,
            },
            {
                "kind": "sleep-in",
                "id": "01924d13-2e45-7f5c-8b85-6f7962e4f312",
                "date": "2023-10-03",
            },
        ]))
        .into_response(),
        p if p.starts_with("/api/losap-hours/") => Json(json!({
            "members_hours": [
                {"member": "J Doe", "collateralduty": 2, "sleepin": 0, "standby": 5},
            ]
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}
