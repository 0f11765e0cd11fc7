use axum::extract::FromRef;
use chrono_tz::Tz;

use crate::client::ApiClient;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub api: ApiClient,
    pub report: Report,
}

/// Timezone the portal interprets entered local times in and formats
/// entry timestamps with. Matches the API's report boundaries.
#[derive(Clone, Copy)]
pub struct Report {
    pub timezone: Tz,
}
