use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::PortalConfig;
use shared::dto::{HourTypeDto, LosapHoursDto, MemberDto, MemberHourEntryDto, NewHourEntryDto};
use shared::hours::ReportScope;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Outcome of posting an hour entry. A rejection is the API answering
/// with a structured error, as opposed to the transport failing.
#[derive(Debug)]
pub enum SubmitOutcome {
    Created(MemberHourEntryDto),
    Rejected { status: StatusCode, message: String },
}

/// Error body shape the hours API produces.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Typed client for the hours API. Every successful round trip stamps
/// `last_contact`, which the health endpoint reports.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    last_contact: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl ApiClient {
    pub fn new(config: &PortalConfig) -> Result<Self, reqwest::Error> {
        let timeout = config
            .request_timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            last_contact: Arc::new(RwLock::new(None)),
        })
    }

    pub fn last_contact(&self) -> Option<DateTime<Utc>> {
        *self.last_contact.read()
    }

    fn mark_contact(&self) {
        *self.last_contact.write() = Some(Utc::now());
    }

    pub async fn health(&self) -> Result<(), reqwest::Error> {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        self.mark_contact();
        Ok(())
    }

    pub async fn get_hour_types(&self) -> Result<Vec<HourTypeDto>, reqwest::Error> {
        self.get_json(&format!("{}/api/hour-type", self.base_url))
            .await
    }

    pub async fn get_losap_hours(
        &self,
        scope: ReportScope,
    ) -> Result<LosapHoursDto, reqwest::Error> {
        self.get_json(&format!("{}{}", self.base_url, scope.api_path()))
            .await
    }

    pub async fn search_members(&self, term: &str) -> Result<Vec<MemberDto>, reqwest::Error> {
        let members = self
            .client
            .get(format!("{}/api/member/", self.base_url))
            .query(&[("search", term)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        self.mark_contact();
        Ok(members)
    }

    pub async fn get_member(&self, badge_num: i32) -> Result<MemberDto, reqwest::Error> {
        self.get_json(&format!("{}/api/member/{badge_num}", self.base_url))
            .await
    }

    pub async fn get_member_hours(
        &self,
        badge_num: i32,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Vec<MemberHourEntryDto>, reqwest::Error> {
        let mut request = self
            .client
            .get(format!("{}/api/member/{badge_num}/hours/", self.base_url));
        if let Some(year) = year {
            request = request.query(&[("year", year)]);
        }
        if let Some(month) = month {
            request = request.query(&[("month", month)]);
        }
        let entries = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        self.mark_contact();
        Ok(entries)
    }

    /// Posts an entry to the endpoint its category owns. A non-success
    /// status is surfaced as a rejection carrying the API's message.
    pub async fn create_entry(
        &self,
        entry: &NewHourEntryDto,
    ) -> Result<SubmitOutcome, reqwest::Error> {
        let url = format!(
            "{}/api{}",
            self.base_url,
            entry.category().submit_path()
        );
        let response = self.client.post(url).json(entry).send().await?;
        let status = response.status();
        if status.is_success() {
            let created = response.json::<MemberHourEntryDto>().await?;
            self.mark_contact();
            return Ok(SubmitOutcome::Created(created));
        }
        let message = response.json::<ApiErrorBody>().await.map_or_else(
            |_| {
                status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string()
            },
            |body| body.message,
        );
        self.mark_contact();
        Ok(SubmitOutcome::Rejected { status, message })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, reqwest::Error> {
        let value = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        self.mark_contact();
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_for, start_fake_api};
    use chrono::Month;

    #[tokio::test]
    async fn search_hits_the_documented_path() {
        let (addr, fake) = start_fake_api().await;
        let client = client_for(addr);
        let members = client.search_members("smi").await.unwrap();
        assert_eq!(fake.request_log(), vec!["GET /api/member/?search=smi"]);
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].badge_num, 12345);
    }

    #[tokio::test]
    async fn rollup_requests_follow_the_scope_paths() {
        let (addr, fake) = start_fake_api().await;
        let client = client_for(addr);
        client.get_losap_hours(ReportScope::AllTime).await.unwrap();
        client.get_losap_hours(ReportScope::Year(2024)).await.unwrap();
        client
            .get_losap_hours(ReportScope::Month {
                year: 2024,
                month: Month::March,
            })
            .await
            .unwrap();
        assert_eq!(
            fake.request_log(),
            vec![
                "GET /api/losap-hours/",
                "GET /api/losap-hours/2024/",
                "GET /api/losap-hours/2024/3/",
            ]
        );
    }

    #[tokio::test]
    async fn hour_types_keep_server_order() {
        let (addr, _fake) = start_fake_api().await;
        let client = client_for(addr);
        let types = client.get_hour_types().await.unwrap();
        let names: Vec<_> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Collateral Duty", "Sleep In", "Stand By"]);
    }

    #[tokio::test]
    async fn submission_posts_to_the_category_endpoint() {
        let (addr, fake) = start_fake_api().await;
        let client = client_for(addr);
        let entry = NewHourEntryDto::StandBy {
            badge_num: 12345,
            start_time: "2023-10-02T10:00:00Z".parse().unwrap(),
            end_time: "2023-10-02T13:59:00Z".parse().unwrap(),
        };
        let outcome = client.create_entry(&entry).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created(_)));
        assert_eq!(fake.request_log(), vec!["POST /api/stand-by"]);
    }

    #[tokio::test]
    async fn rejection_surfaces_the_api_message() {
        let (addr, _fake) = start_fake_api().await;
        let client = client_for(addr);
        let entry = NewHourEntryDto::SleepIn {
            badge_num: 12345,
            date: "2023-10-02".parse().unwrap(),
        };
        match client.create_entry(&entry).await.unwrap() {
            SubmitOutcome::Rejected { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(message, "Sleep In cannot be the same day as another Sleep In");
            }
            SubmitOutcome::Created(created) => panic!("unexpected success: {created:?}"),
        }
    }

    #[tokio::test]
    async fn member_hours_carry_scope_query_parameters() {
        let (addr, fake) = start_fake_api().await;
        let client = client_for(addr);
        client
            .get_member_hours(12345, Some(2024), Some(3))
            .await
            .unwrap();
        client.get_member_hours(12345, None, None).await.unwrap();
        assert_eq!(
            fake.request_log(),
            vec![
                "GET /api/member/12345/hours/?year=2024&month=3",
                "GET /api/member/12345/hours/",
            ]
        );
    }

    #[tokio::test]
    async fn successful_round_trips_stamp_last_contact() {
        let (addr, _fake) = start_fake_api().await;
        let client = client_for(addr);
        assert!(client.last_contact().is_none());
        client.health().await.unwrap();
        assert!(client.last_contact().is_some());
    }

    #[tokio::test]
    async fn member_lookup_propagates_upstream_not_found() {
        let (addr, _fake) = start_fake_api().await;
        let client = client_for(addr);
        let err = client.get_member(99999).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }
}
