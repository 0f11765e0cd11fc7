use axum::Router;
use axum::routing::get;

use crate::pages::{home, log_hours, losap_hours, members};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { home::home_page() }))
        .route(
            "/log-hours",
            get(log_hours::show_form).post(log_hours::submit),
        )
        .route("/losap-hours", get(losap_hours::all_time))
        // The year page is addressable with and without the trailing slash.
        .route("/losap-hours/{year}", get(losap_hours::for_year))
        .route("/losap-hours/{year}/", get(losap_hours::for_year))
        .route("/losap-hours/{year}/{month}", get(losap_hours::for_month))
        .route("/member-hour", get(members::search_page))
        .route("/member-hour/{badge_num}", get(members::member_page))
        .route(
            "/member-hour/{badge_num}/{year}",
            get(members::member_year_page),
        )
        .route(
            "/member-hour/{badge_num}/{year}/{month}",
            get(members::member_month_page),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppState, Report};
    use crate::test_support::{FakeApi, client_for, start_fake_api};
    use chrono_tz::Tz::UTC;

    async fn start_portal() -> (String, FakeApi) {
        let (api_addr, fake) = start_fake_api().await;
        let state = AppState {
            api: client_for(api_addr),
            report: Report { timezone: UTC },
        };
        let app = Router::new().merge(router()).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), fake)
    }

    async fn get_text(url: String) -> String {
        reqwest::get(url).await.unwrap().text().await.unwrap()
    }

    #[tokio::test]
    async fn losap_hours_page_renders_the_rollup_rows() {
        let (base, _fake) = start_portal().await;
        let body = get_text(format!("{base}/losap-hours/2024/3")).await;
        assert!(body.contains("March 2024 LOSAP Hours"));
        assert!(body.contains("<tr><td>J Doe</td><td>2</td><td>0</td><td>5</td></tr>"));
    }

    #[tokio::test]
    async fn year_page_accepts_a_trailing_slash() {
        let (base, _fake) = start_portal().await;
        let body = get_text(format!("{base}/losap-hours/2024/")).await;
        assert!(body.contains("2024 LOSAP Hours"));
    }

    #[tokio::test]
    async fn filter_submission_redirects_to_the_scoped_page() {
        let (base, _fake) = start_portal().await;
        let response = reqwest::get(format!("{base}/losap-hours?year=2024&month=3"))
            .await
            .unwrap();
        // reqwest follows the redirect; the final URL is the canonical path.
        assert!(response.url().path().ends_with("/losap-hours/2024/3"));
    }

    #[tokio::test]
    async fn entry_form_shows_description_only_for_collateral_duty() {
        let (base, _fake) = start_portal().await;
        let collateral = get_text(format!("{base}/log-hours?type=Collateral%20Duty")).await;
        assert!(collateral.contains("name=\"description\""));
        let stand_by = get_text(format!("{base}/log-hours?type=Stand%20By")).await;
        assert!(!stand_by.contains("name=\"description\""));
        assert!(stand_by.contains("name=\"startDateTime\""));
    }

    #[tokio::test]
    async fn submitting_the_form_lands_back_with_a_notice() {
        let (base, _fake) = start_portal().await;
        let client = reqwest::Client::new();
        let body = client
            .post(format!("{base}/log-hours"))
            .form(&[
                ("type", "Stand By"),
                ("badge_num", "12345"),
                ("startDateTime", "2023-10-02T10:00"),
                ("endDateTime", "2023-10-02T13:59"),
            ])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Stand By entry recorded."));
    }

    #[tokio::test]
    async fn rejected_submission_shows_the_api_message() {
        let (base, _fake) = start_portal().await;
        let client = reqwest::Client::new();
        let body = client
            .post(format!("{base}/log-hours"))
            .form(&[
                ("type", "Sleep In"),
                ("badge_num", "12345"),
                ("date", "2023-10-02"),
            ])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(body.contains("Sleep In cannot be the same day as another Sleep In"));
    }

    #[tokio::test]
    async fn member_search_renders_profile_links() {
        let (base, _fake) = start_portal().await;
        let body = get_text(format!("{base}/member-hour?search=smi")).await;
        assert!(body.contains("<a href=\"/member-hour/12345\">Smith, John(12345)</a>"));
    }

    #[tokio::test]
    async fn short_search_terms_issue_no_request() {
        let (base, fake) = start_portal().await;
        let body = get_text(format!("{base}/member-hour?search=ab")).await;
        assert!(!body.contains("search-results"));
        assert!(fake.request_log().is_empty());
    }

    #[tokio::test]
    async fn member_page_shows_the_combined_entries() {
        let (base, _fake) = start_portal().await;
        let body = get_text(format!("{base}/member-hour/12345/2023/10")).await;
        assert!(body.contains("Smith, John(12345)"));
        assert!(body.contains("October 2023 LOSAP Hours"));
        assert!(body.contains(
            "<td>Stand By</td><td>2023-10-02 10:00</td><td>2023-10-02 13:59</td><td>Yes</td>"
        ));
        assert!(body.contains("<td>Sleep In</td><td>2023-10-03</td>"));
    }

    #[tokio::test]
    async fn unknown_member_is_a_not_found_page() {
        let (base, _fake) = start_portal().await;
        let response = reqwest::get(format!("{base}/member-hour/99999")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        assert!(response.text().await.unwrap().contains("No such member."));
    }

    #[tokio::test]
    async fn invalid_month_in_the_path_is_not_found() {
        let (base, _fake) = start_portal().await;
        let response = reqwest::get(format!("{base}/losap-hours/2024/13")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
