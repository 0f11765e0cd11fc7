use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use shared::dto::MemberHourEntryDto;
use shared::hours::ReportScope;
use tracing::warn;

use crate::client::ApiClient;
use crate::components::Notice;
use crate::components::member_search::MemberSearchState;
use crate::components::navbar::NavTarget;
use crate::error::PortalError;
use crate::layout;
use crate::layout::escape;
use crate::pages::losap_hours::{FilterParams, requested_scope};
use crate::state::Report;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    search: Option<String>,
}

pub async fn search_page(
    State(api): State<ApiClient>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let mut search = MemberSearchState::default();
    let mut notice = None;
    if let Some(raw) = params.search.as_deref() {
        if let Some((seq, term)) = search.observe_input(raw) {
            match api.search_members(&term).await {
                Ok(members) => {
                    search.apply_results(seq, members);
                }
                Err(e) => {
                    warn!(name: "member_search.fetch_failed", error = %e, "member search failed");
                    notice = Some(Notice::Error(
                        "Member search is currently unavailable.".to_string(),
                    ));
                }
            }
        }
    }
    let mut body = String::from("<h2>Member Search</h2>\n");
    if let Some(notice) = notice {
        body.push_str(&notice.render());
        body.push('\n');
    }
    body.push_str(&search.render());
    layout::page("Member Search", Some(NavTarget::MemberSearch), &body)
}

pub async fn member_page(
    State(api): State<ApiClient>,
    State(report): State<Report>,
    Path(badge_num): Path<i32>,
    Query(params): Query<FilterParams>,
) -> Result<Response, PortalError> {
    if let Some(scope) = requested_scope(&params)? {
        return Ok(Redirect::to(&member_scope_path(badge_num, scope)).into_response());
    }
    Ok(render_member(&api, report, badge_num, None, None)
        .await?
        .into_response())
}

pub async fn member_year_page(
    State(api): State<ApiClient>,
    State(report): State<Report>,
    Path((badge_num, year)): Path<(i32, i32)>,
) -> Result<Html<String>, PortalError> {
    render_member(&api, report, badge_num, Some(year), None).await
}

pub async fn member_month_page(
    State(api): State<ApiClient>,
    State(report): State<Report>,
    Path((badge_num, year, month)): Path<(i32, i32, u32)>,
) -> Result<Html<String>, PortalError> {
    render_member(&api, report, badge_num, Some(year), Some(month)).await
}

fn member_scope_path(badge_num: i32, scope: ReportScope) -> String {
    match scope {
        ReportScope::AllTime => format!("/member-hour/{badge_num}"),
        ReportScope::Year(year) => format!("/member-hour/{badge_num}/{year}"),
        ReportScope::Month { year, month } => {
            format!("/member-hour/{badge_num}/{year}/{}", month.number_from_month())
        }
    }
}

/// Member detail: the record plus the combined entry listing. With no
/// scope in the path, the current month in the report timezone is
/// shown, matching the API's own default.
async fn render_member(
    api: &ApiClient,
    report: Report,
    badge_num: i32,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Html<String>, PortalError> {
    let scope = match (year, month) {
        (None, None) => ReportScope::current_month(Utc::now(), report.timezone),
        (year, month) => ReportScope::from_parts(year, month)?,
    };
    let member = api.get_member(badge_num).await?;

    let (scope_year, scope_month) = match scope {
        ReportScope::AllTime => (None, None),
        ReportScope::Year(year) => (Some(year), None),
        ReportScope::Month { year, month } => (Some(year), Some(month.number_from_month())),
    };
    let entries = match api.get_member_hours(badge_num, scope_year, scope_month).await {
        Ok(entries) => Some(entries),
        Err(e) => {
            warn!(name: "member_hours.fetch_failed", error = %e, "member hours fetch failed");
            None
        }
    };

    let mut body = format!("<h2>{}</h2>\n", escape(&member.full_member()));
    body.push_str(&format!("<h3>{}</h3>\n", scope.header_label()));
    body.push_str(&filter_form(badge_num, scope));
    match entries {
        Some(entries) => body.push_str(&render_entries(&entries, report.timezone)),
        None => {
            body.push_str(
                &Notice::Error("Hour records are currently unavailable.".to_string()).render(),
            );
            body.push('\n');
        }
    }
    Ok(layout::page(
        &member.full_name(),
        Some(NavTarget::MemberSearch),
        &body,
    ))
}

fn filter_form(badge_num: i32, scope: ReportScope) -> String {
    let (year_value, month_value) = match scope {
        ReportScope::AllTime => (String::new(), String::new()),
        ReportScope::Year(year) => (year.to_string(), String::new()),
        ReportScope::Month { year, month } => {
            (year.to_string(), month.number_from_month().to_string())
        }
    };
    format!(
        "<form id=\"member-filter-form\" method=\"get\" action=\"/member-hour/{badge_num}\">\n\
         <label for=\"filter-year\">Year</label>\n\
         <input id=\"filter-year\" name=\"year\" type=\"number\" value=\"{year_value}\" required>\n\
         <label for=\"filter-month\">Month</label>\n\
         <input id=\"filter-month\" name=\"month\" type=\"number\" min=\"1\" max=\"12\" value=\"{month_value}\">\n\
         <button type=\"submit\">Filter</button>\n\
         <a href=\"/member-hour/{badge_num}\">Current month</a>\n\
         </form>\n"
    )
}

fn render_entries(entries: &[MemberHourEntryDto], tz: Tz) -> String {
    if entries.is_empty() {
        return "<p>No hours recorded for this period.</p>\n".to_string();
    }
    let mut out = String::from(
        "<table id=\"member-hours-table\">\n<thead>\n\
         <tr><th>Type</th><th>Start</th><th>End</th><th>LOSAP</th><th>Description</th></tr>\n\
         </thead>\n<tbody>\n",
    );
    for entry in entries {
        let kind = entry.category().display_name();
        let row = match entry {
            MemberHourEntryDto::StandBy {
                start_time,
                end_time,
                losap_valid,
                ..
            } => format!(
                "<tr><td>{kind}</td><td>{}</td><td>{}</td><td>{}</td><td></td></tr>\n",
                format_local(*start_time, tz),
                format_local(*end_time, tz),
                yes_no(*losap_valid),
            ),
            MemberHourEntryDto::CollateralDuty {
                start_time,
                end_time,
                description,
                losap_valid,
                ..
            } => format!(
                "<tr><td>{kind}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                format_local(*start_time, tz),
                format_local(*end_time, tz),
                yes_no(*losap_valid),
                escape(description),
            ),
            // Sleep-ins have no minimum, so every night counts.
            MemberHourEntryDto::SleepIn { date, .. } => format!(
                "<tr><td>{kind}</td><td>{date}</td><td></td><td>Yes</td><td></td></tr>\n"
            ),
        };
        out.push_str(&row);
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn format_local(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

const fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
