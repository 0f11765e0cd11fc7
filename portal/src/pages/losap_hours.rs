use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use shared::hours::ReportScope;
use tracing::warn;

use crate::client::ApiClient;
use crate::components::hours_table::HoursTableState;
use crate::components::navbar::NavTarget;
use crate::error::PortalError;
use crate::layout;

/// Filter form values. Kept as raw text so an empty input is treated
/// as absent instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct FilterParams {
    year: Option<String>,
    month: Option<String>,
}

/// The scope a filter submission asks for, if it asks for one at all.
pub fn requested_scope(params: &FilterParams) -> Result<Option<ReportScope>, PortalError> {
    let year = parse_part::<i32>(params.year.as_deref(), "year")?;
    let month = parse_part::<u32>(params.month.as_deref(), "month")?;
    if year.is_none() && month.is_none() {
        return Ok(None);
    }
    Ok(Some(ReportScope::from_parts(year, month)?))
}

fn parse_part<T: std::str::FromStr>(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<T>, PortalError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(|_| PortalError::Filter {
            field,
            value: s.to_string(),
        }),
    }
}

pub async fn all_time(
    State(api): State<ApiClient>,
    Query(params): Query<FilterParams>,
) -> Result<Response, PortalError> {
    if let Some(scope) = requested_scope(&params)? {
        return Ok(Redirect::to(&scope.page_path()).into_response());
    }
    Ok(render_scope(&api, ReportScope::AllTime).await.into_response())
}

pub async fn for_year(
    State(api): State<ApiClient>,
    Path(year): Path<i32>,
) -> Html<String> {
    render_scope(&api, ReportScope::Year(year)).await
}

pub async fn for_month(
    State(api): State<ApiClient>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<Html<String>, PortalError> {
    let scope = ReportScope::from_parts(Some(year), Some(month))?;
    Ok(render_scope(&api, scope).await)
}

async fn render_scope(api: &ApiClient, scope: ReportScope) -> Html<String> {
    let rows = match api.get_losap_hours(scope).await {
        Ok(data) => Some(data.members_hours),
        Err(e) => {
            warn!(name: "losap_hours.fetch_failed", error = %e, "rollup fetch failed");
            None
        }
    };
    let table = HoursTableState::new(scope, rows);
    layout::page(
        &scope.header_label(),
        Some(NavTarget::LosapHours),
        &table.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    fn params(year: Option<&str>, month: Option<&str>) -> FilterParams {
        FilterParams {
            year: year.map(ToString::to_string),
            month: month.map(ToString::to_string),
        }
    }

    #[test]
    fn blank_filter_asks_for_nothing() {
        assert!(matches!(requested_scope(&params(None, None)), Ok(None)));
        assert!(matches!(
            requested_scope(&params(Some(""), Some("  "))),
            Ok(None)
        ));
    }

    #[test]
    fn year_and_month_resolve_to_a_month_scope() {
        assert!(matches!(
            requested_scope(&params(Some("2024"), Some("3"))),
            Ok(Some(ReportScope::Month {
                year: 2024,
                month: Month::March
            }))
        ));
        assert!(matches!(
            requested_scope(&params(Some("2024"), None)),
            Ok(Some(ReportScope::Year(2024)))
        ));
    }

    #[test]
    fn month_alone_is_an_error() {
        assert!(matches!(
            requested_scope(&params(None, Some("3"))),
            Err(PortalError::Scope(_))
        ));
    }

    #[test]
    fn non_numeric_values_are_rejected_with_the_field_name() {
        match requested_scope(&params(Some("20x4"), None)) {
            Err(PortalError::Filter { field, value }) => {
                assert_eq!(field, "year");
                assert_eq!(value, "20x4");
            }
            other => panic!("expected a filter error, got {other:?}"),
        }
    }
}
