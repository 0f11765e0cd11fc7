use crate::api::db::queries;
use crate::api::error::ApiError;
use crate::state::{Db, Report};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use shared::MIN_SEARCH_LEN;
use shared::dto::MemberHourEntryDto;
use shared::hours::{self, ReportScope};

#[derive(Deserialize)]
pub struct SearchParams {
    search: Option<String>,
}

pub async fn search_members(
    State(db): State<Db>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let term = params.search.as_deref().map(str::trim).unwrap_or_default();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Err(ApiError::SearchTermTooShort(MIN_SEARCH_LEN));
    }

    let members = queries::search_members(&db.pool, term).await?;
    Ok((StatusCode::OK, Json(members)))
}

pub async fn get_member(
    State(db): State<Db>,
    Path(badge_num): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    match queries::get_member(&db.pool, badge_num).await? {
        Some(member) => Ok((StatusCode::OK, Json(member))),
        None => Err(ApiError::MemberNotFound(badge_num)),
    }
}

#[derive(Deserialize)]
pub struct HoursParams {
    year: Option<i32>,
    month: Option<u32>,
}

/// Combined chronological listing of a member's entries. With no scope
/// parameters the current month (in the report timezone) is used.
pub async fn get_member_hours(
    State(db): State<Db>,
    State(report): State<Report>,
    Path(badge_num): Path<i32>,
    Query(params): Query<HoursParams>,
) -> Result<impl IntoResponse, ApiError> {
    if queries::get_member(&db.pool, badge_num).await?.is_none() {
        return Err(ApiError::MemberNotFound(badge_num));
    }

    let scope = if params.year.is_none() && params.month.is_none() {
        ReportScope::current_month(Utc::now(), report.timezone)
    } else {
        ReportScope::from_parts(params.year, params.month)?
    };
    let window = scope.utc_window(report.timezone)?;
    let date_window = scope.date_window()?;

    let mut entries = Vec::new();
    for record in queries::get_member_stand_bys(&db.pool, badge_num, window).await? {
        entries.push(MemberHourEntryDto::StandBy {
            id: record.id,
            start_time: record.start_time,
            end_time: record.end_time,
            losap_valid: record.losap_valid,
        });
    }
    for record in queries::get_member_collateral_duties(&db.pool, badge_num, window).await? {
        entries.push(MemberHourEntryDto::CollateralDuty {
            id: record.id,
            start_time: record.start_time,
            end_time: record.end_time,
            description: record.description,
            losap_valid: record.losap_valid,
        });
    }
    for record in queries::get_member_sleep_ins(&db.pool, badge_num, date_window).await? {
        entries.push(MemberHourEntryDto::SleepIn {
            id: record.id,
            date: record.date,
        });
    }
    entries.sort_by_key(|entry| entry_start(entry, report.timezone));

    Ok((StatusCode::OK, Json(entries)))
}

fn entry_start(entry: &MemberHourEntryDto, tz: Tz) -> DateTime<Utc> {
    match entry {
        MemberHourEntryDto::StandBy { start_time, .. }
        | MemberHourEntryDto::CollateralDuty { start_time, .. } => *start_time,
        MemberHourEntryDto::SleepIn { date, .. } => hours::sleep_in_window(*date, tz).map_or_else(
            || Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            |(start, _)| start,
        ),
    }
}
