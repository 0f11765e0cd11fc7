use crate::api::db::queries;
use crate::api::error::ApiError;
use crate::state::{Db, Report};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use shared::dto::{LosapHoursDto, MemberDto, MemberHoursSummaryDto};
use shared::hours::ReportScope;

pub async fn get_losap_hours_all_time(
    State(db): State<Db>,
    State(report): State<Report>,
) -> Result<impl IntoResponse, ApiError> {
    rollup(&db, report, ReportScope::AllTime).await
}

pub async fn get_losap_hours_for_year(
    State(db): State<Db>,
    State(report): State<Report>,
    Path(year): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    rollup(&db, report, ReportScope::from_parts(Some(year), None)?).await
}

pub async fn get_losap_hours_for_month(
    State(db): State<Db>,
    State(report): State<Report>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, ApiError> {
    rollup(&db, report, ReportScope::from_parts(Some(year), Some(month))?).await
}

async fn rollup(
    db: &Db,
    report: Report,
    scope: ReportScope,
) -> Result<(StatusCode, Json<LosapHoursDto>), ApiError> {
    let window = scope.utc_window(report.timezone)?;
    let date_window = scope.date_window()?;

    let records = queries::get_losap_rollup(&db.pool, window, date_window).await?;
    let members_hours = records
        .into_iter()
        .map(|r| {
            let member = MemberDto {
                badge_num: r.badge_num,
                first_name: r.first_name,
                last_name: r.last_name,
            };
            MemberHoursSummaryDto {
                member: member.full_name(),
                collateralduty: r.collateralduty,
                sleepin: r.sleepin,
                standby: r.standby,
            }
        })
        .collect();

    Ok((StatusCode::OK, Json(LosapHoursDto { members_hours })))
}
