use crate::api::db::queries::{self, QueryError};
use crate::api::error::ApiError;
use crate::state::{Db, Report};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, NaiveDate, Utc};
use shared::dto::{MemberHourEntryDto, NewHourEntryDto};
use shared::hours::{self, HourCategory};
use sqlx::{Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

pub async fn create_stand_by(
    State(db): State<Db>,
    State(report): State<Report>,
    Json(body): Json<NewHourEntryDto>,
) -> Result<impl IntoResponse, ApiError> {
    create_entry(&db, report, HourCategory::StandBy, body).await
}

pub async fn create_collateral_duty(
    State(db): State<Db>,
    State(report): State<Report>,
    Json(body): Json<NewHourEntryDto>,
) -> Result<impl IntoResponse, ApiError> {
    create_entry(&db, report, HourCategory::CollateralDuty, body).await
}

pub async fn create_sleep_in(
    State(db): State<Db>,
    State(report): State<Report>,
    Json(body): Json<NewHourEntryDto>,
) -> Result<impl IntoResponse, ApiError> {
    create_entry(&db, report, HourCategory::SleepIn, body).await
}

async fn create_entry(
    db: &Db,
    report: Report,
    endpoint: HourCategory,
    body: NewHourEntryDto,
) -> Result<(StatusCode, Json<MemberHourEntryDto>), ApiError> {
    ensure_category_matches(endpoint, &body)?;

    let badge_num = body.badge_num();
    if queries::get_member(&db.pool, badge_num).await?.is_none() {
        return Err(ApiError::MemberNotFound(badge_num));
    }

    let mut tx = db.pool.begin().await.map_err(QueryError::from)?;
    queries::lock_member_entries(&mut *tx, badge_num).await?;

    let created = match body {
        NewHourEntryDto::StandBy {
            start_time,
            end_time,
            ..
        } => {
            let losap_valid = validate_timed_entry(
                &mut tx,
                report,
                badge_num,
                HourCategory::StandBy,
                start_time,
                end_time,
            )
            .await?;
            let id = Uuid::now_v7();
            queries::insert_stand_by(&mut *tx, id, badge_num, start_time, end_time, losap_valid)
                .await?;
            MemberHourEntryDto::StandBy {
                id,
                start_time,
                end_time,
                losap_valid,
            }
        }
        NewHourEntryDto::CollateralDuty {
            start_time,
            end_time,
            description,
            ..
        } => {
            let losap_valid = validate_timed_entry(
                &mut tx,
                report,
                badge_num,
                HourCategory::CollateralDuty,
                start_time,
                end_time,
            )
            .await?;
            let id = Uuid::now_v7();
            queries::insert_collateral_duty(
                &mut *tx,
                id,
                badge_num,
                start_time,
                end_time,
                &description,
                losap_valid,
            )
            .await?;
            MemberHourEntryDto::CollateralDuty {
                id,
                start_time,
                end_time,
                description,
                losap_valid,
            }
        }
        NewHourEntryDto::SleepIn { date, .. } => {
            validate_sleep_in(&mut tx, report, badge_num, date).await?;
            let id = Uuid::now_v7();
            queries::insert_sleep_in(&mut *tx, id, badge_num, date).await?;
            MemberHourEntryDto::SleepIn { id, date }
        }
    };

    tx.commit().await.map_err(QueryError::from)?;
    info!(badge_num, category = %endpoint, "hour entry recorded");

    Ok((StatusCode::CREATED, Json(created)))
}

fn ensure_category_matches(endpoint: HourCategory, body: &NewHourEntryDto) -> Result<(), ApiError> {
    if body.category() == endpoint {
        Ok(())
    } else {
        Err(ApiError::CategoryMismatch {
            body: body.category(),
            endpoint,
        })
    }
}

/// Checks a stand-by or collateral duty against the member's existing
/// entries and returns whether it earns LOSAP credit.
async fn validate_timed_entry(
    tx: &mut Transaction<'_, Postgres>,
    report: Report,
    badge_num: i32,
    category: HourCategory,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<bool, ApiError> {
    if end_time <= start_time {
        return Err(ApiError::EndNotAfterStart);
    }
    ensure_no_overlap(tx, report, badge_num, category, (start_time, end_time)).await?;

    let min_hours = queries::get_hour_type(&mut **tx, category.display_name())
        .await?
        .ok_or(ApiError::UnknownHourType(category.display_name()))?
        .min_hours;
    Ok(hours::meets_minimum(end_time - start_time, min_hours))
}

async fn validate_sleep_in(
    tx: &mut Transaction<'_, Postgres>,
    report: Report,
    badge_num: i32,
    date: NaiveDate,
) -> Result<(), ApiError> {
    if queries::sleep_in_exists(&mut **tx, badge_num, date).await? {
        return Err(ApiError::DuplicateSleepIn);
    }
    let window = hours::sleep_in_window(date, report.timezone)
        .ok_or(ApiError::UnmappableDate(date))?;
    ensure_no_overlap(tx, report, badge_num, HourCategory::SleepIn, window).await
}

async fn ensure_no_overlap(
    tx: &mut Transaction<'_, Postgres>,
    report: Report,
    badge_num: i32,
    new_category: HourCategory,
    window: (DateTime<Utc>, DateTime<Utc>),
) -> Result<(), ApiError> {
    for date in queries::get_member_sleep_in_dates(&mut **tx, badge_num).await? {
        if let Some(existing) = hours::sleep_in_window(date, report.timezone) {
            if hours::ranges_overlap(window, existing) {
                return Err(ApiError::Overlap {
                    new: new_category,
                    existing: HourCategory::SleepIn,
                });
            }
        }
    }
    for existing in queries::get_member_stand_by_windows(&mut **tx, badge_num).await? {
        if hours::ranges_overlap(window, existing) {
            return Err(ApiError::Overlap {
                new: new_category,
                existing: HourCategory::StandBy,
            });
        }
    }
    for existing in queries::get_member_collateral_duty_windows(&mut **tx, badge_num).await? {
        if hours::ranges_overlap(window, existing) {
            return Err(ApiError::Overlap {
                new: new_category,
                existing: HourCategory::CollateralDuty,
            });
        }
    }
    Ok(())
}
