use chrono::{DateTime, NaiveDate, Utc};
use shared::dto::{HourTypeDto, MemberDto};
use sqlx::{PgExecutor, Pool, Postgres};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    #[error("illegal args for query: {0}")]
    IllegalArgs(String),
}

#[derive(sqlx::FromRow)]
pub struct MemberRollupRecord {
    pub badge_num: i32,
    pub first_name: String,
    pub last_name: String,
    pub standby: i64,
    pub collateralduty: i64,
    pub sleepin: i64,
}

#[derive(sqlx::FromRow)]
pub struct StandByRecord {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub losap_valid: bool,
}

#[derive(sqlx::FromRow)]
pub struct CollateralDutyRecord {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub description: String,
    pub losap_valid: bool,
}

#[derive(sqlx::FromRow)]
pub struct SleepInRecord {
    pub id: Uuid,
    pub date: NaiveDate,
}

fn check_window<T: PartialOrd + std::fmt::Debug>(window: Option<&(T, T)>) -> Result<(), QueryError> {
    if let Some((start, end)) = window {
        if end <= start {
            return Err(QueryError::IllegalArgs(format!(
                "end must be greater than start. end = {end:?}. start = {start:?}"
            )));
        }
    }
    Ok(())
}

/// Escapes LIKE wildcards in a user-supplied term and wraps it for a
/// substring match.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{escaped}%")
}

pub async fn get_hour_types(pool: &Pool<Postgres>) -> Result<Vec<HourTypeDto>, QueryError> {
    sqlx::query_as::<_, HourTypeDto>(
        r"
        SELECT name, min_hours
        FROM hour_types
        ORDER BY name
        ",
    )
    .fetch_all(pool)
    .await
    .map_err(QueryError::Sql)
}

pub async fn get_hour_type(
    executor: impl PgExecutor<'_>,
    name: &str,
) -> Result<Option<HourTypeDto>, QueryError> {
    sqlx::query_as::<_, HourTypeDto>(
        r"
        SELECT name, min_hours
        FROM hour_types
        WHERE name = $1
        ",
    )
    .bind(name)
    .fetch_optional(executor)
    .await
    .map_err(QueryError::Sql)
}

pub async fn get_member(
    executor: impl PgExecutor<'_>,
    badge_num: i32,
) -> Result<Option<MemberDto>, QueryError> {
    sqlx::query_as::<_, MemberDto>(
        r"
        SELECT badge_num, first_name, last_name
        FROM members
        WHERE badge_num = $1
        ",
    )
    .bind(badge_num)
    .fetch_optional(executor)
    .await
    .map_err(QueryError::Sql)
}

pub async fn search_members(
    pool: &Pool<Postgres>,
    term: &str,
) -> Result<Vec<MemberDto>, QueryError> {
    sqlx::query_as::<_, MemberDto>(
        r"
        SELECT badge_num, first_name, last_name
        FROM members
        WHERE first_name ILIKE $1
           OR last_name ILIKE $1
           OR badge_num::text LIKE $1
        ORDER BY last_name, first_name, badge_num
        ",
    )
    .bind(like_pattern(term))
    .fetch_all(pool)
    .await
    .map_err(QueryError::Sql)
}

/// Per-member counts of creditable entries. Stand-bys and collateral
/// duties count when LOSAP-valid and starting inside the instant
/// window; sleep-ins count when their night falls inside the date
/// window. `None` windows mean all-time.
pub async fn get_losap_rollup(
    pool: &Pool<Postgres>,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    date_window: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<MemberRollupRecord>, QueryError> {
    check_window(window.as_ref())?;
    check_window(date_window.as_ref())?;

    sqlx::query_as::<_, MemberRollupRecord>(
        r"
        SELECT
            m.badge_num,
            m.first_name,
            m.last_name,
            (SELECT COUNT(*)
               FROM stand_bys s
              WHERE s.badge_num = m.badge_num
                AND s.losap_valid
                AND ($1::timestamptz IS NULL OR (s.start_time >= $1 AND s.start_time < $2))
            ) AS standby,
            (SELECT COUNT(*)
               FROM collateral_duties c
              WHERE c.badge_num = m.badge_num
                AND c.losap_valid
                AND ($1::timestamptz IS NULL OR (c.start_time >= $1 AND c.start_time < $2))
            ) AS collateralduty,
            (SELECT COUNT(*)
               FROM sleep_ins si
              WHERE si.badge_num = m.badge_num
                AND ($3::date IS NULL OR (si.date >= $3 AND si.date < $4))
            ) AS sleepin
        FROM members m
        ORDER BY m.last_name, m.first_name, m.badge_num
        ",
    )
    .bind(window.map(|w| w.0))
    .bind(window.map(|w| w.1))
    .bind(date_window.map(|w| w.0))
    .bind(date_window.map(|w| w.1))
    .fetch_all(pool)
    .await
    .map_err(QueryError::Sql)
}

pub async fn get_member_stand_bys(
    pool: &Pool<Postgres>,
    badge_num: i32,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> Result<Vec<StandByRecord>, QueryError> {
    check_window(window.as_ref())?;

    sqlx::query_as::<_, StandByRecord>(
        r"
        SELECT id, start_time, end_time, losap_valid
        FROM stand_bys
        WHERE badge_num = $1
          AND ($2::timestamptz IS NULL OR (start_time >= $2 AND start_time < $3))
        ORDER BY start_time
        ",
    )
    .bind(badge_num)
    .bind(window.map(|w| w.0))
    .bind(window.map(|w| w.1))
    .fetch_all(pool)
    .await
    .map_err(QueryError::Sql)
}

pub async fn get_member_collateral_duties(
    pool: &Pool<Postgres>,
    badge_num: i32,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> Result<Vec<CollateralDutyRecord>, QueryError> {
    check_window(window.as_ref())?;

    sqlx::query_as::<_, CollateralDutyRecord>(
        r"
        SELECT id, start_time, end_time, description, losap_valid
        FROM collateral_duties
        WHERE badge_num = $1
          AND ($2::timestamptz IS NULL OR (start_time >= $2 AND start_time < $3))
        ORDER BY start_time
        ",
    )
    .bind(badge_num)
    .bind(window.map(|w| w.0))
    .bind(window.map(|w| w.1))
    .fetch_all(pool)
    .await
    .map_err(QueryError::Sql)
}

pub async fn get_member_sleep_ins(
    pool: &Pool<Postgres>,
    badge_num: i32,
    date_window: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<SleepInRecord>, QueryError> {
    check_window(date_window.as_ref())?;

    sqlx::query_as::<_, SleepInRecord>(
        r"
        SELECT id, date
        FROM sleep_ins
        WHERE badge_num = $1
          AND ($2::date IS NULL OR (date >= $2 AND date < $3))
        ORDER BY date
        ",
    )
    .bind(badge_num)
    .bind(date_window.map(|w| w.0))
    .bind(date_window.map(|w| w.1))
    .fetch_all(pool)
    .await
    .map_err(QueryError::Sql)
}

/// Serializes entry creation per member for the rest of the
/// transaction, so two concurrent submissions cannot both pass the
/// overlap checks against a snapshot that excludes the other.
pub async fn lock_member_entries(
    executor: impl PgExecutor<'_>,
    badge_num: i32,
) -> Result<(), QueryError> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(i64::from(badge_num))
        .execute(executor)
        .await
        .map_err(QueryError::Sql)?;
    Ok(())
}

pub async fn get_member_stand_by_windows(
    executor: impl PgExecutor<'_>,
    badge_num: i32,
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, QueryError> {
    sqlx::query_as::<_, (DateTime<Utc>, DateTime<Utc>)>(
        r"
        SELECT start_time, end_time
        FROM stand_bys
        WHERE badge_num = $1
        ",
    )
    .bind(badge_num)
    .fetch_all(executor)
    .await
    .map_err(QueryError::Sql)
}

pub async fn get_member_collateral_duty_windows(
    executor: impl PgExecutor<'_>,
    badge_num: i32,
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, QueryError> {
    sqlx::query_as::<_, (DateTime<Utc>, DateTime<Utc>)>(
        r"
        SELECT start_time, end_time
        FROM collateral_duties
        WHERE badge_num = $1
        ",
    )
    .bind(badge_num)
    .fetch_all(executor)
    .await
    .map_err(QueryError::Sql)
}

pub async fn get_member_sleep_in_dates(
    executor: impl PgExecutor<'_>,
    badge_num: i32,
) -> Result<Vec<NaiveDate>, QueryError> {
    sqlx::query_scalar::<_, NaiveDate>(
        r"
        SELECT date
        FROM sleep_ins
        WHERE badge_num = $1
        ",
    )
    .bind(badge_num)
    .fetch_all(executor)
    .await
    .map_err(QueryError::Sql)
}

pub async fn sleep_in_exists(
    executor: impl PgExecutor<'_>,
    badge_num: i32,
    date: NaiveDate,
) -> Result<bool, QueryError> {
    sqlx::query_scalar::<_, bool>(
        r"
        SELECT EXISTS (
            SELECT 1
            FROM sleep_ins
            WHERE badge_num = $1 AND date = $2
        )
        ",
    )
    .bind(badge_num)
    .bind(date)
    .fetch_one(executor)
    .await
    .map_err(QueryError::Sql)
}

pub async fn insert_stand_by(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    badge_num: i32,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    losap_valid: bool,
) -> Result<(), QueryError> {
    sqlx::query(
        r"
        INSERT INTO stand_bys (id, badge_num, start_time, end_time, losap_valid)
        VALUES ($1, $2, $3, $4, $5)
        ",
    )
    .bind(id)
    .bind(badge_num)
    .bind(start_time)
    .bind(end_time)
    .bind(losap_valid)
    .execute(executor)
    .await
    .map_err(QueryError::Sql)?;
    Ok(())
}

pub async fn insert_collateral_duty(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    badge_num: i32,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    description: &str,
    losap_valid: bool,
) -> Result<(), QueryError> {
    sqlx::query(
        r"
        INSERT INTO collateral_duties (id, badge_num, start_time, end_time, description, losap_valid)
        VALUES ($1, $2, $3, $4, $5, $6)
        ",
    )
    .bind(id)
    .bind(badge_num)
    .bind(start_time)
    .bind(end_time)
    .bind(description)
    .bind(losap_valid)
    .execute(executor)
    .await
    .map_err(QueryError::Sql)?;
    Ok(())
}

pub async fn insert_sleep_in(
    executor: impl PgExecutor<'_>,
    id: Uuid,
    badge_num: i32,
    date: NaiveDate,
) -> Result<(), QueryError> {
    sqlx::query(
        r"
        INSERT INTO sleep_ins (id, badge_num, date)
        VALUES ($1, $2, $3)
        ",
    )
    .bind(id)
    .bind(badge_num)
    .bind(date)
    .execute(executor)
    .await
    .map_err(QueryError::Sql)?;
    Ok(())
}
