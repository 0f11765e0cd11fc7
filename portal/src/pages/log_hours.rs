use axum::Form;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use shared::dto::NewHourEntryDto;
use shared::hours::HourCategory;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ApiClient, SubmitOutcome};
use crate::components::Notice;
use crate::components::entry_form::EntryFormState;
use crate::components::navbar::NavTarget;
use crate::error::PortalError;
use crate::layout;
use crate::state::Report;

#[derive(Debug, Deserialize)]
pub struct FormQuery {
    #[serde(rename = "type")]
    hour_type: Option<String>,
    submitted: Option<String>,
}

/// Raw submission as the browser sends it. Everything arrives as text;
/// `build_entry` decides which fields the selected category needs.
#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
    #[serde(rename = "type")]
    hour_type: Option<String>,
    badge_num: Option<String>,
    #[serde(rename = "startDateTime")]
    start_time: Option<String>,
    #[serde(rename = "endDateTime")]
    end_time: Option<String>,
    description: Option<String>,
    date: Option<String>,
}

pub async fn show_form(
    State(api): State<ApiClient>,
    Query(params): Query<FormQuery>,
) -> Html<String> {
    let (hour_types, fetch_failed) = match api.get_hour_types().await {
        Ok(types) => (types, false),
        Err(e) => {
            warn!(name: "log_hours.types_fetch_failed", error = %e, "hour type fetch failed");
            (Vec::new(), true)
        }
    };
    let mut form = EntryFormState::new(hour_types);
    if let Some(name) = params.hour_type.as_deref() {
        form.select(name);
    }
    if fetch_failed {
        form.set_notice(Notice::Error(
            "Hour types are currently unavailable.".to_string(),
        ));
    } else if let Some(category) = params.submitted.as_deref().and_then(HourCategory::from_slug) {
        form.set_notice(Notice::Success(format!("{category} entry recorded.")));
    }
    layout::page("Log Hours", Some(NavTarget::LogHours), &form.render())
}

pub async fn submit(
    State(api): State<ApiClient>,
    State(report): State<Report>,
    Form(form): Form<EntryForm>,
) -> Result<Response, PortalError> {
    let entry = match build_entry(&form, report.timezone) {
        Ok(entry) => entry,
        Err(e) => {
            return Ok(rerender_with_error(&api, &form, &e.to_string())
                .await
                .into_response());
        }
    };
    match api.create_entry(&entry).await? {
        SubmitOutcome::Created(created) => {
            info!(name: "entry.submitted", response = ?created, "hour entry recorded");
            let back = format!("/log-hours?submitted={}", entry.category().slug());
            Ok(Redirect::to(&back).into_response())
        }
        SubmitOutcome::Rejected { status, message } => {
            warn!(name: "entry.rejected", status = %status, message = %message, "hour entry rejected");
            Ok(rerender_with_error(&api, &form, &message)
                .await
                .into_response())
        }
    }
}

async fn rerender_with_error(api: &ApiClient, form: &EntryForm, message: &str) -> Html<String> {
    let hour_types = match api.get_hour_types().await {
        Ok(types) => types,
        Err(e) => {
            warn!(name: "log_hours.types_fetch_failed", error = %e, "hour type fetch failed");
            Vec::new()
        }
    };
    let mut state = EntryFormState::new(hour_types);
    if let Some(name) = form.hour_type.as_deref() {
        state.select(name);
    }
    state.set_notice(Notice::Error(message.to_string()));
    layout::page("Log Hours", Some(NavTarget::LogHours), &state.render())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("select an hour type before submitting")]
    NoCategory,
    #[error("{0:?} is not a loggable hour type")]
    UnknownCategory(String),
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be a number")]
    BadNumber(&'static str),
    #[error("{0} must be a date and time")]
    BadDateTime(&'static str),
    #[error("{0} must be a date")]
    BadDate(&'static str),
    #[error("{0} does not exist in the report timezone")]
    UnmappableLocal(&'static str),
}

/// Assembles the submission payload. Which fields are read is decided
/// solely by the selected category, so a value left over from a
/// previously selected category is dropped rather than sent.
fn build_entry(form: &EntryForm, tz: Tz) -> Result<NewHourEntryDto, FormError> {
    let name = non_empty(form.hour_type.as_deref()).ok_or(FormError::NoCategory)?;
    let category = HourCategory::from_display_name(name)
        .ok_or_else(|| FormError::UnknownCategory(name.to_string()))?;
    let badge_num = non_empty(form.badge_num.as_deref())
        .ok_or(FormError::Missing("badge number"))?
        .parse::<i32>()
        .map_err(|_| FormError::BadNumber("badge number"))?;

    Ok(match category {
        HourCategory::StandBy => NewHourEntryDto::StandBy {
            badge_num,
            start_time: local_field(form.start_time.as_deref(), "start time", tz)?,
            end_time: local_field(form.end_time.as_deref(), "end time", tz)?,
        },
        HourCategory::CollateralDuty => NewHourEntryDto::CollateralDuty {
            badge_num,
            start_time: local_field(form.start_time.as_deref(), "start time", tz)?,
            end_time: local_field(form.end_time.as_deref(), "end time", tz)?,
            description: non_empty(form.description.as_deref())
                .ok_or(FormError::Missing("description"))?
                .to_string(),
        },
        HourCategory::SleepIn => NewHourEntryDto::SleepIn {
            badge_num,
            date: non_empty(form.date.as_deref())
                .ok_or(FormError::Missing("date"))?
                .parse()
                .map_err(|_| FormError::BadDate("date"))?,
        },
    })
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parses a datetime-local input (seconds optional) and anchors it in
/// the report timezone.
fn local_field(
    raw: Option<&str>,
    field: &'static str,
    tz: Tz,
) -> Result<DateTime<Utc>, FormError> {
    let raw = non_empty(raw).ok_or(FormError::Missing(field))?;
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| FormError::BadDateTime(field))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(FormError::UnmappableLocal(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;
    use chrono_tz::Tz::UTC;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn stand_by_form_builds_a_stand_by_payload() {
        let form = EntryForm {
            hour_type: Some("Stand By".to_string()),
            badge_num: Some("12345".to_string()),
            start_time: Some("2023-10-02T10:00".to_string()),
            end_time: Some("2023-10-02T13:59".to_string()),
            ..EntryForm::default()
        };
        assert_eq!(
            build_entry(&form, UTC),
            Ok(NewHourEntryDto::StandBy {
                badge_num: 12345,
                start_time: utc("2023-10-02T10:00:00Z"),
                end_time: utc("2023-10-02T13:59:00Z"),
            })
        );
    }

    #[test]
    fn leftover_description_is_dropped_outside_collateral_duty() {
        let form = EntryForm {
            hour_type: Some("Stand By".to_string()),
            badge_num: Some("12345".to_string()),
            start_time: Some("2023-10-02T10:00".to_string()),
            end_time: Some("2023-10-02T13:59".to_string()),
            description: Some("typed before switching category".to_string()),
            ..EntryForm::default()
        };
        // The Stand By variant has no description field to carry it.
        assert!(matches!(
            build_entry(&form, UTC),
            Ok(NewHourEntryDto::StandBy { .. })
        ));
    }

    #[test]
    fn collateral_duty_requires_a_description() {
        let mut form = EntryForm {
            hour_type: Some("Collateral Duty".to_string()),
            badge_num: Some("12345".to_string()),
            start_time: Some("2023-10-02T10:00".to_string()),
            end_time: Some("2023-10-02T13:59".to_string()),
            ..EntryForm::default()
        };
        assert_eq!(build_entry(&form, UTC), Err(FormError::Missing("description")));

        form.description = Some("Truck maintenance".to_string());
        assert!(matches!(
            build_entry(&form, UTC),
            Ok(NewHourEntryDto::CollateralDuty { description, .. }) if description == "Truck maintenance"
        ));
    }

    #[test]
    fn sleep_in_form_needs_only_badge_and_date() {
        let form = EntryForm {
            hour_type: Some("Sleep In".to_string()),
            badge_num: Some("12345".to_string()),
            date: Some("2023-10-02".to_string()),
            ..EntryForm::default()
        };
        assert_eq!(
            build_entry(&form, UTC),
            Ok(NewHourEntryDto::SleepIn {
                badge_num: 12345,
                date: "2023-10-02".parse().unwrap(),
            })
        );
    }

    #[test]
    fn unknown_and_missing_categories_are_rejected() {
        let mut form = EntryForm {
            hour_type: Some("Overtime".to_string()),
            badge_num: Some("12345".to_string()),
            ..EntryForm::default()
        };
        assert_eq!(
            build_entry(&form, UTC),
            Err(FormError::UnknownCategory("Overtime".to_string()))
        );

        form.hour_type = Some("  ".to_string());
        assert_eq!(build_entry(&form, UTC), Err(FormError::NoCategory));
    }

    #[test]
    fn badge_number_must_parse() {
        let form = EntryForm {
            hour_type: Some("Sleep In".to_string()),
            badge_num: Some("12a45".to_string()),
            date: Some("2023-10-02".to_string()),
            ..EntryForm::default()
        };
        assert_eq!(
            build_entry(&form, UTC),
            Err(FormError::BadNumber("badge number"))
        );
    }

    #[test]
    fn entered_times_are_anchored_in_the_report_timezone() {
        let form = EntryForm {
            hour_type: Some("Stand By".to_string()),
            badge_num: Some("12345".to_string()),
            start_time: Some("2024-01-15T19:00".to_string()),
            end_time: Some("2024-01-15T23:30".to_string()),
            ..EntryForm::default()
        };
        let Ok(NewHourEntryDto::StandBy { start_time, .. }) = build_entry(&form, New_York) else {
            panic!("expected a stand by payload");
        };
        // 19:00 Eastern in January is midnight UTC
        assert_eq!(start_time, utc("2024-01-16T00:00:00Z"));
    }

    #[test]
    fn seconds_are_accepted_when_present() {
        assert_eq!(
            local_field(Some("2023-10-02T10:00:30"), "start time", UTC),
            Ok(utc("2023-10-02T10:00:30Z"))
        );
        assert_eq!(
            local_field(Some("10am"), "start time", UTC),
            Err(FormError::BadDateTime("start time"))
        );
    }

    #[test]
    fn nonexistent_local_times_are_rejected() {
        // The 2024 US spring-forward skips 02:30 Eastern entirely.
        assert_eq!(
            local_field(Some("2024-03-10T02:30"), "start time", New_York),
            Err(FormError::UnmappableLocal("start time"))
        );
    }
}
