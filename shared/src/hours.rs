use chrono::{DateTime, Datelike, Duration, Month, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// A duty entry may fall short of the minimum by up to one minute and
/// still earn LOSAP credit.
pub const GRACE_SECONDS: i64 = 60;

const SLEEP_IN_START: (u32, u32) = (19, 0);
const SLEEP_IN_END: (u32, u32) = (6, 59);

/// The three kinds of creditable hours. Display names, URL slugs and
/// submission paths are all derived from the variant so the three can
/// never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourCategory {
    StandBy,
    CollateralDuty,
    SleepIn,
}

impl HourCategory {
    pub const ALL: [HourCategory; 3] = [
        HourCategory::StandBy,
        HourCategory::CollateralDuty,
        HourCategory::SleepIn,
    ];

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::StandBy => "Stand By",
            Self::CollateralDuty => "Collateral Duty",
            Self::SleepIn => "Sleep In",
        }
    }

    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::StandBy => "stand-by",
            Self::CollateralDuty => "collateral-duty",
            Self::SleepIn => "sleep-in",
        }
    }

    /// Path the log-hours form posts to for this category.
    #[must_use]
    pub const fn submit_path(self) -> &'static str {
        match self {
            Self::StandBy => "/stand-by",
            Self::CollateralDuty => "/collateral-duty",
            Self::SleepIn => "/sleep-in",
        }
    }

    #[must_use]
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.display_name() == name)
    }

    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl std::fmt::Display for HourCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("month {0} given without a year")]
    MonthWithoutYear(u32),
    #[error("{0} is not a valid month number")]
    InvalidMonth(u32),
    #[error("scope does not map to a valid date range")]
    InvalidDate,
}

/// Reporting window for hour rollups: everything on record, a calendar
/// year, or a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    AllTime,
    Year(i32),
    Month { year: i32, month: Month },
}

impl ReportScope {
    /// Builds a scope from optional URL path segments. A month is only
    /// meaningful inside a year.
    pub fn from_parts(year: Option<i32>, month: Option<u32>) -> Result<Self, ScopeError> {
        match (year, month) {
            (None, None) => Ok(Self::AllTime),
            (Some(year), None) => Ok(Self::Year(year)),
            (Some(year), Some(m)) => {
                let month = u8::try_from(m)
                    .ok()
                    .and_then(|m| Month::try_from(m).ok())
                    .ok_or(ScopeError::InvalidMonth(m))?;
                Ok(Self::Month { year, month })
            }
            (None, Some(m)) => Err(ScopeError::MonthWithoutYear(m)),
        }
    }

    /// The month containing `now`, observed in the report timezone.
    #[must_use]
    pub fn current_month(now: DateTime<Utc>, tz: Tz) -> Self {
        let local = now.with_timezone(&tz);
        let month = u8::try_from(local.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .unwrap_or(Month::January);
        Self::Month {
            year: local.year(),
            month,
        }
    }

    #[must_use]
    pub fn header_label(&self) -> String {
        match *self {
            Self::AllTime => "All LOSAP Hours".to_string(),
            Self::Year(year) => format!("{year} LOSAP Hours"),
            Self::Month { year, month } => format!("{} {year} LOSAP Hours", month.name()),
        }
    }

    /// API path serving the rollup for this scope.
    #[must_use]
    pub fn api_path(&self) -> String {
        match *self {
            Self::AllTime => "/api/losap-hours/".to_string(),
            Self::Year(year) => format!("/api/losap-hours/{year}/"),
            Self::Month { year, month } => {
                format!("/api/losap-hours/{year}/{}/", month.number_from_month())
            }
        }
    }

    /// Portal page path showing the rollup for this scope.
    #[must_use]
    pub fn page_path(&self) -> String {
        match *self {
            Self::AllTime => "/losap-hours".to_string(),
            Self::Year(year) => format!("/losap-hours/{year}"),
            Self::Month { year, month } => {
                format!("/losap-hours/{year}/{}", month.number_from_month())
            }
        }
    }

    /// Calendar bounds of the scope as a half-open `[start, end)` pair
    /// of dates. `None` means all-time, i.e. no bounds at all.
    pub fn date_window(&self) -> Result<Option<(NaiveDate, NaiveDate)>, ScopeError> {
        match *self {
            Self::AllTime => Ok(None),
            Self::Year(year) => Ok(Some((date(year, 1, 1)?, date(year + 1, 1, 1)?))),
            Self::Month { year, month } => {
                let m = month.number_from_month();
                let end = if m == 12 {
                    date(year + 1, 1, 1)?
                } else {
                    date(year, m + 1, 1)?
                };
                Ok(Some((date(year, m, 1)?, end)))
            }
        }
    }

    /// UTC instants of the scope as a half-open `[start, end)` interval,
    /// with day boundaries taken in the report timezone. `None` means
    /// all-time.
    pub fn utc_window(&self, tz: Tz) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, ScopeError> {
        match self.date_window()? {
            None => Ok(None),
            Some((start, end)) => Ok(Some((
                local_midnight_utc(start, tz)?,
                local_midnight_utc(end, tz)?,
            ))),
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ScopeError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ScopeError::InvalidDate)
}

fn local_midnight_utc(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, ScopeError> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(ScopeError::InvalidDate)
}

/// Whether a duty of the given length earns credit against an optional
/// hour minimum. A `None` minimum always earns credit.
#[must_use]
pub fn meets_minimum(duration: Duration, min_hours: Option<i32>) -> bool {
    match min_hours {
        Some(hours) => duration.num_seconds() >= i64::from(hours) * 3600 - GRACE_SECONDS,
        None => true,
    }
}

/// The overnight window a sleep-in occupies: 19:00 on the night of
/// through 06:59 the next morning, in the report timezone. `None` when
/// the date has no valid successor or the local times cannot be mapped.
#[must_use]
pub fn sleep_in_window(date: NaiveDate, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = tz
        .from_local_datetime(&date.and_hms_opt(SLEEP_IN_START.0, SLEEP_IN_START.1, 0)?)
        .earliest()?;
    let end = tz
        .from_local_datetime(&date.succ_opt()?.and_hms_opt(SLEEP_IN_END.0, SLEEP_IN_END.1, 0)?)
        .earliest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

/// Closed-interval intersection. Ranges that merely touch at an
/// endpoint still count as overlapping.
#[must_use]
pub fn ranges_overlap(a: (DateTime<Utc>, DateTime<Utc>), b: (DateTime<Utc>, DateTime<Utc>)) -> bool {
    a.0 <= b.1 && a.1 >= b.0
}
