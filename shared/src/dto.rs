//! Wire types shared between the hours API and the portal. JSON field
//! names here are the interface; renames are explicit rather than
//! blanket so the serialized names cannot drift.

use crate::hours::HourCategory;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HourTypeDto {
    pub name: String,
    pub min_hours: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemberDto {
    pub badge_num: i32,
    pub first_name: String,
    pub last_name: String,
}

impl MemberDto {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }

    #[must_use]
    pub fn full_member(&self) -> String {
        format!("{}, {}({})", self.last_name, self.first_name, self.badge_num)
    }
}

/// One row of the per-member rollup. Counts are creditable shifts or
/// nights, not clock hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberHoursSummaryDto {
    pub member: String,
    pub collateralduty: i64,
    pub sleepin: i64,
    pub standby: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LosapHoursDto {
    pub members_hours: Vec<MemberHoursSummaryDto>,
}

/// Submission body for the three creation endpoints, tagged by the
/// category display name so payload shape and category can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NewHourEntryDto {
    #[serde(rename = "Stand By")]
    StandBy {
        badge_num: i32,
        #[serde(rename = "startDateTime")]
        start_time: DateTime<Utc>,
        #[serde(rename = "endDateTime")]
        end_time: DateTime<Utc>,
    },
    #[serde(rename = "Collateral Duty")]
    CollateralDuty {
        badge_num: i32,
        #[serde(rename = "startDateTime")]
        start_time: DateTime<Utc>,
        #[serde(rename = "endDateTime")]
        end_time: DateTime<Utc>,
        description: String,
    },
    #[serde(rename = "Sleep In")]
    SleepIn { badge_num: i32, date: NaiveDate },
}

impl NewHourEntryDto {
    #[must_use]
    pub const fn category(&self) -> HourCategory {
        match self {
            Self::StandBy { .. } => HourCategory::StandBy,
            Self::CollateralDuty { .. } => HourCategory::CollateralDuty,
            Self::SleepIn { .. } => HourCategory::SleepIn,
        }
    }

    #[must_use]
    pub const fn badge_num(&self) -> i32 {
        match *self {
            Self::StandBy { badge_num, .. }
            | Self::CollateralDuty { badge_num, .. }
            | Self::SleepIn { badge_num, .. } => badge_num,
        }
    }
}

/// A stored entry as returned by the creation endpoints and the
/// member-detail combined listing, tagged by category slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum MemberHourEntryDto {
    #[serde(rename = "stand-by")]
    StandBy {
        id: Uuid,
        #[serde(rename = "startDateTime")]
        start_time: DateTime<Utc>,
        #[serde(rename = "endDateTime")]
        end_time: DateTime<Utc>,
        #[serde(rename = "losapValid")]
        losap_valid: bool,
    },
    #[serde(rename = "collateral-duty")]
    CollateralDuty {
        id: Uuid,
        #[serde(rename = "startDateTime")]
        start_time: DateTime<Utc>,
        #[serde(rename = "endDateTime")]
        end_time: DateTime<Utc>,
        description: String,
        #[serde(rename = "losapValid")]
        losap_valid: bool,
    },
    #[serde(rename = "sleep-in")]
    SleepIn { id: Uuid, date: NaiveDate },
}

impl MemberHourEntryDto {
    #[must_use]
    pub const fn category(&self) -> HourCategory {
        match self {
            Self::StandBy { .. } => HourCategory::StandBy,
            Self::CollateralDuty { .. } => HourCategory::CollateralDuty,
            Self::SleepIn { .. } => HourCategory::SleepIn,
        }
    }
}
