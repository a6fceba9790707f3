// crates/core/src/types.rs
//! Domain types for the habit-tracking data a stats request reads.
//!
//! Everything here is plain data, detached from any database row type. Every
//! tagged value (habit status, category, metric type, ...) is a closed enum
//! with a stable text form used for storage.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::DomainError;

/// Calendar date format used for storage and wire payloads.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| DomainError::InvalidDate {
        value: value.to_string(),
    })
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Implements `as_str`, `Display` and `FromStr` over a fixed text table.
macro_rules! text_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($ty::$variant),)+
                    other => Err(DomainError::unknown($kind, other)),
                }
            }
        }
    };
}

// ============================================================================
// Habits
// ============================================================================

/// Outcome recorded for one habit on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitStatus {
    Completed,
    Skipped,
    Partial,
    Failed,
}

text_enum!(HabitStatus, "habit status", {
    Completed => "COMPLETED",
    Skipped => "SKIPPED",
    Partial => "PARTIAL",
    Failed => "FAILED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitCategory {
    Fitness,
    Nutrition,
    Sleep,
    Hydration,
    Mindset,
    Recovery,
    Other,
}

text_enum!(HabitCategory, "habit category", {
    Fitness => "FITNESS",
    Nutrition => "NUTRITION",
    Sleep => "SLEEP",
    Hydration => "HYDRATION",
    Mindset => "MINDSET",
    Recovery => "RECOVERY",
    Other => "OTHER",
});

/// One day's recorded outcome for a habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitEntry {
    pub date: NaiveDate,
    pub status: HabitStatus,
}

/// A streak marker kept by the write path; `is_active` is true for the run
/// still in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitStreak {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub length: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub category: HabitCategory,
    /// Entries, most recent first.
    pub entries: Vec<HabitEntry>,
    pub streaks: Vec<HabitStreak>,
}

impl Habit {
    pub fn completed_entries(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == HabitStatus::Completed)
            .count()
    }

    pub fn has_active_streak(&self) -> bool {
        self.streaks.iter().any(|s| s.is_active)
    }
}

/// Per-user, per-day habit completion summary. At most one per (user, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyScore {
    pub date: NaiveDate,
    pub total_points: i64,
    pub completed_habits: i64,
    pub total_habits: i64,
}

// ============================================================================
// Body metrics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricType {
    Weight,
    BodyFat,
    MuscleMass,
}

text_enum!(MetricType, "metric type", {
    Weight => "WEIGHT",
    BodyFat => "BODY_FAT",
    MuscleMass => "MUSCLE_MASS",
});

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressMetric {
    pub metric_type: MetricType,
    pub value: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// Achievements, programmes, tasks, challenges
// ============================================================================

/// An achievement the user has unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievement {
    pub achievement_id: String,
    pub name: String,
    pub description: Option<String>,
    #[ts(type = "number")]
    pub points: i64,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgrammeStatus {
    Active,
    Completed,
    Paused,
}

text_enum!(ProgrammeStatus, "programme status", {
    Active => "ACTIVE",
    Completed => "COMPLETED",
    Paused => "PAUSED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Approved,
    Rejected,
}

text_enum!(TaskStatus, "task status", {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    Active,
    Completed,
    Failed,
}

text_enum!(ChallengeStatus, "challenge status", {
    Active => "ACTIVE",
    Completed => "COMPLETED",
    Failed => "FAILED",
});

/// Programme enrolment counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct ProgrammeCounts {
    #[ts(type = "number")]
    pub completed: i64,
    #[ts(type = "number")]
    pub active: i64,
}

// ============================================================================
// User aggregate
// ============================================================================

/// Everything the stats aggregator reads for one user, loaded up front.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserSnapshot {
    pub user_id: String,
    pub display_name: String,
    /// All daily scores, most recent first.
    pub daily_scores: Vec<DailyScore>,
    pub habits: Vec<Habit>,
    /// Most recent measurement per metric type.
    pub latest_metrics: Vec<ProgressMetric>,
    /// Most recently unlocked achievements, newest first (top 5).
    pub recent_achievements: Vec<UnlockedAchievement>,
    /// Total unlocked achievements, not just the recent slice.
    pub total_achievements: i64,
    pub programmes: ProgrammeCounts,
    pub completed_tasks: i64,
    pub completed_challenges: i64,
}

impl UserSnapshot {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    pub fn latest_metric(&self, metric_type: MetricType) -> Option<&ProgressMetric> {
        self.latest_metrics
            .iter()
            .filter(|m| m.metric_type == metric_type)
            .max_by_key(|m| m.recorded_at)
    }
}
