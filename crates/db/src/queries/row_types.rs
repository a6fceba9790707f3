// crates/db/src/queries/row_types.rs
// Internal row types and their conversion into domain types.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use gainz_core::{
    parse_date, DailyScore, HabitCategory, HabitEntry, HabitStatus, HabitStreak, MetricType,
    ProgressMetric, UnlockedAchievement,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::{DbError, DbResult};

pub(crate) fn date_col(table: &'static str, column: &'static str, value: &str) -> DbResult<NaiveDate> {
    parse_date(value).map_err(|_| DbError::corrupt(table, column, value))
}

pub(crate) fn enum_col<T: FromStr>(table: &'static str, column: &'static str, value: &str) -> DbResult<T> {
    value
        .parse()
        .map_err(|_| DbError::corrupt(table, column, value))
}

pub(crate) fn instant_col(table: &'static str, column: &'static str, secs: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| DbError::corrupt(table, column, secs))
}

// ============================================================================
// daily_scores
// ============================================================================

#[derive(Debug)]
pub(crate) struct DailyScoreRow {
    date: String,
    total_points: i64,
    completed_habits: i64,
    total_habits: i64,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for DailyScoreRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            date: row.try_get("date")?,
            total_points: row.try_get("total_points")?,
            completed_habits: row.try_get("completed_habits")?,
            total_habits: row.try_get("total_habits")?,
        })
    }
}

impl DailyScoreRow {
    pub(crate) fn into_domain(self) -> DbResult<DailyScore> {
        Ok(DailyScore {
            date: date_col("daily_scores", "date", &self.date)?,
            total_points: self.total_points,
            completed_habits: self.completed_habits,
            total_habits: self.total_habits,
        })
    }
}

// ============================================================================
// habits, habit_entries, habit_streaks
// ============================================================================

#[derive(Debug)]
pub(crate) struct HabitRow {
    pub(crate) id: String,
    pub(crate) name: String,
    category: String,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for HabitRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
        })
    }
}

impl HabitRow {
    pub(crate) fn category(&self) -> DbResult<HabitCategory> {
        enum_col("habits", "category", &self.category)
    }
}

#[derive(Debug)]
pub(crate) struct HabitEntryRow {
    pub(crate) habit_id: String,
    date: String,
    status: String,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for HabitEntryRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            habit_id: row.try_get("habit_id")?,
            date: row.try_get("date")?,
            status: row.try_get("status")?,
        })
    }
}

impl HabitEntryRow {
    pub(crate) fn to_domain(&self) -> DbResult<HabitEntry> {
        Ok(HabitEntry {
            date: date_col("habit_entries", "date", &self.date)?,
            status: enum_col::<HabitStatus>("habit_entries", "status", &self.status)?,
        })
    }
}

#[derive(Debug)]
pub(crate) struct HabitStreakRow {
    pub(crate) habit_id: String,
    start_date: String,
    end_date: Option<String>,
    length: i64,
    is_active: bool,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for HabitStreakRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            habit_id: row.try_get("habit_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            length: row.try_get("length")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

impl HabitStreakRow {
    pub(crate) fn to_domain(&self) -> DbResult<HabitStreak> {
        let end_date = self
            .end_date
            .as_deref()
            .map(|d| date_col("habit_streaks", "end_date", d))
            .transpose()?;
        Ok(HabitStreak {
            start_date: date_col("habit_streaks", "start_date", &self.start_date)?,
            end_date,
            length: self.length,
            is_active: self.is_active,
        })
    }
}

// ============================================================================
// progress_metrics
// ============================================================================

#[derive(Debug)]
pub(crate) struct ProgressMetricRow {
    metric_type: String,
    value: f64,
    unit: String,
    recorded_at: i64,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for ProgressMetricRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            metric_type: row.try_get("metric_type")?,
            value: row.try_get("value")?,
            unit: row.try_get("unit")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }
}

impl ProgressMetricRow {
    pub(crate) fn into_domain(self) -> DbResult<ProgressMetric> {
        Ok(ProgressMetric {
            metric_type: enum_col::<MetricType>("progress_metrics", "metric_type", &self.metric_type)?,
            value: self.value,
            unit: self.unit,
            recorded_at: instant_col("progress_metrics", "recorded_at", self.recorded_at)?,
        })
    }
}

// ============================================================================
// user_achievements
// ============================================================================

#[derive(Debug)]
pub(crate) struct UnlockedAchievementRow {
    achievement_id: String,
    name: String,
    description: Option<String>,
    points: i64,
    unlocked_at: i64,
}

impl<'r> sqlx::FromRow<'r, SqliteRow> for UnlockedAchievementRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            achievement_id: row.try_get("achievement_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            points: row.try_get("points")?,
            unlocked_at: row.try_get("unlocked_at")?,
        })
    }
}

impl UnlockedAchievementRow {
    pub(crate) fn into_domain(self) -> DbResult<UnlockedAchievement> {
        Ok(UnlockedAchievement {
            unlocked_at: instant_col("user_achievements", "unlocked_at", self.unlocked_at)?,
            achievement_id: self.achievement_id,
            name: self.name,
            description: self.description,
            points: self.points,
        })
    }
}
