// crates/core/src/stats.rs
//! User stats aggregation.
//!
//! [`aggregate`] reduces an already-loaded [`UserSnapshot`] into the
//! [`UserStats`] payload served by the stats endpoint. It performs no I/O and
//! is deterministic: the same snapshot and `now` always produce the same
//! output.

use std::cmp::Ordering;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::streaks::{current_streak, longest_streak};
use crate::types::{
    DailyScore, Habit, HabitCategory, MetricType, ProgrammeCounts, ProgressMetric,
    UnlockedAchievement, UserSnapshot,
};

/// Default number of most recent days compared by [`progress_trend`].
pub const DEFAULT_TREND_DAYS: usize = 7;
/// Largest trend window a caller may request.
pub const MAX_TREND_DAYS: usize = 90;
/// Size of the trailing window reported as `last30Days`.
pub const RECENT_WINDOW_DAYS: u64 = 30;
/// Number of habits returned in `habitSuccessRates`.
pub const TOP_HABIT_COUNT: usize = 5;
/// Number of achievements returned in `recentAchievements`.
pub const RECENT_ACHIEVEMENT_COUNT: usize = 5;

/// Streak length (days) at which the satisfaction streak component saturates.
const SATISFACTION_STREAK_CAP: f64 = 30.0;
/// Achievement count at which the satisfaction achievement component saturates.
const SATISFACTION_ACHIEVEMENT_CAP: f64 = 10.0;
/// Relative change between trend halves needed to leave `Stable`.
const TREND_THRESHOLD: f64 = 0.1;

// ============================================================================
// Output types
// ============================================================================

/// Coarse direction of recent daily points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "lowercase")]
pub enum ProgressTrend {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct HabitSuccessRate {
    pub habit_id: String,
    pub name: String,
    pub category: HabitCategory,
    /// Percentage of entries with status COMPLETED, rounded (0-100).
    pub success_rate: u32,
    pub completed_entries: u32,
    pub total_entries: u32,
}

/// Points and completion over a trailing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub total_days: u32,
    #[ts(type = "number")]
    pub total_points: i64,
    pub average_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct MetricReading {
    pub value: f64,
    pub unit: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<&ProgressMetric> for MetricReading {
    fn from(m: &ProgressMetric) -> Self {
        Self {
            value: m.value,
            unit: m.unit.clone(),
            recorded_at: m.recorded_at,
        }
    }
}

/// Most recent reading per tracked body metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct LatestMetrics {
    pub weight: Option<MetricReading>,
    pub body_fat: Option<MetricReading>,
    pub muscle_mass: Option<MetricReading>,
}

/// Full stats payload for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Number of days with a daily score row (no gap filling).
    pub total_days: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    #[ts(type = "number")]
    pub total_points: i64,
    /// Mean per-day completion percentage, one decimal.
    pub average_score: f64,
    /// Habit entries with status COMPLETED, across all habits.
    pub completed_habits: u32,
    pub habit_success_rates: Vec<HabitSuccessRate>,
    pub last_30_days: PeriodSummary,
    pub progress_trend: ProgressTrend,
    /// Blended 0-100 score.
    pub satisfaction: u32,
    pub latest_metrics: LatestMetrics,
    pub recent_achievements: Vec<UnlockedAchievement>,
    #[ts(type = "number")]
    pub total_achievements: i64,
    pub programmes: ProgrammeCounts,
    #[ts(type = "number")]
    pub completed_tasks: i64,
    #[ts(type = "number")]
    pub completed_challenges: i64,
    /// Habits currently holding an active streak marker.
    pub active_habit_streaks: u32,
}

/// Caller-tunable knobs for [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    pub trend_days: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            trend_days: DEFAULT_TREND_DAYS,
        }
    }
}

// ============================================================================
// Building blocks
// ============================================================================

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `completed / total * 100`, or 0 when there is nothing to complete.
pub fn completion_percent(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Mean of the per-day completion percentages, rounded to one decimal.
///
/// Each day weighs the same regardless of how many habits it tracked.
pub fn average_score(scores: &[DailyScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: f64 = scores
        .iter()
        .map(|s| completion_percent(s.completed_habits, s.total_habits))
        .sum();
    round1(sum / scores.len() as f64)
}

/// Sum of daily points, saturating at the `i64` bounds.
pub fn total_points(scores: &[DailyScore]) -> i64 {
    scores
        .iter()
        .fold(0i64, |acc, s| acc.saturating_add(s.total_points))
}

/// Summary of the scores dated on or after `since`.
pub fn period_summary(scores: &[DailyScore], since: NaiveDate) -> PeriodSummary {
    let recent: Vec<DailyScore> = scores.iter().copied().filter(|s| s.date >= since).collect();
    PeriodSummary {
        total_days: recent.len() as u32,
        total_points: total_points(&recent),
        average_score: average_score(&recent),
    }
}

/// Per-habit completion rates, best first, truncated to `limit`.
///
/// Ties are ordered by habit name, then id, so the output is stable.
pub fn habit_success_rates(habits: &[Habit], limit: usize) -> Vec<HabitSuccessRate> {
    let mut rates: Vec<HabitSuccessRate> = habits
        .iter()
        .map(|h| {
            let total = h.entries.len() as i64;
            let completed = h.completed_entries() as i64;
            HabitSuccessRate {
                habit_id: h.id.clone(),
                name: h.name.clone(),
                category: h.category,
                success_rate: completion_percent(completed, total).round() as u32,
                completed_entries: completed as u32,
                total_entries: total as u32,
            }
        })
        .collect();

    rates.sort_by(|a, b| {
        b.success_rate
            .cmp(&a.success_rate)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.habit_id.cmp(&b.habit_id))
    });
    rates.truncate(limit);
    rates
}

fn mean_points(scores: &[DailyScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: f64 = scores.iter().map(|s| s.total_points as f64).sum();
    sum / scores.len() as f64
}

/// Compare mean points of the older and newer halves of the last `days` rows.
///
/// Returns `Stable` when fewer than `days` rows exist or the window is too
/// small to split.
pub fn progress_trend(scores: &[DailyScore], days: usize) -> ProgressTrend {
    if days < 2 || scores.len() < days {
        return ProgressTrend::Stable;
    }

    let mut window: Vec<DailyScore> = scores.to_vec();
    window.sort_by(|a, b| b.date.cmp(&a.date));
    window.truncate(days);
    window.reverse();

    let (older, newer) = window.split_at(days / 2);
    let first = mean_points(older);
    let second = mean_points(newer);
    let margin = first.abs() * TREND_THRESHOLD;

    match second.partial_cmp(&first) {
        Some(Ordering::Greater) if second - first > margin => ProgressTrend::Up,
        Some(Ordering::Less) if first - second > margin => ProgressTrend::Down,
        _ => ProgressTrend::Stable,
    }
}

/// Blend completion, streak, and achievements into a 0-100 score.
///
/// Weights: 40% average completion, 30% streak (saturating at 30 days),
/// 30% achievements (saturating at 10).
pub fn satisfaction(average_score: f64, current_streak: u32, achievement_count: i64) -> u32 {
    let completion = if average_score.is_finite() {
        average_score.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let streak = (current_streak as f64).min(SATISFACTION_STREAK_CAP) / SATISFACTION_STREAK_CAP;
    let achievements = (achievement_count.max(0) as f64).min(SATISFACTION_ACHIEVEMENT_CAP)
        / SATISFACTION_ACHIEVEMENT_CAP;

    let score = completion * 0.4 + streak * 100.0 * 0.3 + achievements * 100.0 * 0.3;
    score.clamp(0.0, 100.0).round() as u32
}

fn latest_metrics(snapshot: &UserSnapshot) -> LatestMetrics {
    let reading = |t| snapshot.latest_metric(t).map(MetricReading::from);
    LatestMetrics {
        weight: reading(MetricType::Weight),
        body_fat: reading(MetricType::BodyFat),
        muscle_mass: reading(MetricType::MuscleMass),
    }
}

// ============================================================================
// Aggregation
// ============================================================================

/// Reduce a user snapshot into the stats payload.
pub fn aggregate(snapshot: &UserSnapshot, now: DateTime<Utc>, options: &StatsOptions) -> UserStats {
    let today = now.date_naive();
    let scores = &snapshot.daily_scores;
    let dates = || scores.iter().map(|s| s.date);

    let current = current_streak(dates(), today);
    let average = average_score(scores);
    let window_start = today
        .checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN);

    let mut recent_achievements = snapshot.recent_achievements.clone();
    recent_achievements.sort_by(|a, b| {
        b.unlocked_at
            .cmp(&a.unlocked_at)
            .then_with(|| a.achievement_id.cmp(&b.achievement_id))
    });
    recent_achievements.truncate(RECENT_ACHIEVEMENT_COUNT);

    UserStats {
        total_days: scores.len() as u32,
        current_streak: current,
        longest_streak: longest_streak(dates()),
        total_points: total_points(scores),
        average_score: average,
        completed_habits: snapshot
            .habits
            .iter()
            .fold(0u32, |acc, h| acc.saturating_add(h.completed_entries() as u32)),
        habit_success_rates: habit_success_rates(&snapshot.habits, TOP_HABIT_COUNT),
        last_30_days: period_summary(scores, window_start),
        progress_trend: progress_trend(scores, options.trend_days),
        satisfaction: satisfaction(average, current, snapshot.total_achievements),
        latest_metrics: latest_metrics(snapshot),
        recent_achievements,
        total_achievements: snapshot.total_achievements,
        programmes: snapshot.programmes,
        completed_tasks: snapshot.completed_tasks,
        completed_challenges: snapshot.completed_challenges,
        active_habit_streaks: snapshot
            .habits
            .iter()
            .filter(|h| h.has_active_streak())
            .count() as u32,
    }
}
