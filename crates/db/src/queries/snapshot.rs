//! Eager loader for everything the stats aggregator reads about one user.

use std::collections::HashMap;
use std::time::Instant;

use gainz_core::{
    ChallengeStatus, Habit, HabitEntry, HabitStreak, MetricType, ProgrammeCounts, ProgrammeStatus,
    TaskStatus, UserSnapshot, RECENT_ACHIEVEMENT_COUNT,
};
use tracing::debug;

use super::row_types::{
    DailyScoreRow, HabitEntryRow, HabitRow, HabitStreakRow, ProgressMetricRow,
    UnlockedAchievementRow,
};
use crate::{Database, DbResult};

impl Database {
    /// Load the user together with every collection the stats need.
    ///
    /// Returns `Ok(None)` when no user row exists. All reads happen inside
    /// one transaction so the snapshot never mixes data from before and
    /// after a concurrent write.
    ///
    /// Orderings:
    /// - daily scores newest first
    /// - habits by creation, entries and streaks newest first
    /// - one metric per tracked type (the latest reading)
    /// - the [`RECENT_ACHIEVEMENT_COUNT`] most recent unlocks
    pub async fn load_user_snapshot(&self, user_id: &str) -> DbResult<Option<UserSnapshot>> {
        let start = Instant::now();
        let mut tx = self.pool().begin().await?;

        let user: Option<(String,)> = sqlx::query_as("SELECT display_name FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((display_name,)) = user else {
            tx.rollback().await?;
            return Ok(None);
        };

        let mut snapshot = UserSnapshot::new(user_id, display_name);

        let score_rows: Vec<DailyScoreRow> = sqlx::query_as(
            r#"
            SELECT date, total_points, completed_habits, total_habits
            FROM daily_scores
            WHERE user_id = ?
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;
        snapshot.daily_scores = score_rows
            .into_iter()
            .map(DailyScoreRow::into_domain)
            .collect::<DbResult<_>>()?;

        // Habits, then their entries and streaks in one query each; grouped in memory.
        let habit_rows: Vec<HabitRow> = sqlx::query_as(
            "SELECT id, name, category FROM habits WHERE user_id = ? ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let entry_rows: Vec<HabitEntryRow> = sqlx::query_as(
            r#"
            SELECT e.habit_id, e.date, e.status
            FROM habit_entries e
            JOIN habits h ON h.id = e.habit_id
            WHERE h.user_id = ?
            ORDER BY e.habit_id, e.date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let streak_rows: Vec<HabitStreakRow> = sqlx::query_as(
            r#"
            SELECT s.habit_id, s.start_date, s.end_date, s.length, s.is_active
            FROM habit_streaks s
            JOIN habits h ON h.id = s.habit_id
            WHERE h.user_id = ?
            ORDER BY s.habit_id, s.start_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut entries: HashMap<&str, Vec<HabitEntry>> = HashMap::new();
        for row in &entry_rows {
            entries
                .entry(row.habit_id.as_str())
                .or_default()
                .push(row.to_domain()?);
        }
        let mut streaks: HashMap<&str, Vec<HabitStreak>> = HashMap::new();
        for row in &streak_rows {
            streaks
                .entry(row.habit_id.as_str())
                .or_default()
                .push(row.to_domain()?);
        }

        snapshot.habits = habit_rows
            .iter()
            .map(|row| -> DbResult<Habit> {
                Ok(Habit {
                    id: row.id.clone(),
                    name: row.name.clone(),
                    category: row.category()?,
                    entries: entries.remove(row.id.as_str()).unwrap_or_default(),
                    streaks: streaks.remove(row.id.as_str()).unwrap_or_default(),
                })
            })
            .collect::<DbResult<_>>()?;

        let metric_rows: Vec<ProgressMetricRow> = sqlx::query_as(
            r#"
            SELECT metric_type, value, unit, recorded_at FROM (
                SELECT metric_type, value, unit, recorded_at,
                       ROW_NUMBER() OVER (
                           PARTITION BY metric_type
                           ORDER BY recorded_at DESC, id DESC
                       ) AS rn
                FROM progress_metrics
                WHERE user_id = ?1 AND metric_type IN (?2, ?3, ?4)
            )
            WHERE rn = 1
            ORDER BY metric_type
            "#,
        )
        .bind(user_id)
        .bind(MetricType::Weight.as_str())
        .bind(MetricType::BodyFat.as_str())
        .bind(MetricType::MuscleMass.as_str())
        .fetch_all(&mut *tx)
        .await?;
        snapshot.latest_metrics = metric_rows
            .into_iter()
            .map(ProgressMetricRow::into_domain)
            .collect::<DbResult<_>>()?;

        let achievement_rows: Vec<UnlockedAchievementRow> = sqlx::query_as(
            r#"
            SELECT ua.achievement_id, a.name, a.description, a.points, ua.unlocked_at
            FROM user_achievements ua
            JOIN achievements a ON a.id = ua.achievement_id
            WHERE ua.user_id = ?
            ORDER BY ua.unlocked_at DESC, ua.achievement_id
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(RECENT_ACHIEVEMENT_COUNT as i64)
        .fetch_all(&mut *tx)
        .await?;
        snapshot.recent_achievements = achievement_rows
            .into_iter()
            .map(UnlockedAchievementRow::into_domain)
            .collect::<DbResult<_>>()?;

        let (total_achievements,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_achievements WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
        snapshot.total_achievements = total_achievements;

        let (completed, active): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = ?2 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN status = ?3 THEN 1 ELSE 0 END), 0)
            FROM user_programmes
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .bind(ProgrammeStatus::Completed.as_str())
        .bind(ProgrammeStatus::Active.as_str())
        .fetch_one(&mut *tx)
        .await?;
        snapshot.programmes = ProgrammeCounts { completed, active };

        let (completed_tasks,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM task_submissions WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(TaskStatus::Approved.as_str())
        .fetch_one(&mut *tx)
        .await?;
        snapshot.completed_tasks = completed_tasks;

        let (completed_challenges,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM user_challenges WHERE user_id = ? AND status = ?",
        )
        .bind(user_id)
        .bind(ChallengeStatus::Completed.as_str())
        .fetch_one(&mut *tx)
        .await?;
        snapshot.completed_challenges = completed_challenges;

        tx.commit().await?;

        debug!(
            user_id,
            scores = snapshot.daily_scores.len(),
            habits = snapshot.habits.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded user snapshot"
        );
        Ok(Some(snapshot))
    }
}
