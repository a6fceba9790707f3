//! Body metrics, achievements, programmes, task submissions and challenges.

use chrono::{DateTime, Utc};
use gainz_core::{ChallengeStatus, ProgrammeStatus, ProgressMetric, TaskStatus};

use crate::{Database, DbResult};

impl Database {
    pub async fn insert_progress_metric(&self, user_id: &str, metric: &ProgressMetric) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO progress_metrics (user_id, metric_type, value, unit, recorded_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(metric.metric_type.as_str())
        .bind(metric.value)
        .bind(&metric.unit)
        .bind(metric.recorded_at.timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Add an achievement to the catalogue. Re-inserting an existing id
    /// refreshes its name, description and points.
    pub async fn insert_achievement(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
        points: i64,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO achievements (id, name, description, points) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                points = excluded.points
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(points)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Unlock an achievement for a user. Returns `false` when it was already
    /// unlocked; the original unlock time is kept.
    pub async fn unlock_achievement(
        &self,
        user_id: &str,
        achievement_id: &str,
        unlocked_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO user_achievements (user_id, achievement_id, unlocked_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(achievement_id)
        .bind(unlocked_at.timestamp())
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_programme(&self, id: &str, name: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO programmes (id, name) VALUES (?, ?)")
            .bind(id)
            .bind(name)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Enrol a user in a programme, or move an existing enrolment to `status`.
    pub async fn enrol_programme(
        &self,
        user_id: &str,
        programme_id: &str,
        status: ProgrammeStatus,
        started_at: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_programmes (user_id, programme_id, status, started_at) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, programme_id) DO UPDATE SET status = excluded.status
            "#,
        )
        .bind(user_id)
        .bind(programme_id)
        .bind(status.as_str())
        .bind(started_at.timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn insert_task_submission(
        &self,
        user_id: &str,
        task_id: &str,
        status: TaskStatus,
        submitted_at: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO task_submissions (user_id, task_id, status, submitted_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(task_id)
        .bind(status.as_str())
        .bind(submitted_at.timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Record (or update) a user's participation in a challenge.
    pub async fn insert_challenge_participation(
        &self,
        user_id: &str,
        challenge_id: &str,
        status: ChallengeStatus,
        joined_at: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_challenges (user_id, challenge_id, status, joined_at) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, challenge_id) DO UPDATE SET status = excluded.status
            "#,
        )
        .bind(user_id)
        .bind(challenge_id)
        .bind(status.as_str())
        .bind(joined_at.timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
