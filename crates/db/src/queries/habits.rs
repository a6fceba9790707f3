//! Users, daily scores, habits and their per-day entries.

use chrono::{NaiveDate, Utc};
use gainz_core::{format_date, DailyScore, HabitCategory, HabitStatus, HabitStreak};

use crate::{Database, DbResult};

impl Database {
    /// Insert a user row. Fails on a duplicate id or email.
    pub async fn insert_user(&self, id: &str, email: &str, display_name: &str) -> DbResult<()> {
        sqlx::query("INSERT INTO users (id, email, display_name, created_at) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(email)
            .bind(display_name)
            .bind(Utc::now().timestamp())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Insert or replace the score for `(user_id, score.date)`.
    pub async fn upsert_daily_score(&self, user_id: &str, score: &DailyScore) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_scores (user_id, date, total_points, completed_habits, total_habits)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, date) DO UPDATE SET
                total_points = excluded.total_points,
                completed_habits = excluded.completed_habits,
                total_habits = excluded.total_habits
            "#,
        )
        .bind(user_id)
        .bind(format_date(score.date))
        .bind(score.total_points)
        .bind(score.completed_habits)
        .bind(score.total_habits)
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn insert_habit(
        &self,
        user_id: &str,
        habit_id: &str,
        name: &str,
        category: HabitCategory,
    ) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO habits (id, user_id, name, category, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(habit_id)
        .bind(user_id)
        .bind(name)
        .bind(category.as_str())
        .bind(Utc::now().timestamp())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// Record the outcome of a habit on a day, overwriting any earlier status.
    pub async fn upsert_habit_entry(
        &self,
        habit_id: &str,
        date: NaiveDate,
        status: HabitStatus,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO habit_entries (habit_id, date, status) VALUES (?1, ?2, ?3)
            ON CONFLICT(habit_id, date) DO UPDATE SET status = excluded.status
            "#,
        )
        .bind(habit_id)
        .bind(format_date(date))
        .bind(status.as_str())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    pub async fn insert_habit_streak(&self, habit_id: &str, streak: &HabitStreak) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO habit_streaks (habit_id, start_date, end_date, length, is_active) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(habit_id)
        .bind(format_date(streak.start_date))
        .bind(streak.end_date.map(format_date))
        .bind(streak.length)
        .bind(streak.is_active)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}
