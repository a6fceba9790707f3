// crates/server/src/seed.rs
//! Deterministic demo data for local runs (`seed-demo`).

use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};
use gainz_core::{
    ChallengeStatus, DailyScore, HabitCategory, HabitStatus, HabitStreak, MetricType,
    ProgrammeStatus, ProgressMetric, TaskStatus,
};
use gainz_db::{Database, DbResult};
use tracing::info;

const POINTS_PER_HABIT: i64 = 10;

const DEMO_HABITS: &[(&str, HabitCategory)] = &[
    ("Morning workout", HabitCategory::Fitness),
    ("Drink 2L water", HabitCategory::Hydration),
    ("Sleep by 23:00", HabitCategory::Sleep),
    ("Log meals", HabitCategory::Nutrition),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub days: u32,
    pub habits: u32,
    pub entries: u32,
}

/// Status for habit `h` on the day `n` days before today. Every habit has
/// its own rhythm; habit 0 never misses the last week so it holds a streak.
fn demo_status(h: usize, n: u64) -> HabitStatus {
    if h == 0 && n < 7 {
        return HabitStatus::Completed;
    }
    match (n * 7 + h as u64 * 3) % 10 {
        0..=5 => HabitStatus::Completed,
        6 => HabitStatus::Partial,
        7 | 8 => HabitStatus::Skipped,
        _ => HabitStatus::Failed,
    }
}

fn midday(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc()
}

/// Create `user_id` and write `days` of history ending at `today`.
///
/// Fails if the user (or email) already exists.
pub async fn seed_demo(
    db: &Database,
    user_id: &str,
    email: &str,
    display_name: &str,
    days: u32,
    today: NaiveDate,
) -> DbResult<SeedSummary> {
    db.insert_user(user_id, email, display_name).await?;

    let habit_ids: Vec<String> = DEMO_HABITS
        .iter()
        .map(|_| uuid::Uuid::new_v4().to_string())
        .collect();
    for (id, (name, category)) in habit_ids.iter().zip(DEMO_HABITS) {
        db.insert_habit(user_id, id, name, *category).await?;
    }

    let mut summary = SeedSummary {
        habits: habit_ids.len() as u32,
        ..SeedSummary::default()
    };

    for n in 0..u64::from(days) {
        let Some(date) = today.checked_sub_days(Days::new(n)) else {
            break;
        };
        let mut completed = 0;
        for (h, habit_id) in habit_ids.iter().enumerate() {
            let status = demo_status(h, n);
            if status == HabitStatus::Completed {
                completed += 1;
            }
            db.upsert_habit_entry(habit_id, date, status).await?;
            summary.entries += 1;
        }

        // One rest day every eleven days leaves a gap in the score history.
        if n % 11 == 10 {
            continue;
        }
        let score = DailyScore {
            date,
            total_points: completed * POINTS_PER_HABIT,
            completed_habits: completed,
            total_habits: habit_ids.len() as i64,
        };
        db.upsert_daily_score(user_id, &score).await?;
        summary.days += 1;

        if n % 7 == 0 {
            let metric = ProgressMetric {
                metric_type: MetricType::Weight,
                value: 82.0 - (days as f64 - n as f64) * 0.05,
                unit: "kg".to_string(),
                recorded_at: midday(date),
            };
            db.insert_progress_metric(user_id, &metric).await?;
        }
    }

    if let Some(first) = habit_ids.first() {
        let streak = HabitStreak {
            start_date: today.checked_sub_days(Days::new(6)).unwrap_or(today),
            end_date: None,
            length: 7,
            is_active: true,
        };
        db.insert_habit_streak(first, &streak).await?;
    }

    let now = midday(today);
    db.insert_progress_metric(
        user_id,
        &ProgressMetric {
            metric_type: MetricType::BodyFat,
            value: 19.5,
            unit: "%".to_string(),
            recorded_at: now,
        },
    )
    .await?;

    db.insert_achievement("first-week", "First week", Some("Seven days in a row"), 50)
        .await?;
    db.insert_achievement("hydrated", "Hydrated", Some("Hit your water goal ten times"), 25)
        .await?;
    db.unlock_achievement(user_id, "first-week", now - TimeDelta::days(3))
        .await?;
    db.unlock_achievement(user_id, "hydrated", now - TimeDelta::days(10))
        .await?;

    db.insert_programme("demo-foundations", "Foundations").await?;
    db.insert_programme("demo-strength", "Strength block").await?;
    db.enrol_programme(user_id, "demo-foundations", ProgrammeStatus::Completed, now - TimeDelta::days(40))
        .await?;
    db.enrol_programme(user_id, "demo-strength", ProgrammeStatus::Active, now - TimeDelta::days(5))
        .await?;

    db.insert_task_submission(user_id, "upload-progress-photo", TaskStatus::Approved, now)
        .await?;
    db.insert_task_submission(user_id, "weekly-check-in", TaskStatus::Pending, now)
        .await?;
    db.insert_challenge_participation(user_id, "march-mobility", ChallengeStatus::Completed, now - TimeDelta::days(20))
        .await?;

    info!(
        user_id,
        days = summary.days,
        habits = summary.habits,
        entries = summary.entries,
        "Seeded demo data"
    );
    Ok(summary)
}
