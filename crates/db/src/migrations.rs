// crates/db/src/migrations.rs
//! Inline SQL migrations for the habit-tracking schema.
//!
//! Applied in order, one statement per entry; the index of an entry (1-based)
//! is its version in `_migrations`. Never reorder or edit a shipped entry,
//! only append.
//!
//! Calendar dates are stored as `YYYY-MM-DD` text, instants as Unix seconds.

pub const MIGRATIONS: &[&str] = &[
    // 1: users
    r#"
CREATE TABLE IF NOT EXISTS users (
    id           TEXT PRIMARY KEY,
    email        TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL DEFAULT '',
    created_at   INTEGER NOT NULL
);
"#,
    // 2: daily scores, one row per user per day
    r#"
CREATE TABLE IF NOT EXISTS daily_scores (
    id               INTEGER PRIMARY KEY,
    user_id          TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date             TEXT NOT NULL,
    total_points     INTEGER NOT NULL DEFAULT 0,
    completed_habits INTEGER NOT NULL DEFAULT 0 CHECK (completed_habits >= 0),
    total_habits     INTEGER NOT NULL DEFAULT 0 CHECK (total_habits >= 0),
    UNIQUE (user_id, date)
);
"#,
    // 3: habits
    r#"
CREATE TABLE IF NOT EXISTS habits (
    id         TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name       TEXT NOT NULL,
    category   TEXT NOT NULL,
    created_at INTEGER NOT NULL
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);"#,
    // 4: habit entries, one row per habit per day
    r#"
CREATE TABLE IF NOT EXISTS habit_entries (
    id       INTEGER PRIMARY KEY,
    habit_id TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    date     TEXT NOT NULL,
    status   TEXT NOT NULL,
    UNIQUE (habit_id, date)
);
"#,
    // 5: habit streak markers
    r#"
CREATE TABLE IF NOT EXISTS habit_streaks (
    id         INTEGER PRIMARY KEY,
    habit_id   TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    start_date TEXT NOT NULL,
    end_date   TEXT,
    length     INTEGER NOT NULL DEFAULT 0 CHECK (length >= 0),
    is_active  BOOLEAN NOT NULL DEFAULT 0
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_habit_streaks_habit ON habit_streaks(habit_id);"#,
    // 6: body metrics
    r#"
CREATE TABLE IF NOT EXISTS progress_metrics (
    id          INTEGER PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    metric_type TEXT NOT NULL,
    value       REAL NOT NULL,
    unit        TEXT NOT NULL DEFAULT '',
    recorded_at INTEGER NOT NULL
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_progress_metrics_user_type ON progress_metrics(user_id, metric_type, recorded_at DESC);"#,
    // 7: achievements catalogue + unlocks
    r#"
CREATE TABLE IF NOT EXISTS achievements (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    points      INTEGER NOT NULL DEFAULT 0
);
"#,
    r#"
CREATE TABLE IF NOT EXISTS user_achievements (
    user_id        TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    achievement_id TEXT NOT NULL REFERENCES achievements(id),
    unlocked_at    INTEGER NOT NULL,
    PRIMARY KEY (user_id, achievement_id)
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_user_achievements_unlocked ON user_achievements(user_id, unlocked_at DESC);"#,
    // 8: programmes + enrolments
    r#"
CREATE TABLE IF NOT EXISTS programmes (
    id   TEXT PRIMARY KEY,
    name TEXT NOT NULL
);
"#,
    r#"
CREATE TABLE IF NOT EXISTS user_programmes (
    user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    programme_id TEXT NOT NULL REFERENCES programmes(id),
    status       TEXT NOT NULL,
    started_at   INTEGER NOT NULL,
    PRIMARY KEY (user_id, programme_id)
);
"#,
    // 9: task submissions
    r#"
CREATE TABLE IF NOT EXISTS task_submissions (
    id           INTEGER PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    task_id      TEXT NOT NULL,
    status       TEXT NOT NULL,
    submitted_at INTEGER NOT NULL
);
"#,
    r#"CREATE INDEX IF NOT EXISTS idx_task_submissions_user ON task_submissions(user_id, status);"#,
    // 10: challenge participation
    r#"
CREATE TABLE IF NOT EXISTS user_challenges (
    user_id      TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    challenge_id TEXT NOT NULL,
    status       TEXT NOT NULL,
    joined_at    INTEGER NOT NULL,
    PRIMARY KEY (user_id, challenge_id)
);
"#,
];
