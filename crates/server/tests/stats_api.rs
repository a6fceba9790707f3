//! End-to-end tests for `GET /api/user/stats` against an in-memory database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Days, NaiveDate, TimeDelta, Utc};
use gainz_core::{DailyScore, HabitCategory, HabitStatus};
use gainz_db::Database;
use gainz_server::{create_app, AppState, Clock, TokenVerifier};
use pretty_assertions::assert_eq;
use serde_json::Value;
use tower::ServiceExt;

const SECRET: &[u8] = b"integration-secret-0123456789abcdef";

struct TestApp {
    app: Router,
    db: Database,
    verifier: TokenVerifier,
    /// The app's clock is pinned here so seeding and aggregation agree on "today".
    now: DateTime<Utc>,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::new_in_memory().await.expect("in-memory DB");
        let verifier = TokenVerifier::new(SECRET);
        let now = Utc::now();
        let app = create_app(AppState::with_clock(
            db.clone(),
            verifier.clone(),
            Clock::Fixed(now),
        ));
        Self {
            app,
            db,
            verifier,
            now,
        }
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn token(&self, user_id: &str) -> String {
        self.verifier.issue(user_id, TimeDelta::hours(1)).unwrap()
    }

    async fn get(&self, uri: &str, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri);
        if let Some(value) = authorization {
            request = request.header("authorization", value);
        }
        let response = self
            .app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get_stats(&self, uri: &str, user_id: &str) -> (StatusCode, Value) {
        let bearer = format!("Bearer {}", self.token(user_id));
        self.get(uri, Some(&bearer)).await
    }
}

fn days_ago(today: NaiveDate, n: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(n)).unwrap()
}

/// Four scored days (a three-day run ending `today` plus one older day),
/// two habits and one achievement.
async fn seed_active_user(db: &Database, today: NaiveDate) {
    db.insert_user("u1", "jo@example.com", "Jo").await.unwrap();

    for (n, points, completed) in [(0, 40, 2), (1, 30, 3), (2, 20, 4), (5, 10, 1)] {
        let score = DailyScore {
            date: days_ago(today, n),
            total_points: points,
            completed_habits: completed,
            total_habits: 4,
        };
        db.upsert_daily_score("u1", &score).await.unwrap();
    }

    db.insert_habit("u1", "h-run", "Run", HabitCategory::Fitness)
        .await
        .unwrap();
    db.insert_habit("u1", "h-water", "Water", HabitCategory::Hydration)
        .await
        .unwrap();
    for (n, status) in [
        (0, HabitStatus::Completed),
        (1, HabitStatus::Completed),
        (2, HabitStatus::Failed),
    ] {
        db.upsert_habit_entry("h-run", days_ago(today, n), status).await.unwrap();
    }
    db.upsert_habit_entry("h-water", today, HabitStatus::Completed)
        .await
        .unwrap();

    db.insert_achievement("starter", "Starter", None, 10).await.unwrap();
    db.unlock_achievement("u1", "starter", today.and_hms_opt(6, 0, 0).unwrap().and_utc()).await.unwrap();
}

#[tokio::test]
async fn test_stats_for_active_user() {
    let t = TestApp::new().await;
    seed_active_user(&t.db, t.today()).await;

    let (status, body) = t.get_stats("/api/user/stats", "u1").await;
    assert_eq!(status, StatusCode::OK);

    let stats = &body["stats"];
    assert_eq!(stats["totalDays"], 4);
    assert_eq!(stats["currentStreak"], 3);
    assert_eq!(stats["longestStreak"], 3);
    assert_eq!(stats["totalPoints"], 100);
    assert_eq!(stats["averageScore"], 62.5);
    assert_eq!(stats["completedHabits"], 3);
    assert_eq!(stats["progressTrend"], "stable");
    assert_eq!(stats["satisfaction"], 31);
    assert_eq!(stats["totalAchievements"], 1);
    assert_eq!(stats["last30Days"]["totalDays"], 4);

    let rates = stats["habitSuccessRates"].as_array().unwrap();
    assert_eq!(rates.len(), 2);
    assert_eq!(rates[0]["name"], "Water");
    assert_eq!(rates[0]["successRate"], 100);
    assert_eq!(rates[1]["name"], "Run");
    assert_eq!(rates[1]["successRate"], 67);

    assert_eq!(stats["recentAchievements"][0]["achievementId"], "starter");
    assert!(stats["latestMetrics"]["weight"].is_null());
}

#[tokio::test]
async fn test_trend_days_query_changes_window() {
    let t = TestApp::new().await;
    seed_active_user(&t.db, t.today()).await;

    let (status, body) = t.get_stats("/api/user/stats?trendDays=4", "u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["progressTrend"], "up");
}

#[tokio::test]
async fn test_user_without_history_gets_zeroes() {
    let t = TestApp::new().await;
    t.db.insert_user("fresh", "fresh@example.com", "Fresh")
        .await
        .unwrap();

    let (status, body) = t.get_stats("/api/user/stats", "fresh").await;
    assert_eq!(status, StatusCode::OK);

    let stats = &body["stats"];
    assert_eq!(stats["totalDays"], 0);
    assert_eq!(stats["currentStreak"], 0);
    assert_eq!(stats["averageScore"], 0.0);
    assert_eq!(stats["satisfaction"], 0);
    assert_eq!(stats["progressTrend"], "stable");
    assert!(stats["habitSuccessRates"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_header_is_401() {
    let t = TestApp::new().await;
    let (status, body) = t.get("/api/user/stats", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["details"], "Missing Authorization header");
}

#[tokio::test]
async fn test_non_bearer_scheme_is_401() {
    let t = TestApp::new().await;
    let (status, body) = t.get("/api/user/stats", Some("Basic dTE6cGFzcw==")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_401() {
    let t = TestApp::new().await;
    seed_active_user(&t.db, t.today()).await;

    let forged = TokenVerifier::new(b"some-other-secret-0123456789abcdef")
        .issue("u1", TimeDelta::hours(1))
        .unwrap();
    let (status, body) = t
        .get("/api/user/stats", Some(&format!("Bearer {forged}")))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["details"], "Invalid token");
}

#[tokio::test]
async fn test_expired_token_is_401() {
    let t = TestApp::new().await;
    seed_active_user(&t.db, t.today()).await;

    let expired = t.verifier.issue("u1", TimeDelta::hours(-3)).unwrap();
    let (status, body) = t
        .get("/api/user/stats", Some(&format!("Bearer {expired}")))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["details"], "Token expired");
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let t = TestApp::new().await;
    let (status, body) = t.get_stats("/api/user/stats", "ghost").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_out_of_range_trend_days_is_400() {
    let t = TestApp::new().await;
    seed_active_user(&t.db, t.today()).await;

    for uri in [
        "/api/user/stats?trendDays=0",
        "/api/user/stats?trendDays=91",
        "/api/user/stats?trendDays=soon",
    ] {
        let (status, body) = t.get_stats(uri, "u1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "Bad request");
    }
}

#[tokio::test]
async fn test_auth_checked_before_query() {
    let t = TestApp::new().await;
    let (status, _) = t.get("/api/user/stats?trendDays=0", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_corrupt_row_is_generic_500() {
    let t = TestApp::new().await;
    seed_active_user(&t.db, t.today()).await;
    sqlx_insert_bad_score(&t.db).await;

    let (status, body) = t.get_stats("/api/user/stats", "u1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert!(body.get("details").is_none());
}

async fn sqlx_insert_bad_score(db: &Database) {
    use sqlx::Executor;
    db.pool()
        .execute("INSERT INTO daily_scores (user_id, date, total_points) VALUES ('u1', 'not-a-date', 5)")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_file_backed_database_survives_restart() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("gainz.db");

    {
        let db = Database::new(&path).await.unwrap();
        seed_active_user(&db, Utc::now().date_naive()).await;
        db.pool().close().await;
    }

    let db = Database::new(&path).await.unwrap();
    let verifier = TokenVerifier::new(SECRET);
    let token = verifier.issue("u1", TimeDelta::hours(1)).unwrap();
    let app = create_app(AppState::new(db, verifier));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/stats")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_streak_follows_app_clock_not_wall_clock() {
    let db = Database::new_in_memory().await.unwrap();
    let verifier = TokenVerifier::new(SECRET);
    let token = verifier.issue("u1", TimeDelta::hours(1)).unwrap();

    // A day long past: only the injected clock can make this history current.
    let pinned = DateTime::parse_from_rfc3339("2024-03-15T23:59:59Z")
        .unwrap()
        .with_timezone(&Utc);
    seed_active_user(&db, pinned.date_naive()).await;
    let app = create_app(AppState::with_clock(db, verifier, Clock::Fixed(pinned)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/user/stats")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["stats"]["currentStreak"], 3);
    assert_eq!(json["stats"]["last30Days"]["totalDays"], 4);
}

#[tokio::test]
async fn test_huge_point_totals_still_answer() {
    let t = TestApp::new().await;
    t.db.insert_user("big", "big@example.com", "Big").await.unwrap();
    for n in 0..2 {
        let score = DailyScore {
            date: days_ago(t.today(), n),
            total_points: i64::MAX,
            completed_habits: 1,
            total_habits: 1,
        };
        t.db.upsert_daily_score("big", &score).await.unwrap();
    }

    let (status, body) = t.get_stats("/api/user/stats", "big").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["totalPoints"], i64::MAX);
    assert_eq!(body["stats"]["last30Days"]["totalPoints"], i64::MAX);
    assert_eq!(body["stats"]["currentStreak"], 2);
}

mod error_logging {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Counts ERROR events emitted from this crate's own code.
    struct ServerErrors(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for ServerErrors {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            if *meta.level() == Level::ERROR && meta.target().starts_with("gainz_server") {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_database_failure_logged_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ServerErrors(count.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let t = TestApp::new().await;
        seed_active_user(&t.db, t.today()).await;
        sqlx_insert_bad_score(&t.db).await;

        let (status, _) = t.get_stats("/api/user/stats", "u1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
