//! Per-user stats endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use gainz_core::{aggregate, StatsOptions, UserStats, DEFAULT_TREND_DAYS, MAX_TREND_DAYS};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_aggregation, RequestTimer};
use crate::state::AppState;

const ENDPOINT: &str = "user_stats";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// Window for `progressTrend`, 1..=90. Defaults to 7.
    pub trend_days: Option<usize>,
}

impl StatsQuery {
    fn options(&self) -> ApiResult<StatsOptions> {
        let trend_days = self.trend_days.unwrap_or(DEFAULT_TREND_DAYS);
        if !(1..=MAX_TREND_DAYS).contains(&trend_days) {
            return Err(ApiError::BadRequest(format!(
                "trendDays must be between 1 and {MAX_TREND_DAYS}, got {trend_days}"
            )));
        }
        Ok(StatsOptions { trend_days })
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[cfg_attr(feature = "codegen", ts(export, export_to = "../../../web/src/types/generated/"))]
#[cfg_attr(test, derive(Deserialize))]
pub struct StatsResponse {
    pub stats: UserStats,
}

/// GET /api/user/stats - aggregated habit and progress stats for the caller.
///
/// Auth is checked first; a bad token never touches the database.
pub async fn user_stats(
    State(state): State<Arc<AppState>>,
    auth: Result<AuthUser, ApiError>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> ApiResult<Json<StatsResponse>> {
    let timer = RequestTimer::new(ENDPOINT);
    match load_stats(&state, auth, query).await {
        Ok(stats) => {
            timer.finish_ok();
            Ok(Json(StatsResponse { stats }))
        }
        Err(e) => {
            timer.finish_err(e.status().as_u16());
            Err(e)
        }
    }
}

async fn load_stats(
    state: &AppState,
    auth: Result<AuthUser, ApiError>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> ApiResult<UserStats> {
    let AuthUser { user_id } = auth?;
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let options = query.options()?;

    let snapshot = state
        .db
        .load_user_snapshot(&user_id)
        .await?
        .ok_or_else(|| ApiError::UserNotFound(user_id.clone()))?;

    let start = Instant::now();
    let stats = aggregate(&snapshot, state.clock.now(), &options);
    record_aggregation(start.elapsed());

    tracing::debug!(
        endpoint = ENDPOINT,
        user_id = %user_id,
        total_days = stats.total_days,
        current_streak = stats.current_streak,
        "Computed user stats"
    );
    Ok(stats)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/user/stats", get(user_stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trend_window() {
        let options = StatsQuery::default().options().unwrap();
        assert_eq!(options.trend_days, DEFAULT_TREND_DAYS);
    }

    #[test]
    fn test_trend_window_bounds() {
        let query = |n| StatsQuery { trend_days: Some(n) };
        assert_eq!(query(1).options().unwrap().trend_days, 1);
        assert_eq!(query(MAX_TREND_DAYS).options().unwrap().trend_days, MAX_TREND_DAYS);
        assert!(matches!(query(0).options(), Err(ApiError::BadRequest(_))));
        assert!(matches!(
            query(MAX_TREND_DAYS + 1).options(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
