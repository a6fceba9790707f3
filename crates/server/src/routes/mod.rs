//! API route handlers for the gainz stats server.

pub mod health;
pub mod metrics;
pub mod stats;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined router.
///
/// Routes:
/// - GET /api/health - Health check
/// - GET /api/user/stats - Aggregated stats for the bearer-token user
/// - GET /metrics - Prometheus scrape endpoint
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", stats::router())
        .merge(metrics::router())
        .with_state(state)
}
