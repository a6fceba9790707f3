// crates/server/src/lib.rs
//! Gainz stats server library.
//!
//! Axum HTTP service exposing per-user habit and progress stats behind
//! bearer-token auth.

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod seed;
pub mod state;

pub use auth::{AuthError, AuthUser, Claims, TokenVerifier};
pub use error::*;
pub use self::metrics::{init_metrics, record_request, render_metrics};
pub use routes::api_routes;
pub use state::{AppState, Clock};

use std::sync::Arc;

use axum::Router;
use gainz_observability::{propagate_request_id_layer, set_request_id_layer, trace_layer};
use tower_http::cors::{Any, CorsLayer};

/// Create the Axum application with all routes and middleware.
///
/// Layers, outermost first: request id assignment, request tracing,
/// request id propagation onto the response, CORS (any origin).
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_routes(state)
        .layer(cors)
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(set_request_id_layer())
}

// ============================================================================
// Integration Tests
// ============================================================================
