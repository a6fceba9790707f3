// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use gainz_db::Database;

use crate::auth::TokenVerifier;

/// Source of "now" for stats that depend on the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    /// Always reports the same instant.
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Pooled database handle, shared by every request.
    pub db: Database,
    /// Verifies bearer tokens for [`crate::auth::AuthUser`].
    pub verifier: TokenVerifier,
    pub clock: Clock,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(db: Database, verifier: TokenVerifier) -> Arc<Self> {
        Self::with_clock(db, verifier, Clock::System)
    }

    pub fn with_clock(db: Database, verifier: TokenVerifier, clock: Clock) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            db,
            verifier,
            clock,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
