// src/state.rs

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{config::Config, grading::policy::SubmissionPolicy};

/// Shared state handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self { pool, config }
    }
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for SubmissionPolicy {
    fn from_ref(state: &AppState) -> Self {
        state.config.submission_policy
    }
}
