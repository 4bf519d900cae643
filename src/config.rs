// src/config.rs

use std::env;
use dotenvy::dotenv;

use crate::grading::policy::SubmissionPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub port: u16,
    /// Gate applied before a submission is accepted.
    pub submission_policy: SubmissionPolicy,
    /// Allowed browser origins for CORS.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let submission_policy = env::var("SUBMISSION_POLICY")
            .ok()
            .map(|p| {
                p.parse().unwrap_or_else(|_| {
                    tracing::warn!("Unknown SUBMISSION_POLICY '{}', falling back to 'open'", p);
                    SubmissionPolicy::Open
                })
            })
            .unwrap_or_default();

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        Self {
            database_url,
            jwt_secret,
            rust_log,
            port,
            submission_policy,
            cors_origins,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
