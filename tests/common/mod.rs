// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::HashMap;

use axum::Router;
use coursework::{
    config::Config, grading::policy::SubmissionPolicy, routes, state::AppState,
    utils::jwt::sign_jwt,
};
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;

pub const TEST_SECRET: &str = "test_secret_for_integration_tests";

pub fn test_config(database_url: &str, submission_policy: SubmissionPolicy) -> Config {
    Config {
        database_url: database_url.to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        rust_log: "error".to_string(),
        port: 0,
        submission_policy,
        cors_origins: vec!["http://localhost:3000".to_string()],
    }
}

pub fn token(subject: &str, role: &str) -> String {
    sign_jwt(subject, role, TEST_SECRET, 600).expect("Failed to sign test token")
}

pub fn new_student() -> (String, String) {
    let id = format!("student-{}", uuid::Uuid::new_v4());
    let token = token(&id, "student");
    (id, token)
}

/// Router over a pool that never connects. Only usable for requests that
/// are rejected before reaching the database.
pub fn lazy_router() -> Router {
    let url = "postgres://postgres@127.0.0.1:1/unused";
    let pool = PgPoolOptions::new()
        .connect_lazy(url)
        .expect("Failed to build lazy pool");
    routes::create_router(AppState::new(pool, test_config(url, SubmissionPolicy::Open)))
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub teacher_token: String,
}

/// Spawns the app on a random port against `DATABASE_URL`.
/// Returns `None` (and the calling test does nothing) when no database is configured.
pub async fn spawn_app(submission_policy: SubmissionPolicy) -> Option<TestApp> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping database-backed test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let state = AppState::new(pool, test_config(&database_url, submission_policy));
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some(TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        teacher_token: token("teacher-1", "teacher"),
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_assignment(&self, body: Value) -> i64 {
        let resp = self
            .client
            .post(self.url("/api/assignments"))
            .bearer_auth(&self.teacher_token)
            .json(&body)
            .send()
            .await
            .expect("Create assignment failed");
        assert_eq!(resp.status().as_u16(), 201);
        resp.json::<Value>().await.unwrap()["id"].as_i64().unwrap()
    }

    pub async fn create_question(&self, assignment_id: i64, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url(&format!("/api/assignments/{}/questions", assignment_id)))
            .bearer_auth(&self.teacher_token)
            .json(&body)
            .send()
            .await
            .expect("Create question failed");
        assert_eq!(resp.status().as_u16(), 201);
        resp.json().await.unwrap()
    }

    /// Adds a multiple-choice question with a wrong option A and a correct option B.
    /// Returns (question_id, option_a, option_b).
    pub async fn add_choice_question(&self, assignment_id: i64, points: i32) -> (i64, i64, i64) {
        let q = self
            .create_question(
                assignment_id,
                json!({
                    "type": "MULTIPLE_CHOICE",
                    "text": "Which planet is closest to the sun?",
                    "points": points,
                    "options": [
                        {"text": "Venus", "is_correct": false},
                        {"text": "Mercury", "is_correct": true}
                    ]
                }),
            )
            .await;
        let options = q["options"].as_array().unwrap();
        (
            q["id"].as_i64().unwrap(),
            options[0]["id"].as_i64().unwrap(),
            options[1]["id"].as_i64().unwrap(),
        )
    }

    pub async fn add_theory_question(&self, assignment_id: i64, points: i32) -> i64 {
        let q = self
            .create_question(
                assignment_id,
                json!({
                    "type": "THEORY",
                    "text": "Explain why the sky is blue.",
                    "points": points
                }),
            )
            .await;
        q["id"].as_i64().unwrap()
    }

    pub async fn submit(
        &self,
        assignment_id: i64,
        student_token: &str,
        answers: HashMap<i64, Value>,
    ) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/assignments/{}/submit", assignment_id)))
            .bearer_auth(student_token)
            .json(&json!({ "answers": answers }))
            .send()
            .await
            .expect("Submit failed")
    }

    pub async fn paper(&self, assignment_id: i64, student_token: &str) -> Value {
        let resp = self
            .client
            .get(self.url(&format!("/api/assignments/{}/paper", assignment_id)))
            .bearer_auth(student_token)
            .send()
            .await
            .expect("Fetch paper failed");
        assert_eq!(resp.status().as_u16(), 200);
        resp.json().await.unwrap()
    }
}
