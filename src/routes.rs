// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{assignment, review, submission},
    state::AppState,
    utils::jwt::{auth_middleware, teacher_middleware},
};

/// Assembles the main application router.
///
/// * Teacher routes: authoring, results and manual grading.
/// * Student routes: paper view and submission, open to any signed-in user.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let allow_origin = if state.config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let teacher_routes = Router::new()
        .route("/assignments", post(assignment::create_assignment))
        .route(
            "/assignments/{id}/questions",
            post(assignment::create_question).get(assignment::list_questions),
        )
        .route("/assignments/{id}/results", get(review::list_results))
        .route(
            "/assignments/{id}/students/{student_id}/answers",
            get(review::list_student_answers),
        )
        .route("/answers/{id}/grade", put(review::regrade_answer))
        .layer(middleware::from_fn(teacher_middleware));

    let student_routes = Router::new()
        .route("/assignments/{id}", get(assignment::get_assignment))
        .route("/assignments/{id}/paper", get(assignment::get_paper))
        .route("/assignments/{id}/submit", post(submission::submit_answers));

    // Auth runs first on every API route, then the teacher check where layered.
    let api_routes = teacher_routes
        .merge(student_routes)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api", api_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
