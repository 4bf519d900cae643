// src/handlers/review.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    grading::regrade,
    models::answer::RegradeRequest,
    store,
};

/// Lists every student's result for an assignment, highest first.
/// Teacher only.
pub async fn list_results(
    State(pool): State<PgPool>,
    Path(assignment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;

    store::assignments::fetch_assignment(&mut conn, assignment_id)
        .await?
        .ok_or(AppError::NotFound("Assignment not found".to_string()))?;

    let results = store::results::list_for_assignment(&mut conn, assignment_id).await?;

    Ok(Json(results))
}

/// Lists one student's stored answers for an assignment, for review.
/// Teacher only.
pub async fn list_student_answers(
    State(pool): State<PgPool>,
    Path((assignment_id, student_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let answers = store::answers::list_for_student(&mut conn, assignment_id, &student_id).await?;

    Ok(Json(answers))
}

/// Grades one answer by hand and refreshes the student's result.
/// Teacher only.
pub async fn regrade_answer(
    State(pool): State<PgPool>,
    Path(answer_id): Path<i64>,
    Json(payload): Json<RegradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let receipt =
        regrade::regrade_answer(&pool, answer_id, payload.points_earned, payload.is_correct).await?;

    Ok(Json(receipt))
}
