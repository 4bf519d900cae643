// src/handlers/submission.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::PgPool;

use crate::{
    error::AppError,
    grading::{policy::SubmissionPolicy, submission},
    models::answer::SubmitAnswersRequest,
    utils::jwt::Claims,
};

/// Submits the caller's answers for an assignment and returns the score.
///
/// The caller's token subject is the student id. Resubmitting overwrites
/// the previous answers and result.
pub async fn submit_answers(
    State(pool): State<PgPool>,
    State(policy): State<SubmissionPolicy>,
    Extension(claims): Extension<Claims>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<SubmitAnswersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let receipt = submission::submit(&pool, policy, assignment_id, &claims.sub, &req.answers).await?;

    Ok(Json(receipt))
}
