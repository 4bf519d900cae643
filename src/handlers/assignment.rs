// src/handlers/assignment.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        assignment::{CreateAssignmentRequest, StudentPaper},
        question::{CreateQuestionRequest, PublicQuestion},
    },
    store,
    utils::{html::sanitize_question, jwt::Claims},
};

/// Creates a new assignment.
/// Teacher only.
pub async fn create_assignment(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateAssignmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let mut conn = pool.acquire().await?;
    let assignment = store::assignments::insert_assignment(&mut conn, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create assignment: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Retrieves a single assignment by ID.
pub async fn get_assignment(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;
    let assignment = store::assignments::fetch_assignment(&mut conn, id)
        .await?
        .ok_or(AppError::NotFound("Assignment not found".to_string()))?;

    Ok(Json(assignment))
}

/// Adds a question (and its options) to an assignment.
/// Teacher only.
///
/// * Question and option text are HTML-sanitized first.
/// * Validates the sanitized text, points, attachment and options before any write.
/// * A multiple-choice question needs two or more options, exactly one correct.
pub async fn create_question(
    State(pool): State<PgPool>,
    Path(assignment_id): Path<i64>,
    Json(mut payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Cleaning can empty a field, so validate what will be stored.
    sanitize_question(&mut payload);
    payload.validate()?;
    payload.check_answer_key()?;

    let mut tx = pool.begin().await?;

    store::assignments::fetch_assignment(&mut *tx, assignment_id)
        .await?
        .ok_or(AppError::NotFound("Assignment not found".to_string()))?;

    let question = store::questions::insert_question(&mut *tx, assignment_id, &payload)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    tx.commit().await?;

    tracing::info!(
        assignment_id,
        question_id = question.question.id,
        "Question created"
    );

    Ok((StatusCode::CREATED, Json(question)))
}

/// Lists an assignment's questions including the answer key.
/// Teacher only.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Path(assignment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;

    store::assignments::fetch_assignment(&mut conn, assignment_id)
        .await?
        .ok_or(AppError::NotFound("Assignment not found".to_string()))?;

    let questions = store::questions::load_questions(&mut conn, assignment_id).await?;

    Ok(Json(questions))
}

/// Returns the caller's view of an assignment.
///
/// Questions come without the answer key, alongside the answers and result
/// the caller has already stored, so the client can render each question as
/// answered or unanswered.
pub async fn get_paper(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(assignment_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = pool.acquire().await?;

    let assignment = store::assignments::fetch_assignment(&mut conn, assignment_id)
        .await?
        .ok_or(AppError::NotFound("Assignment not found".to_string()))?;

    let questions = store::questions::load_questions(&mut conn, assignment_id).await?;
    let answers = store::answers::list_for_student(&mut conn, assignment_id, &claims.sub).await?;
    let result = store::results::fetch(&mut conn, assignment_id, &claims.sub).await?;

    Ok(Json(StudentPaper {
        assignment,
        questions: questions.iter().map(PublicQuestion::from).collect(),
        answers,
        result,
    }))
}
