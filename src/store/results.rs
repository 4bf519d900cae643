// src/store/results.rs

use sqlx::PgConnection;

use crate::models::assignment_result::AssignmentResult;

const RESULT_COLUMNS: &str = "id, assignment_id, student_id, score, updated_at";

/// Takes the row lock on the (assignment, student) result, creating the row
/// with score 0 if it does not exist yet.
///
/// Held until the surrounding transaction ends, so concurrent submissions
/// and regrades for the same student serialize here.
pub async fn lock(
    conn: &mut PgConnection,
    assignment_id: i64,
    student_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO results (assignment_id, student_id, score)
        VALUES ($1, $2, 0)
        ON CONFLICT (assignment_id, student_id) DO NOTHING
        "#,
    )
    .bind(assignment_id)
    .bind(student_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query("SELECT id FROM results WHERE assignment_id = $1 AND student_id = $2 FOR UPDATE")
        .bind(assignment_id)
        .bind(student_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Creates or overwrites the result for (assignment, student).
pub async fn upsert(
    conn: &mut PgConnection,
    assignment_id: i64,
    student_id: &str,
    score: i64,
) -> Result<AssignmentResult, sqlx::Error> {
    sqlx::query_as::<_, AssignmentResult>(&format!(
        r#"
        INSERT INTO results (assignment_id, student_id, score)
        VALUES ($1, $2, $3)
        ON CONFLICT (assignment_id, student_id) DO UPDATE SET
            score = EXCLUDED.score,
            updated_at = CASE
                WHEN results.score IS DISTINCT FROM EXCLUDED.score THEN CURRENT_TIMESTAMP
                ELSE results.updated_at
            END
        RETURNING {}
        "#,
        RESULT_COLUMNS
    ))
    .bind(assignment_id)
    .bind(student_id)
    .bind(score)
    .fetch_one(&mut *conn)
    .await
}

pub async fn fetch(
    conn: &mut PgConnection,
    assignment_id: i64,
    student_id: &str,
) -> Result<Option<AssignmentResult>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentResult>(&format!(
        "SELECT {} FROM results WHERE assignment_id = $1 AND student_id = $2",
        RESULT_COLUMNS
    ))
    .bind(assignment_id)
    .bind(student_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Results for an assignment, highest score first.
pub async fn list_for_assignment(
    conn: &mut PgConnection,
    assignment_id: i64,
) -> Result<Vec<AssignmentResult>, sqlx::Error> {
    sqlx::query_as::<_, AssignmentResult>(&format!(
        "SELECT {} FROM results WHERE assignment_id = $1 ORDER BY score DESC, student_id",
        RESULT_COLUMNS
    ))
    .bind(assignment_id)
    .fetch_all(&mut *conn)
    .await
}
