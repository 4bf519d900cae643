// src/store/answers.rs

use sqlx::{FromRow, PgConnection};

use crate::{grading::GradedAnswer, models::answer::Answer};

const ANSWER_COLUMNS: &str = "id, student_id, question_id, answer_text, selected_option_id, is_correct, points_earned, updated_at";

/// Who an answer belongs to and how much it can be worth.
#[derive(Debug, FromRow)]
pub struct AnswerOwner {
    pub student_id: String,
    pub assignment_id: i64,
    pub max_points: i32,
}

/// Creates or overwrites the answer for (student_id, question_id).
///
/// `updated_at` only moves when the stored grading actually changes, so an
/// identical resubmission leaves the row untouched.
pub async fn upsert_answer(
    conn: &mut PgConnection,
    student_id: &str,
    graded: &GradedAnswer,
) -> Result<Answer, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        r#"
        INSERT INTO answers (student_id, question_id, answer_text, selected_option_id, is_correct, points_earned)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (student_id, question_id) DO UPDATE SET
            answer_text = EXCLUDED.answer_text,
            selected_option_id = EXCLUDED.selected_option_id,
            is_correct = EXCLUDED.is_correct,
            points_earned = EXCLUDED.points_earned,
            updated_at = CASE
                WHEN (answers.answer_text, answers.selected_option_id, answers.is_correct, answers.points_earned)
                    IS DISTINCT FROM
                    (EXCLUDED.answer_text, EXCLUDED.selected_option_id, EXCLUDED.is_correct, EXCLUDED.points_earned)
                THEN CURRENT_TIMESTAMP
                ELSE answers.updated_at
            END
        RETURNING {}
        "#,
        ANSWER_COLUMNS
    ))
    .bind(student_id)
    .bind(graded.question_id)
    .bind(graded.payload.answer_text())
    .bind(graded.payload.selected_option_id())
    .bind(graded.is_correct)
    .bind(graded.points_earned)
    .fetch_one(&mut *conn)
    .await
}

/// All answers a student has stored for the questions of one assignment.
pub async fn list_for_student(
    conn: &mut PgConnection,
    assignment_id: i64,
    student_id: &str,
) -> Result<Vec<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(
        r#"
        SELECT a.id, a.student_id, a.question_id, a.answer_text, a.selected_option_id,
               a.is_correct, a.points_earned, a.updated_at
        FROM answers a
        JOIN questions q ON q.id = a.question_id
        WHERE q.assignment_id = $1 AND a.student_id = $2
        ORDER BY a.question_id
        "#,
    )
    .bind(assignment_id)
    .bind(student_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn fetch_owner(
    conn: &mut PgConnection,
    answer_id: i64,
) -> Result<Option<AnswerOwner>, sqlx::Error> {
    sqlx::query_as::<_, AnswerOwner>(
        r#"
        SELECT a.student_id, q.assignment_id, q.points AS max_points
        FROM answers a
        JOIN questions q ON q.id = a.question_id
        WHERE a.id = $1
        "#,
    )
    .bind(answer_id)
    .fetch_optional(&mut *conn)
    .await
}

/// Overwrites the grading fields of one answer, keeping what was submitted.
pub async fn update_grade(
    conn: &mut PgConnection,
    answer_id: i64,
    points_earned: i32,
    is_correct: Option<bool>,
) -> Result<Answer, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        r#"
        UPDATE answers
        SET points_earned = $2, is_correct = $3, updated_at = CURRENT_TIMESTAMP
        WHERE id = $1
        RETURNING {}
        "#,
        ANSWER_COLUMNS
    ))
    .bind(answer_id)
    .bind(points_earned)
    .bind(is_correct)
    .fetch_one(&mut *conn)
    .await
}

/// Sum of every stored answer's points for (assignment, student).
pub async fn sum_points(
    conn: &mut PgConnection,
    assignment_id: i64,
    student_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(a.points_earned), 0)::BIGINT
        FROM answers a
        JOIN questions q ON q.id = a.question_id
        WHERE q.assignment_id = $1 AND a.student_id = $2
        "#,
    )
    .bind(assignment_id)
    .bind(student_id)
    .fetch_one(&mut *conn)
    .await
}
