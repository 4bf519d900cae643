// src/store/questions.rs

use std::collections::HashMap;

use sqlx::PgConnection;

use crate::models::question::{
    CreateQuestionRequest, Question, QuestionOption, QuestionWithOptions,
};

const QUESTION_COLUMNS: &str = "id, assignment_id, kind, text, points, attachment_url, attachment_media_type, created_at";

/// Inserts a question and its options. Options keep the order they were authored in.
///
/// Run inside a transaction so a failing option insert does not leave a
/// question without its answer key.
pub async fn insert_question(
    conn: &mut PgConnection,
    assignment_id: i64,
    req: &CreateQuestionRequest,
) -> Result<QuestionWithOptions, sqlx::Error> {
    let (attachment_url, attachment_media_type) = match &req.attachment {
        Some(a) => (Some(a.url.as_str()), Some(a.media_type.as_str())),
        None => (None, None),
    };

    let question = sqlx::query_as::<_, Question>(&format!(
        r#"
        INSERT INTO questions (assignment_id, kind, text, points, attachment_url, attachment_media_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        QUESTION_COLUMNS
    ))
    .bind(assignment_id)
    .bind(req.kind)
    .bind(&req.text)
    .bind(req.points)
    .bind(attachment_url)
    .bind(attachment_media_type)
    .fetch_one(&mut *conn)
    .await?;

    let mut options = Vec::with_capacity(req.options.len());
    for (position, opt) in req.options.iter().enumerate() {
        let option = sqlx::query_as::<_, QuestionOption>(
            r#"
            INSERT INTO question_options (question_id, text, is_correct, position)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question_id, text, is_correct, position
            "#,
        )
        .bind(question.id)
        .bind(&opt.text)
        .bind(opt.is_correct)
        .bind(position as i32)
        .fetch_one(&mut *conn)
        .await?;
        options.push(option);
    }

    Ok(QuestionWithOptions { question, options })
}

/// Loads every question of an assignment with its options, ordered by id.
pub async fn load_questions(
    conn: &mut PgConnection,
    assignment_id: i64,
) -> Result<Vec<QuestionWithOptions>, sqlx::Error> {
    let questions = sqlx::query_as::<_, Question>(&format!(
        "SELECT {} FROM questions WHERE assignment_id = $1 ORDER BY id",
        QUESTION_COLUMNS
    ))
    .bind(assignment_id)
    .fetch_all(&mut *conn)
    .await?;

    if questions.is_empty() {
        return Ok(Vec::new());
    }

    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();

    let options = sqlx::query_as::<_, QuestionOption>(
        r#"
        SELECT id, question_id, text, is_correct, position
        FROM question_options
        WHERE question_id = ANY($1)
        ORDER BY question_id, position, id
        "#,
    )
    .bind(&question_ids[..])
    .fetch_all(&mut *conn)
    .await?;

    let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
    for option in options {
        by_question.entry(option.question_id).or_default().push(option);
    }

    Ok(questions
        .into_iter()
        .map(|question| {
            let options = by_question.remove(&question.id).unwrap_or_default();
            QuestionWithOptions { question, options }
        })
        .collect())
}
