// src/store/assignments.rs

use sqlx::PgConnection;

use crate::models::assignment::{Assignment, CreateAssignmentRequest};

pub async fn insert_assignment(
    conn: &mut PgConnection,
    req: &CreateAssignmentRequest,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        r#"
        INSERT INTO assignments (title, description, due_at)
        VALUES ($1, $2, $3)
        RETURNING id, title, description, due_at, created_at
        "#,
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.due_at)
    .fetch_one(&mut *conn)
    .await
}

pub async fn fetch_assignment(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(
        "SELECT id, title, description, due_at, created_at FROM assignments WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}
