// src/models/assignment_result.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::answer::Answer;

/// Represents the 'results' table in the database.
/// One row per (assignment_id, student_id), overwritten on every submission.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: String,
    pub score: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Returned after a teacher grades an answer by hand.
#[derive(Debug, Serialize)]
pub struct RegradeReceipt {
    pub answer: Answer,
    pub result: AssignmentResult,
}
