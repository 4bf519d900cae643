// src/models/assignment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::{answer::Answer, assignment_result::AssignmentResult, question::PublicQuestion};

/// Represents the 'assignments' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,

    /// Consulted by the submission policy when deadlines are enforced.
    pub due_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new assignment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

/// What a student sees when opening an assignment: the questions without
/// the answer key, plus whatever they have already submitted.
#[derive(Debug, Serialize)]
pub struct StudentPaper {
    pub assignment: Assignment,
    pub questions: Vec<PublicQuestion>,
    pub answers: Vec<Answer>,
    pub result: Option<AssignmentResult>,
}
