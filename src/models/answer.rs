// src/models/answer.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::grading::GradedAnswer;

/// Represents the 'answers' table in the database.
/// One row per (student_id, question_id); resubmission overwrites it.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub student_id: String,
    pub question_id: i64,

    /// Populated for theory questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,

    /// Populated for multiple-choice questions. May reference an option
    /// that no longer exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_option_id: Option<i64>,

    /// `None` means the answer is not machine-gradable.
    pub is_correct: Option<bool>,

    pub points_earned: i32,
    pub updated_at: DateTime<Utc>,
}

/// A raw submitted value: free text or an option id.
///
/// Which one is expected is decided by the owning question's type, not by
/// the shape of the value; see `AnswerPayload::decode`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SubmittedValue {
    Number(i64),
    Text(String),
}

/// DTO for submitting an assignment.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    /// User's answers map.
    /// Key: Question ID (i64)
    /// Value: option id for multiple-choice, text for theory
    #[serde(default)]
    pub answers: HashMap<i64, SubmittedValue>,
}

/// Returned after a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub assignment_id: i64,
    pub student_id: String,
    pub score: i64,

    /// Sum of the points of every question on the assignment.
    pub max_score: i64,

    pub answers: Vec<GradedAnswer>,
}

/// DTO for a teacher grading one answer by hand.
#[derive(Debug, Deserialize, Validate)]
pub struct RegradeRequest {
    #[validate(range(min = 0))]
    pub points_earned: i32,
    pub is_correct: Option<bool>,
}
