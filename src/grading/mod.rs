// src/grading/mod.rs

//! Auto-grading of assignment answers.
//!
//! `grade` is a pure function of a question and a decoded answer, which is
//! what lets the submission coordinator upsert its results idempotently.

pub mod policy;
pub mod regrade;
pub mod submission;

use serde::Serialize;

use crate::models::{
    answer::SubmittedValue,
    question::{QuestionKind, QuestionWithOptions},
};

/// A submitted answer after it has been interpreted against its question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerPayload {
    Theory { answer_text: String },
    Choice { selected_option_id: i64 },
}

impl AnswerPayload {
    /// Interprets a raw value according to the question type.
    ///
    /// Multiple-choice expects an option id, either as a number or as a
    /// string holding one. Theory expects text; a bare number is kept as
    /// its decimal form.
    pub fn decode(kind: QuestionKind, value: &SubmittedValue) -> Result<Self, String> {
        match (kind, value) {
            (QuestionKind::MultipleChoice, SubmittedValue::Number(id)) => Ok(AnswerPayload::Choice {
                selected_option_id: *id,
            }),
            (QuestionKind::MultipleChoice, SubmittedValue::Text(raw)) => raw
                .trim()
                .parse()
                .map(|id| AnswerPayload::Choice {
                    selected_option_id: id,
                })
                .map_err(|_| format!("expected an option id, got '{}'", raw)),
            (QuestionKind::Theory, SubmittedValue::Text(text)) if text.contains('\0') => {
                Err("answer text must not contain NUL characters".to_string())
            }
            (QuestionKind::Theory, SubmittedValue::Text(text)) => Ok(AnswerPayload::Theory {
                answer_text: text.clone(),
            }),
            (QuestionKind::Theory, SubmittedValue::Number(n)) => Ok(AnswerPayload::Theory {
                answer_text: n.to_string(),
            }),
        }
    }

    pub fn answer_text(&self) -> Option<&str> {
        match self {
            AnswerPayload::Theory { answer_text } => Some(answer_text),
            AnswerPayload::Choice { .. } => None,
        }
    }

    pub fn selected_option_id(&self) -> Option<i64> {
        match self {
            AnswerPayload::Choice { selected_option_id } => Some(*selected_option_id),
            AnswerPayload::Theory { .. } => None,
        }
    }
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradedAnswer {
    pub question_id: i64,
    #[serde(flatten)]
    pub payload: AnswerPayload,

    /// `None` for answers that need manual review.
    pub is_correct: Option<bool>,

    pub points_earned: i32,
}

/// Grades one answer against its question.
///
/// Never fails: an option id that matches none of the question's options
/// is simply incorrect.
pub fn grade(question: &QuestionWithOptions, payload: AnswerPayload) -> GradedAnswer {
    let q = &question.question;

    let (is_correct, points_earned) = match (q.kind, &payload) {
        (QuestionKind::MultipleChoice, AnswerPayload::Choice { selected_option_id }) => {
            let correct = question
                .options
                .iter()
                .find(|o| o.id == *selected_option_id)
                .is_some_and(|o| o.is_correct);
            (Some(correct), if correct { q.points } else { 0 })
        }
        (QuestionKind::MultipleChoice, AnswerPayload::Theory { .. }) => (Some(false), 0),
        (QuestionKind::Theory, _) => (None, 0),
    };

    GradedAnswer {
        question_id: q.id,
        payload,
        is_correct,
        points_earned,
    }
}
