// src/models/question.rs

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use url::Url;
use validator::Validate;

use crate::error::AppError;

/// Maximum number of options a multiple-choice question may carry.
pub const MAX_OPTIONS: usize = 20;

static MEDIA_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]+/[a-z0-9][a-z0-9!#$&^_.+-]{0,126}$").expect("media type pattern is valid")
});

/// Question type. Backed by the Postgres enum `question_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "question_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionKind {
    /// Free-text answer, never auto-graded.
    Theory,
    /// Exactly one option is the correct one.
    MultipleChoice,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub assignment_id: i64,

    /// Serialized as `type` to match the authoring payload.
    #[serde(rename = "type")]
    pub kind: QuestionKind,

    pub text: String,

    /// Maximum score for this question. Always positive.
    pub points: i32,

    pub attachment_url: Option<String>,
    pub attachment_media_type: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Question {
    pub fn attachment(&self) -> Option<Attachment> {
        match (&self.attachment_url, &self.attachment_media_type) {
            (Some(url), Some(media_type)) => Some(Attachment {
                url: url.clone(),
                media_type: media_type.clone(),
            }),
            _ => None,
        }
    }
}

/// Represents the 'question_options' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
    pub position: i32,
}

/// A question together with its options, as loaded for grading.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionWithOptions {
    #[serde(flatten)]
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub media_type: String,
}

/// DTO for sending a question to a student (excludes the answer key).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub text: String,
    pub points: i32,
    pub attachment: Option<Attachment>,
    pub options: Vec<PublicOption>,
}

#[derive(Debug, Serialize)]
pub struct PublicOption {
    pub id: i64,
    pub text: String,
}

impl From<&QuestionWithOptions> for PublicQuestion {
    fn from(q: &QuestionWithOptions) -> Self {
        PublicQuestion {
            id: q.question.id,
            kind: q.question.kind,
            text: q.question.text.clone(),
            points: q.question.points,
            attachment: q.question.attachment(),
            options: q
                .options
                .iter()
                .map(|o| PublicOption {
                    id: o.id,
                    text: o.text.clone(),
                })
                .collect(),
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[serde(rename = "type", alias = "kind")]
    pub kind: QuestionKind,
    #[validate(length(min = 1, max = 5000), custom(function = validate_not_blank))]
    pub text: String,
    #[validate(range(min = 1, max = 10000))]
    pub points: i32,
    #[validate(custom(function = validate_attachment))]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    #[validate(custom(function = validate_options))]
    pub options: Vec<CreateOptionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOptionRequest {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl CreateQuestionRequest {
    /// Cross-field checks the derive cannot express.
    ///
    /// A multiple-choice question needs at least two options and exactly
    /// one of them marked correct. Options on a theory question are stored
    /// but never consulted.
    pub fn check_answer_key(&self) -> Result<(), AppError> {
        if self.kind != QuestionKind::MultipleChoice {
            return Ok(());
        }

        if self.options.len() < 2 {
            return Err(AppError::BadRequest(
                "A multiple-choice question needs at least two options".to_string(),
            ));
        }

        let correct = self.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            return Err(AppError::BadRequest(format!(
                "A multiple-choice question needs exactly one correct option, got {}",
                correct
            )));
        }

        Ok(())
    }
}

fn validate_not_blank(text: &str) -> Result<(), validator::ValidationError> {
    if text.trim().is_empty() {
        return Err(validator::ValidationError::new("text_is_blank"));
    }
    Ok(())
}

fn validate_attachment(attachment: &Attachment) -> Result<(), validator::ValidationError> {
    if attachment.url.len() > 500 {
        return Err(validator::ValidationError::new("url_too_long"));
    }
    if Url::parse(&attachment.url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    if !MEDIA_TYPE_RE.is_match(&attachment.media_type) {
        return Err(validator::ValidationError::new("invalid_media_type"));
    }
    Ok(())
}

fn validate_options(options: &[CreateOptionRequest]) -> Result<(), validator::ValidationError> {
    if options.len() > MAX_OPTIONS {
        return Err(validator::ValidationError::new("too_many_options"));
    }
    for opt in options {
        if opt.text.trim().is_empty() {
            return Err(validator::ValidationError::new("option_text_is_blank"));
        }
        if opt.text.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateQuestionRequest {
        serde_json::from_value(value).unwrap()
    }

    fn mcq(options: serde_json::Value) -> CreateQuestionRequest {
        request(json!({
            "type": "MULTIPLE_CHOICE",
            "text": "Which is prime?",
            "points": 10,
            "options": options
        }))
    }

    #[test]
    fn test_valid_multiple_choice() {
        let req = mcq(json!([
            {"text": "4", "is_correct": false},
            {"text": "7", "is_correct": true}
        ]));
        assert!(req.validate().is_ok());
        assert!(req.check_answer_key().is_ok());
    }

    #[test]
    fn test_multiple_choice_needs_two_options() {
        let req = mcq(json!([{"text": "7", "is_correct": true}]));
        assert!(matches!(req.check_answer_key(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_multiple_choice_needs_exactly_one_correct() {
        let none = mcq(json!([{"text": "4"}, {"text": "6"}]));
        assert!(none.check_answer_key().is_err());

        let two = mcq(json!([
            {"text": "5", "is_correct": true},
            {"text": "7", "is_correct": true}
        ]));
        assert!(two.check_answer_key().is_err());
    }

    #[test]
    fn test_theory_without_options_is_valid() {
        let req = request(json!({"type": "THEORY", "text": "Explain photosynthesis.", "points": 20}));
        assert!(req.validate().is_ok());
        assert!(req.check_answer_key().is_ok());
        assert!(req.options.is_empty());
    }

    #[test]
    fn test_rejects_non_positive_points_and_blank_text() {
        let zero = request(json!({"type": "THEORY", "text": "Why?", "points": 0}));
        assert!(zero.validate().is_err());

        let blank = request(json!({"type": "THEORY", "text": "   ", "points": 5}));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_attachment_validation() {
        let good = request(json!({
            "type": "THEORY",
            "text": "Describe the diagram.",
            "points": 5,
            "attachment": {"url": "https://cdn.example.com/cell.png", "media_type": "image/png"}
        }));
        assert!(good.validate().is_ok());

        let bad_url = request(json!({
            "type": "THEORY",
            "text": "Describe the diagram.",
            "points": 5,
            "attachment": {"url": "not a url", "media_type": "image/png"}
        }));
        assert!(bad_url.validate().is_err());

        let bad_media = request(json!({
            "type": "THEORY",
            "text": "Describe the diagram.",
            "points": 5,
            "attachment": {"url": "https://cdn.example.com/cell.png", "media_type": "png"}
        }));
        assert!(bad_media.validate().is_err());
    }

    #[test]
    fn test_blank_option_text_rejected() {
        let req = mcq(json!([
            {"text": " ", "is_correct": false},
            {"text": "7", "is_correct": true}
        ]));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_kind_alias_accepted() {
        let req = request(json!({"kind": "THEORY", "text": "Why?", "points": 3}));
        assert_eq!(req.kind, QuestionKind::Theory);
    }
}
