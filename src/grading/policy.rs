// src/grading/policy.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::{error::AppError, models::assignment::Assignment};

/// Decides whether a submission is accepted for an assignment.
///
/// `Open` admits every submission, so students may resubmit without limit.
/// `DueDate` closes an assignment once its `due_at` has passed; assignments
/// without a due date stay open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPolicy {
    #[default]
    Open,
    DueDate,
}

impl SubmissionPolicy {
    pub fn admit(&self, assignment: &Assignment, now: DateTime<Utc>) -> Result<(), AppError> {
        match self {
            SubmissionPolicy::Open => Ok(()),
            SubmissionPolicy::DueDate => match assignment.due_at {
                Some(due_at) if now > due_at => Err(AppError::Forbidden(format!(
                    "Assignment {} closed for submissions at {}",
                    assignment.id,
                    due_at.to_rfc3339()
                ))),
                _ => Ok(()),
            },
        }
    }
}

impl FromStr for SubmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(SubmissionPolicy::Open),
            "due_date" | "deadline" => Ok(SubmissionPolicy::DueDate),
            other => Err(format!("unknown submission policy: {}", other)),
        }
    }
}
