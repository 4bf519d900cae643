// src/grading/submission.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    error::AppError,
    grading::{AnswerPayload, GradedAnswer, grade, policy::SubmissionPolicy},
    models::{
        answer::{SubmissionReceipt, SubmittedValue},
        question::QuestionWithOptions,
    },
    store,
};

/// Everything a submission will write, computed before touching the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub graded: Vec<GradedAnswer>,
    pub total_score: i64,
    pub max_score: i64,
}

/// Grades the submitted answers against the assignment's questions.
///
/// Questions missing from `answers` are skipped. Ids in `answers` that are
/// not questions of this assignment are ignored. A value that cannot be
/// read for its question type rejects the whole submission.
pub fn plan_submission(
    questions: &[QuestionWithOptions],
    answers: &HashMap<i64, SubmittedValue>,
) -> Result<SubmissionPlan, AppError> {
    let mut graded = Vec::with_capacity(answers.len());

    for question in questions {
        let Some(value) = answers.get(&question.question.id) else {
            continue;
        };
        let payload = AnswerPayload::decode(question.question.kind, value).map_err(|e| {
            AppError::BadRequest(format!("Question {}: {}", question.question.id, e))
        })?;
        graded.push(grade(question, payload));
    }

    if graded.len() < answers.len() {
        let known: Vec<i64> = questions.iter().map(|q| q.question.id).collect();
        let unknown: Vec<&i64> = answers.keys().filter(|id| !known.contains(id)).collect();
        tracing::debug!("Ignoring answers for unknown questions: {:?}", unknown);
    }

    let total_score = graded.iter().map(|g| i64::from(g.points_earned)).sum();
    let max_score = questions.iter().map(|q| i64::from(q.question.points)).sum();

    Ok(SubmissionPlan {
        graded,
        total_score,
        max_score,
    })
}

/// Grades and stores one student's submission for an assignment.
///
/// * Rejects unknown assignments (404) and anything the policy refuses.
/// * Upserts one answer per answered question, keyed by (student, question).
/// * Overwrites the (assignment, student) result with this submission's total.
///
/// Runs in a single transaction holding the result row lock, so a failure
/// leaves nothing behind and resubmitting the same answers is a no-op.
pub async fn submit(
    pool: &PgPool,
    policy: SubmissionPolicy,
    assignment_id: i64,
    student_id: &str,
    answers: &HashMap<i64, SubmittedValue>,
) -> Result<SubmissionReceipt, AppError> {
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!("Failed to open submission transaction: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let assignment = store::assignments::fetch_assignment(&mut *tx, assignment_id)
        .await?
        .ok_or(AppError::NotFound("Assignment not found".to_string()))?;

    policy.admit(&assignment, Utc::now())?;

    store::results::lock(&mut *tx, assignment_id, student_id).await?;

    let questions = store::questions::load_questions(&mut *tx, assignment_id).await?;
    let plan = plan_submission(&questions, answers)?;

    for graded in &plan.graded {
        store::answers::upsert_answer(&mut *tx, student_id, graded)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to upsert answer for question {}: {:?}",
                    graded.question_id,
                    e
                );
                AppError::InternalServerError(e.to_string())
            })?;
    }

    let result = store::results::upsert(&mut *tx, assignment_id, student_id, plan.total_score)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert result: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    tx.commit().await?;

    tracing::info!(
        assignment_id,
        student_id,
        score = result.score,
        graded = plan.graded.len(),
        "Submission stored"
    );

    Ok(SubmissionReceipt {
        assignment_id,
        student_id: student_id.to_string(),
        score: result.score,
        max_score: plan.max_score,
        answers: plan.graded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::tests::question;
    use crate::models::question::QuestionKind;

    fn answers(entries: &[(i64, SubmittedValue)]) -> HashMap<i64, SubmittedValue> {
        entries.iter().cloned().collect()
    }

    fn mcq() -> QuestionWithOptions {
        // A is wrong, B is right.
        question(1, QuestionKind::MultipleChoice, 10, &[(11, false), (12, true)])
    }

    fn theory() -> QuestionWithOptions {
        question(2, QuestionKind::Theory, 20, &[])
    }

    #[test]
    fn test_correct_choice_scores_full_points() {
        let plan = plan_submission(&[mcq()], &answers(&[(1, SubmittedValue::Number(12))])).unwrap();
        assert_eq!(plan.graded.len(), 1);
        assert_eq!(plan.graded[0].is_correct, Some(true));
        assert_eq!(plan.graded[0].points_earned, 10);
        assert_eq!(plan.total_score, 10);
    }

    #[test]
    fn test_wrong_choice_scores_zero() {
        let plan = plan_submission(&[mcq()], &answers(&[(1, SubmittedValue::Number(11))])).unwrap();
        assert_eq!(plan.graded[0].is_correct, Some(false));
        assert_eq!(plan.total_score, 0);
    }

    #[test]
    fn test_theory_only_scores_zero() {
        let plan = plan_submission(
            &[theory()],
            &answers(&[(2, SubmittedValue::Text("my essay text".into()))]),
        )
        .unwrap();
        assert_eq!(plan.graded[0].is_correct, None);
        assert_eq!(plan.graded[0].points_earned, 0);
        assert_eq!(plan.graded[0].payload.answer_text(), Some("my essay text"));
        assert_eq!(plan.total_score, 0);
        assert_eq!(plan.max_score, 20);
    }

    #[test]
    fn test_mixed_assignment_only_counts_choice() {
        let plan = plan_submission(
            &[mcq(), theory()],
            &answers(&[
                (1, SubmittedValue::Number(12)),
                (2, SubmittedValue::Text("essay".into())),
            ]),
        )
        .unwrap();
        assert_eq!(plan.graded.len(), 2);
        assert_eq!(plan.total_score, 10);
        assert_eq!(plan.max_score, 30);
    }

    #[test]
    fn test_unanswered_question_is_skipped() {
        let plan = plan_submission(&[mcq(), theory()], &answers(&[(1, SubmittedValue::Number(12))])).unwrap();
        assert_eq!(plan.graded.len(), 1);
        assert!(plan.graded.iter().all(|g| g.question_id != 2));
        assert_eq!(plan.total_score, 10);
    }

    #[test]
    fn test_unknown_question_ids_are_ignored() {
        let plan = plan_submission(
            &[mcq()],
            &answers(&[(1, SubmittedValue::Number(12)), (404, SubmittedValue::Number(1))]),
        )
        .unwrap();
        assert_eq!(plan.graded.len(), 1);
        assert_eq!(plan.total_score, 10);
    }

    #[test]
    fn test_stale_option_id_scores_zero() {
        let plan = plan_submission(&[mcq()], &answers(&[(1, SubmittedValue::Number(999))])).unwrap();
        assert_eq!(plan.graded[0].is_correct, Some(false));
        assert_eq!(plan.total_score, 0);
    }

    #[test]
    fn test_unreadable_choice_rejects_submission() {
        let err = plan_submission(&[mcq()], &answers(&[(1, SubmittedValue::Text("B".into()))])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_nul_in_theory_text_rejects_submission() {
        let submitted = answers(&[
            (1, SubmittedValue::Number(12)),
            (2, SubmittedValue::Text("ok\0".into())),
        ]);
        let err = plan_submission(&[mcq(), theory()], &submitted).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_no_questions_scores_zero() {
        let plan = plan_submission(&[], &answers(&[(1, SubmittedValue::Number(12))])).unwrap();
        assert!(plan.graded.is_empty());
        assert_eq!(plan.total_score, 0);
        assert_eq!(plan.max_score, 0);
    }

    #[test]
    fn test_resubmission_replaces_previous_grade() {
        let questions = [mcq()];
        let first = plan_submission(&questions, &answers(&[(1, SubmittedValue::Number(12))])).unwrap();
        let second = plan_submission(&questions, &answers(&[(1, SubmittedValue::Number(11))])).unwrap();
        assert_eq!(first.total_score, 10);
        assert_eq!(second.total_score, 0);
        assert_eq!(second.graded[0].is_correct, Some(false));
    }

    #[test]
    fn test_plan_is_idempotent() {
        let questions = [mcq(), theory()];
        let submitted = answers(&[
            (1, SubmittedValue::Number(12)),
            (2, SubmittedValue::Text("essay".into())),
        ]);
        assert_eq!(
            plan_submission(&questions, &submitted).unwrap(),
            plan_submission(&questions, &submitted).unwrap()
        );
    }

    #[test]
    fn test_score_is_sum_of_graded_points() {
        let questions = [
            question(1, QuestionKind::MultipleChoice, 10, &[(11, false), (12, true)]),
            question(3, QuestionKind::MultipleChoice, 5, &[(31, true), (32, false)]),
            question(4, QuestionKind::MultipleChoice, 7, &[(41, true), (42, false)]),
        ];
        let plan = plan_submission(
            &questions,
            &answers(&[
                (1, SubmittedValue::Number(12)),
                (3, SubmittedValue::Text("31".into())),
                (4, SubmittedValue::Number(42)),
            ]),
        )
        .unwrap();
        let sum: i64 = plan.graded.iter().map(|g| i64::from(g.points_earned)).sum();
        assert_eq!(plan.total_score, sum);
        assert_eq!(plan.total_score, 15);
    }
}
