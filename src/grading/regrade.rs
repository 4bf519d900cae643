// src/grading/regrade.rs

use sqlx::PgPool;

use crate::{error::AppError, models::assignment_result::RegradeReceipt, store};

/// Manually grades one stored answer, typically a theory answer left at zero.
///
/// The owning result is recomputed as the sum of every answer the student
/// has stored for the assignment. Points must lie within `0..=question.points`.
pub async fn regrade_answer(
    pool: &PgPool,
    answer_id: i64,
    points_earned: i32,
    is_correct: Option<bool>,
) -> Result<RegradeReceipt, AppError> {
    let mut tx = pool.begin().await?;

    let owner = store::answers::fetch_owner(&mut *tx, answer_id)
        .await?
        .ok_or(AppError::NotFound("Answer not found".to_string()))?;

    check_points(points_earned, owner.max_points)?;

    store::results::lock(&mut *tx, owner.assignment_id, &owner.student_id).await?;

    let answer = store::answers::update_grade(&mut *tx, answer_id, points_earned, is_correct)
        .await
        .map_err(|e| {
            tracing::error!("Failed to regrade answer {}: {:?}", answer_id, e);
            AppError::InternalServerError(e.to_string())
        })?;

    let score = store::answers::sum_points(&mut *tx, owner.assignment_id, &owner.student_id).await?;
    let result = store::results::upsert(&mut *tx, owner.assignment_id, &owner.student_id, score).await?;

    tx.commit().await?;

    tracing::info!(
        answer_id,
        assignment_id = owner.assignment_id,
        student_id = %owner.student_id,
        points_earned,
        score,
        "Answer regraded"
    );

    Ok(RegradeReceipt { answer, result })
}

fn check_points(points_earned: i32, max_points: i32) -> Result<(), AppError> {
    if !(0..=max_points).contains(&points_earned) {
        return Err(AppError::BadRequest(format!(
            "points_earned must be between 0 and {}",
            max_points
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_points_bounds() {
        assert!(check_points(0, 20).is_ok());
        assert!(check_points(20, 20).is_ok());
        assert!(matches!(check_points(21, 20), Err(AppError::BadRequest(_))));
        assert!(check_points(-1, 20).is_err());
    }
}
