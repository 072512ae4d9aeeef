use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::dto::review_dto::ReviewPayload;
use crate::error::{Error, Result};
use crate::models::answer_review::AnswerReview;
use crate::models::question::Question;
use crate::services::api_service::ConsoleApi;

/// The record's own `maxPoints` wins; the originating question's points are
/// the fallback.
pub fn resolve_max_points(review: &AnswerReview, question: Option<&Question>) -> Option<i32> {
    review.max_points.or_else(|| question.map(|q| q.points))
}

pub fn check_points(points: i32, max_points: i32) -> Result<i32> {
    if (0..=max_points).contains(&points) {
        Ok(points)
    } else {
        Err(Error::PointsOutOfRange {
            points,
            max: max_points,
        })
    }
}

/// Moves a pending review to `reviewed`. The record only changes after the
/// remote API accepted the grade.
pub struct ReviewSubmission<'a> {
    api: &'a dyn ConsoleApi,
}

impl<'a> ReviewSubmission<'a> {
    pub fn new(api: &'a dyn ConsoleApi) -> Self {
        Self { api }
    }

    pub async fn max_points_for(&self, review: &AnswerReview) -> Result<i32> {
        if let Some(max) = resolve_max_points(review, None) {
            return Ok(max);
        }
        let question = self.api.get_question(review.question_id).await?;
        resolve_max_points(review, Some(&question))
            .ok_or(Error::MaxPointsUnknown { review_id: review.id })
    }

    pub async fn submit(&self, review: &mut AnswerReview, is_correct: bool, points: i32) -> Result<()> {
        if !review.is_pending() {
            return Err(Error::AlreadyReviewed(review.id));
        }
        let max_points = self.max_points_for(review).await?;
        let points = check_points(points, max_points)?;

        let payload = ReviewPayload {
            student_answer_id: review.student_answer_id,
            is_correct,
            points,
        };
        if let Err(e) = self.api.submit_review(payload).await {
            warn!(review_id = review.id, error = %e, "Review submission failed");
            return Err(match e {
                Error::Remote { status: 409, .. } => Error::AlreadyReviewed(review.id),
                other => other,
            });
        }

        review.mark_reviewed(is_correct, points);
        info!(review_id = review.id, is_correct, points, max_points, "Answer reviewed");
        Ok(())
    }
}

/// Review ids with a submission outstanding, shared across gateway requests.
#[derive(Clone, Default)]
pub struct InFlightReviews {
    ids: Arc<Mutex<HashSet<i64>>>,
}

impl InFlightReviews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_begin(&self, review_id: i64) -> Result<InFlightGuard> {
        let mut ids = self.ids.lock().unwrap_or_else(|e| e.into_inner());
        if !ids.insert(review_id) {
            return Err(Error::ReviewInFlight(review_id));
        }
        Ok(InFlightGuard {
            ids: self.ids.clone(),
            review_id,
        })
    }

    pub fn contains(&self, review_id: i64) -> bool {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&review_id)
    }
}

/// Releases the review id when the submission finishes, whatever the outcome.
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<i64>>>,
    review_id: i64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.review_id);
    }
}
