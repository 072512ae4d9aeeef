use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Reviewed,
}

/// A student's answer to a question that needs a teacher's grade.
///
/// Created by the platform in `pending` state; the console moves it to
/// `reviewed` exactly once, fixing `is_correct` and `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerReview {
    pub id: i64,
    pub student_answer_id: i64,
    pub student_id: i64,
    pub question_id: i64,
    pub assignment_id: i64,
    /// Raw submitted answer. Its shape, not a tag, decides how it renders.
    #[serde(default)]
    pub answer: JsonValue,
    pub review_status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl AnswerReview {
    pub fn is_pending(&self) -> bool {
        self.review_status == ReviewStatus::Pending
    }

    pub(crate) fn mark_reviewed(&mut self, is_correct: bool, points: i32) {
        self.review_status = ReviewStatus::Reviewed;
        self.is_correct = Some(is_correct);
        self.points = Some(points);
        self.reviewed_at = Some(Utc::now());
    }
}
