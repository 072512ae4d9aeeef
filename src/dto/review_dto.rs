use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::answer_review::{AnswerReview, ReviewStatus};
use crate::services::answer_classifier::RenderedAnswer;
use crate::services::review_queue::RowState;

/// Sent to the remote review endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub student_answer_id: i64,
    pub is_correct: bool,
    pub points: i32,
}

/// Reviewer's decision as posted to the gateway. The upper bound depends on
/// the record, so only the lower bound is checked here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    pub is_correct: bool,
    #[validate(range(min = 0, message = "Points cannot be negative"))]
    pub points: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Reviewed,
}

impl StatusFilter {
    pub fn as_status(&self) -> Option<ReviewStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(ReviewStatus::Pending),
            StatusFilter::Reviewed => Some(ReviewStatus::Reviewed),
        }
    }
}

/// Gateway list query. Missing fields fall back to the queue defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewListQuery {
    pub review_status: StatusFilter,
    pub student_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Filters plus the page actually requested from the remote API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReviewQuery {
    pub review_status: Option<ReviewStatus>,
    pub student_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub page: u32,
    pub limit: u32,
}

impl RemoteReviewQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.review_status {
            let status = match status {
                ReviewStatus::Pending => "pending",
                ReviewStatus::Reviewed => "reviewed",
            };
            pairs.push(("reviewStatus", status.to_string()));
        }
        if let Some(student_id) = self.student_id {
            pairs.push(("studentId", student_id.to_string()));
        }
        if let Some(assignment_id) = self.assignment_id {
            pairs.push(("assignmentId", assignment_id.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRowResponse {
    pub review: AnswerReview,
    pub rendered_answer: RenderedAnswer,
    pub state: RowState,
    pub actionable: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListResponse {
    pub items: Vec<ReviewRowResponse>,
    pub total: u64,
    pub total_pages: u32,
    pub page: u32,
    pub limit: u32,
}
