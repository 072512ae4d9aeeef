use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    dto::review_dto::{ReviewListQuery, ReviewListResponse, ReviewRowResponse, SubmitReviewRequest},
    error::Result,
    services::{
        review_queue::{ReviewQueue, RowState},
        review_submission::ReviewSubmission,
    },
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/answer-reviews",
    params(
        ("reviewStatus" = Option<String>, Query, description = "all, pending or reviewed"),
        ("studentId" = Option<i64>, Query, description = "Only this student's answers"),
        ("assignmentId" = Option<i64>, Query, description = "Only answers to this assignment"),
        ("page" = Option<u32>, Query, description = "Page number, clamped to the available pages"),
        ("limit" = Option<u32>, Query, description = "Page size: 5, 10, 20, 50 or 100")
    ),
    responses(
        (status = 200, description = "One page of answer reviews"),
        (status = 400, description = "Unsupported page size")
    )
)]
#[axum::debug_handler]
pub async fn list_answer_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<impl IntoResponse> {
    let mut queue = ReviewQueue::from_query(&query)?;
    queue.refresh(state.api.as_ref()).await?;

    let items = queue
        .rows()
        .iter()
        .map(|row| {
            let submitting = state.in_flight.contains(row.review.id);
            let row_state = match row.state {
                RowState::Pending if submitting => RowState::Submitting,
                other => other,
            };
            ReviewRowResponse {
                review: row.review.clone(),
                rendered_answer: row.rendered.clone(),
                state: row_state,
                actionable: row_state == RowState::Pending,
            }
        })
        .collect();

    Ok(Json(ReviewListResponse {
        items,
        total: queue.total(),
        total_pages: queue.total_pages(),
        page: queue.page(),
        limit: queue.limit(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/answer-reviews/{id}/review",
    params(
        ("id" = i64, Path, description = "Answer review ID")
    ),
    responses(
        (status = 200, description = "Review recorded"),
        (status = 400, description = "Points outside [0, maxPoints]"),
        (status = 409, description = "Already reviewed or a submission is in progress")
    )
)]
#[axum::debug_handler]
pub async fn submit_answer_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<impl IntoResponse> {
    request.validate()?;
    let _guard = state.in_flight.try_begin(id)?;

    let mut review = state.api.get_review(id).await?;
    ReviewSubmission::new(state.api.as_ref())
        .submit(&mut review, request.is_correct, request.points)
        .await?;
    Ok(Json(review))
}
