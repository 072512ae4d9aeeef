use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    dto::question_dto::QuestionPayload,
    error::Result,
    services::question_editor::QuestionEditor,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/assignment-blocks/{id}/questions",
    params(
        ("id" = i64, Path, description = "Assignment block ID")
    ),
    responses(
        (status = 200, description = "Questions of the block")
    )
)]
#[axum::debug_handler]
pub async fn list_block_questions(
    State(state): State<AppState>,
    Path(block_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let page = state.api.list_questions(block_id).await?;
    Ok(Json(json!({
        "items": page.items,
        "total": page.total,
        "totalPages": page.total_pages,
    })))
}

#[utoipa::path(
    get,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 200, description = "The question"),
        (status = 404, description = "Question not found")
    )
)]
#[axum::debug_handler]
pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    Ok(Json(state.api.get_question(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = QuestionPayload,
    responses(
        (status = 201, description = "Question created"),
        (status = 400, description = "Content or points rejected before reaching the API")
    )
)]
#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<QuestionPayload>,
) -> Result<impl IntoResponse> {
    let mut editor = QuestionEditor::from_payload(state.catalog, None, &payload)?;
    let question = editor.save(state.api.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[utoipa::path(
    patch,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    request_body = QuestionPayload,
    responses(
        (status = 200, description = "Question updated"),
        (status = 400, description = "Content or points rejected before reaching the API")
    )
)]
#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<QuestionPayload>,
) -> Result<impl IntoResponse> {
    let mut editor = QuestionEditor::from_payload(state.catalog, Some(id), &payload)?;
    let question = editor.save(state.api.as_ref()).await?;
    Ok(Json(question))
}

#[utoipa::path(
    delete,
    path = "/api/questions/{id}",
    params(
        ("id" = i64, Path, description = "Question ID")
    ),
    responses(
        (status = 204, description = "Question deleted")
    )
)]
#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.api.delete_question(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
