use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value as JsonValue;

use crate::{
    dto::question_dto::{ContentCheckResponse, QuestionTypeSummary},
    error::Result,
    models::{question::QuestionContent, question_type::QuestionTypeTag},
    services::answer_classifier::AnswerShapeClassifier,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/question-types",
    responses(
        (status = 200, description = "All question types with their default content")
    )
)]
#[axum::debug_handler]
pub async fn list_question_types(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let types: Vec<QuestionTypeSummary> = state
        .catalog
        .entries()
        .map(|entry| QuestionTypeSummary {
            tag: entry.tag,
            label: entry.label,
            review_by_default: entry.review_by_default,
            has_save_rule: entry.has_rule(),
            default_content: entry.default_content().to_value(),
        })
        .collect();
    Ok(Json(types))
}

#[utoipa::path(
    get,
    path = "/api/question-types/{tag}/default-content",
    params(
        ("tag" = String, Path, description = "Question type tag")
    ),
    responses(
        (status = 200, description = "Fresh default content for the type"),
        (status = 400, description = "Unknown question type")
    )
)]
#[axum::debug_handler]
pub async fn get_default_content(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<impl IntoResponse> {
    let tag: QuestionTypeTag = tag.parse()?;
    Ok(Json(state.catalog.default_content_for(tag).to_value()))
}

#[utoipa::path(
    post,
    path = "/api/question-types/{tag}/validate",
    params(
        ("tag" = String, Path, description = "Question type tag")
    ),
    responses(
        (status = 200, description = "Whether the content can be saved under this type"),
        (status = 400, description = "Unknown question type")
    )
)]
#[axum::debug_handler]
pub async fn check_content(
    State(state): State<AppState>,
    Path(tag): Path<String>,
    Json(content): Json<JsonValue>,
) -> Result<impl IntoResponse> {
    let tag: QuestionTypeTag = tag.parse()?;
    let outcome = QuestionContent::from_value(tag, content)
        .and_then(|typed| state.catalog.validate(tag, &typed));

    let response = match outcome {
        Ok(()) => ContentCheckResponse {
            valid: true,
            reason: None,
            message: None,
        },
        Err(e) => ContentCheckResponse {
            valid: false,
            reason: Some(e.reason()),
            message: Some(e.to_string()),
        },
    };
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/answers/render",
    responses(
        (status = 200, description = "How the answer is displayed to a reviewer")
    )
)]
pub async fn render_answer(Json(answer): Json<JsonValue>) -> impl IntoResponse {
    Json(AnswerShapeClassifier::render(&answer))
}
