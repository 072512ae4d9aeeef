use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::error::Result;
use crate::models::question::QuestionContent;
use crate::models::question_type::QuestionTypeTag;

/// Body of question create/update, both at the gateway and towards the
/// remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    #[validate(range(min = 1, message = "Assignment block is required"))]
    pub assignment_block_id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionTypeTag,
    pub content: JsonValue,
    #[validate(range(min = 1, message = "Points must be at least 1"))]
    pub points: i32,
    #[serde(default)]
    pub requires_teacher_review: bool,
}

impl QuestionPayload {
    pub fn new(
        assignment_block_id: i64,
        content: &QuestionContent,
        points: i32,
        requires_teacher_review: bool,
    ) -> Self {
        Self {
            assignment_block_id,
            question_type: content.tag(),
            content: content.to_value(),
            points,
            requires_teacher_review,
        }
    }

    /// Typed view of `content`, checked against `type`.
    pub fn typed_content(&self) -> Result<QuestionContent> {
        Ok(QuestionContent::from_value(
            self.question_type,
            self.content.clone(),
        )?)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionTypeSummary {
    pub tag: QuestionTypeTag,
    pub label: &'static str,
    pub review_by_default: bool,
    pub has_save_rule: bool,
    pub default_content: JsonValue,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCheckResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
