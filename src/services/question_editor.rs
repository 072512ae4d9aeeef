use tracing::{info, warn};
use validator::Validate;

use crate::dto::question_dto::QuestionPayload;
use crate::error::{Error, Result};
use crate::models::question::{Question, QuestionContent};
use crate::models::question_type::QuestionTypeTag;
use crate::services::api_service::ConsoleApi;
use crate::services::catalog::QuestionTypeCatalog;

pub const DEFAULT_QUESTION_TYPE: QuestionTypeTag = QuestionTypeTag::SingleBestChoice;

/// Edit state of a single question. The type is read off the content
/// variant, so the two can never disagree.
#[derive(Clone)]
pub struct QuestionEditor {
    catalog: QuestionTypeCatalog,
    id: Option<i64>,
    assignment_block_id: i64,
    content: QuestionContent,
    points: i32,
    requires_teacher_review: bool,
}

impl QuestionEditor {
    pub fn new(catalog: QuestionTypeCatalog, assignment_block_id: i64) -> Self {
        Self::with_type(catalog, assignment_block_id, DEFAULT_QUESTION_TYPE)
    }

    pub fn with_type(
        catalog: QuestionTypeCatalog,
        assignment_block_id: i64,
        tag: QuestionTypeTag,
    ) -> Self {
        Self {
            catalog,
            id: None,
            assignment_block_id,
            content: catalog.default_content_for(tag),
            points: 1,
            requires_teacher_review: catalog.review_by_default(tag),
        }
    }

    pub fn edit(catalog: QuestionTypeCatalog, question: Question) -> Self {
        Self {
            catalog,
            id: Some(question.id),
            assignment_block_id: question.assignment_block_id,
            content: question.content,
            points: question.points,
            requires_teacher_review: question.requires_teacher_review,
        }
    }

    /// Editor for a question arriving over the wire; `id` is `None` for a
    /// question that does not exist yet.
    pub fn from_payload(
        catalog: QuestionTypeCatalog,
        id: Option<i64>,
        payload: &QuestionPayload,
    ) -> Result<Self> {
        Ok(Self {
            catalog,
            id,
            assignment_block_id: payload.assignment_block_id,
            content: payload.typed_content()?,
            points: payload.points,
            requires_teacher_review: payload.requires_teacher_review,
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn assignment_block_id(&self) -> i64 {
        self.assignment_block_id
    }

    pub fn question_type(&self) -> QuestionTypeTag {
        self.content.tag()
    }

    pub fn content(&self) -> &QuestionContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut QuestionContent {
        &mut self.content
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn set_points(&mut self, points: i32) {
        self.points = points;
    }

    pub fn requires_teacher_review(&self) -> bool {
        self.requires_teacher_review
    }

    pub fn set_requires_teacher_review(&mut self, requires_review: bool) {
        self.requires_teacher_review = requires_review;
    }

    /// Switches type and replaces the content with the new type's default.
    /// Nothing is carried over, even when re-selecting the current type.
    pub fn set_type(&mut self, tag: QuestionTypeTag) {
        self.content = self.catalog.default_content_for(tag);
    }

    pub fn payload(&self) -> QuestionPayload {
        QuestionPayload::new(
            self.assignment_block_id,
            &self.content,
            self.points,
            self.requires_teacher_review,
        )
    }

    /// Local checks run before anything is sent.
    pub fn check(&self) -> Result<QuestionPayload> {
        self.catalog.validate(self.question_type(), &self.content)?;
        let payload = self.payload();
        payload.validate()?;
        Ok(payload)
    }

    /// Creates or updates depending on whether the question has an id. On
    /// any failure the editor keeps its state so the user can retry.
    pub async fn save(&mut self, api: &dyn ConsoleApi) -> Result<Question> {
        let payload = self.check()?;
        let saved = match self.id {
            Some(id) => api.update_question(id, payload).await,
            None => api.create_question(payload).await,
        }
        .map_err(|e| {
            warn!(question_id = ?self.id, error = %e, "Saving question failed");
            e
        })?;

        info!(question_id = saved.id, question_type = %saved.question_type(), "Question saved");
        self.id = Some(saved.id);
        Ok(saved)
    }

    pub async fn delete(&mut self, api: &dyn ConsoleApi) -> Result<()> {
        let id = self
            .id
            .ok_or_else(|| Error::BadRequest("Question has not been saved yet".to_string()))?;
        api.delete_question(id).await?;
        self.id = None;
        Ok(())
    }
}
