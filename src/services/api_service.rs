use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::dto::question_dto::QuestionPayload;
use crate::dto::review_dto::{RemoteReviewQuery, ReviewPayload};
use crate::error::{Error, Result, REMOTE_FALLBACK_MESSAGE};
use crate::models::answer_review::AnswerReview;
use crate::models::question::Question;

const REVIEWS_PATH: &str = "answer-reviews";
const REVIEW_SUBMIT_PATH: &str = "answer-reviews/review";
const QUESTIONS_PATH: &str = "questions";

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            total_pages: 0,
        }
    }
}

/// The remote REST API the console drives. Persistence, pagination and
/// auto-grading all live on the other side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    async fn list_reviews(&self, query: RemoteReviewQuery) -> Result<Page<AnswerReview>>;
    async fn get_review(&self, review_id: i64) -> Result<AnswerReview>;
    async fn submit_review(&self, payload: ReviewPayload) -> Result<()>;
    async fn get_question(&self, question_id: i64) -> Result<Question>;
    async fn list_questions(&self, assignment_block_id: i64) -> Result<Page<Question>>;
    async fn create_question(&self, payload: QuestionPayload) -> Result<Question>;
    async fn update_question(&self, question_id: i64, payload: QuestionPayload) -> Result<Question>;
    async fn delete_question(&self, question_id: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct ApiService {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiService {
    pub fn new(base_url: Url, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        info!("Remote API client configured for {}", base_url);
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Internal(format!("Invalid endpoint {}: {}", path, e)))?;
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<JsonValue> {
        let response = builder.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Remote API request failed");
            Error::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "Remote API returned an error");
            return Err(remote_error(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&body).map_err(|e| undecodable(endpoint, e))
    }
}

#[async_trait]
impl ConsoleApi for ApiService {
    async fn list_reviews(&self, query: RemoteReviewQuery) -> Result<Page<AnswerReview>> {
        let builder = self
            .request(Method::GET, REVIEWS_PATH)?
            .query(&query.to_query_pairs());
        let body = self.send(builder, REVIEWS_PATH).await?;
        Ok(parse_list_envelope(body))
    }

    async fn get_review(&self, review_id: i64) -> Result<AnswerReview> {
        let path = format!("{}/{}", REVIEWS_PATH, review_id);
        let body = self.send(self.request(Method::GET, &path)?, &path).await?;
        parse_single(body)
    }

    async fn submit_review(&self, payload: ReviewPayload) -> Result<()> {
        info!(
            student_answer_id = payload.student_answer_id,
            is_correct = payload.is_correct,
            points = payload.points,
            "Submitting answer review"
        );
        let builder = self.request(Method::POST, REVIEW_SUBMIT_PATH)?.json(&payload);
        self.send(builder, REVIEW_SUBMIT_PATH).await?;
        Ok(())
    }

    async fn get_question(&self, question_id: i64) -> Result<Question> {
        let path = format!("{}/{}", QUESTIONS_PATH, question_id);
        let body = self.send(self.request(Method::GET, &path)?, &path).await?;
        parse_single(body)
    }

    async fn list_questions(&self, assignment_block_id: i64) -> Result<Page<Question>> {
        let builder = self
            .request(Method::GET, QUESTIONS_PATH)?
            .query(&[("assignmentBlockId", assignment_block_id.to_string())]);
        let body = self.send(builder, QUESTIONS_PATH).await?;
        Ok(parse_list_envelope(body))
    }

    async fn create_question(&self, payload: QuestionPayload) -> Result<Question> {
        info!(question_type = %payload.question_type, "Creating question");
        let builder = self.request(Method::POST, QUESTIONS_PATH)?.json(&payload);
        let body = self.send(builder, QUESTIONS_PATH).await?;
        parse_single(body)
    }

    async fn update_question(&self, question_id: i64, payload: QuestionPayload) -> Result<Question> {
        info!(question_id, question_type = %payload.question_type, "Updating question");
        let path = format!("{}/{}", QUESTIONS_PATH, question_id);
        let builder = self.request(Method::PATCH, &path)?.json(&payload);
        let body = self.send(builder, &path).await?;
        parse_single(body)
    }

    async fn delete_question(&self, question_id: i64) -> Result<()> {
        info!(question_id, "Deleting question");
        let path = format!("{}/{}", QUESTIONS_PATH, question_id);
        self.send(self.request(Method::DELETE, &path)?, &path).await?;
        Ok(())
    }
}

/// Accepts `{ data: [...], meta: { total, totalPages } }` or a bare array.
/// Anything else is an empty page, never an error.
pub fn parse_list_envelope<T: DeserializeOwned>(body: JsonValue) -> Page<T> {
    match body {
        JsonValue::Array(items) => {
            let items = parse_items(items);
            Page {
                total: items.len() as u64,
                total_pages: 1,
                items,
            }
        }
        JsonValue::Object(mut map) => {
            let meta = map.get("meta").and_then(|m| {
                let total = m.get("total")?.as_u64()?;
                let total_pages = m.get("totalPages")?.as_u64()?;
                Some((total, u32::try_from(total_pages).unwrap_or(u32::MAX)))
            });
            match (map.remove("data"), meta) {
                (Some(JsonValue::Array(items)), Some((total, total_pages))) => Page {
                    items: parse_items(items),
                    total,
                    total_pages,
                },
                _ => {
                    warn!("Unrecognised list envelope, treating as empty");
                    Page::empty()
                }
            }
        }
        _ => Page::empty(),
    }
}

fn parse_items<T: DeserializeOwned>(items: Vec<JsonValue>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(error = %e, "Dropping malformed list item");
                None
            }
        })
        .collect()
}

/// Single records may come bare or wrapped in `{ data: ... }`.
fn parse_single<T: DeserializeOwned>(body: JsonValue) -> Result<T> {
    let inner = match body {
        JsonValue::Object(mut map) if map.get("data").is_some_and(JsonValue::is_object) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(inner).map_err(|e| undecodable("single record", e))
}

pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<JsonValue>(body) else {
        return REMOTE_FALLBACK_MESSAGE.to_string();
    };
    let message = match value.get("message") {
        Some(JsonValue::String(s)) => Some(s.clone()),
        Some(JsonValue::Array(parts)) => {
            let parts: Vec<&str> = parts.iter().filter_map(JsonValue::as_str).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
    .or_else(|| value.get("error").and_then(JsonValue::as_str).map(str::to_string));

    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| REMOTE_FALLBACK_MESSAGE.to_string())
}

/// A body the remote API sent but we cannot read is a remote failure, not a
/// bad request from the console user.
fn undecodable(endpoint: &str, err: serde_json::Error) -> Error {
    warn!(endpoint, error = %err, "Remote API response could not be decoded");
    Error::Remote {
        status: StatusCode::BAD_GATEWAY.as_u16(),
        message: REMOTE_FALLBACK_MESSAGE.to_string(),
    }
}

fn remote_error(status: StatusCode, body: &str) -> Error {
    Error::Remote {
        status: status.as_u16(),
        message: extract_error_message(body),
    }
}
