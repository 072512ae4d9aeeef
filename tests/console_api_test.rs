use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use assignment_console::{
    dto::{
        question_dto::QuestionPayload,
        review_dto::{RemoteReviewQuery, ReviewPayload},
    },
    error::{Error, Result},
    models::{
        answer_review::{AnswerReview, ReviewStatus},
        question::Question,
    },
    routes::console_router,
    services::api_service::{ConsoleApi, Page},
    AppState,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

/// Remote API held in memory. Paginates and filters the way the platform does.
#[derive(Default)]
struct InMemoryApi {
    reviews: Mutex<Vec<AnswerReview>>,
    questions: Mutex<HashMap<i64, Question>>,
    next_question_id: AtomicUsize,
    list_calls: Mutex<Vec<RemoteReviewQuery>>,
    submit_calls: AtomicUsize,
    write_calls: AtomicUsize,
}

impl InMemoryApi {
    fn with_reviews(reviews: Vec<AnswerReview>) -> Self {
        Self {
            reviews: Mutex::new(reviews),
            next_question_id: AtomicUsize::new(100),
            ..Self::default()
        }
    }

    fn insert_question(&self, question: Question) {
        self.questions.lock().unwrap().insert(question.id, question);
    }

    fn store(&self, id: Option<i64>, payload: QuestionPayload) -> Result<Question> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let id = id.unwrap_or_else(|| self.next_question_id.fetch_add(1, Ordering::SeqCst) as i64);
        let question = Question {
            id,
            assignment_block_id: payload.assignment_block_id,
            content: payload.typed_content()?,
            points: payload.points,
            requires_teacher_review: payload.requires_teacher_review,
        };
        self.insert_question(question.clone());
        Ok(question)
    }
}

#[async_trait]
impl ConsoleApi for InMemoryApi {
    async fn list_reviews(&self, query: RemoteReviewQuery) -> Result<Page<AnswerReview>> {
        self.list_calls.lock().unwrap().push(query.clone());
        let matching: Vec<AnswerReview> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| query.review_status.map_or(true, |s| r.review_status == s))
            .filter(|r| query.student_id.map_or(true, |s| r.student_id == s))
            .filter(|r| query.assignment_id.map_or(true, |a| r.assignment_id == a))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let limit = query.limit.max(1) as usize;
        let total_pages = matching.len().div_ceil(limit) as u32;
        let items = matching
            .into_iter()
            .skip((query.page.saturating_sub(1)) as usize * limit)
            .take(limit)
            .collect();
        Ok(Page {
            items,
            total,
            total_pages,
        })
    }

    async fn get_review(&self, review_id: i64) -> Result<AnswerReview> {
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == review_id)
            .cloned()
            .ok_or(Error::Remote {
                status: 404,
                message: "Answer review not found".to_string(),
            })
    }

    async fn submit_review(&self, payload: ReviewPayload) -> Result<()> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.student_answer_id == payload.student_answer_id)
            .ok_or(Error::Remote {
                status: 404,
                message: "Answer not found".to_string(),
            })?;
        if review.review_status == ReviewStatus::Reviewed {
            return Err(Error::Remote {
                status: 409,
                message: "Answer already reviewed".to_string(),
            });
        }
        review.review_status = ReviewStatus::Reviewed;
        review.is_correct = Some(payload.is_correct);
        review.points = Some(payload.points);
        Ok(())
    }

    async fn get_question(&self, question_id: i64) -> Result<Question> {
        self.questions
            .lock()
            .unwrap()
            .get(&question_id)
            .cloned()
            .ok_or(Error::Remote {
                status: 404,
                message: "Question not found".to_string(),
            })
    }

    async fn list_questions(&self, assignment_block_id: i64) -> Result<Page<Question>> {
        let mut items: Vec<Question> = self
            .questions
            .lock()
            .unwrap()
            .values()
            .filter(|q| q.assignment_block_id == assignment_block_id)
            .cloned()
            .collect();
        items.sort_by_key(|q| q.id);
        Ok(Page {
            total: items.len() as u64,
            total_pages: 1,
            items,
        })
    }

    async fn create_question(&self, payload: QuestionPayload) -> Result<Question> {
        self.store(None, payload)
    }

    async fn update_question(&self, question_id: i64, payload: QuestionPayload) -> Result<Question> {
        self.store(Some(question_id), payload)
    }

    async fn delete_question(&self, question_id: i64) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.questions.lock().unwrap().remove(&question_id);
        Ok(())
    }
}

fn review(id: i64, answer: JsonValue, status: ReviewStatus, max_points: Option<i32>) -> AnswerReview {
    serde_json::from_value(json!({
        "id": id,
        "studentAnswerId": id * 10,
        "studentId": 5,
        "questionId": 900 + id,
        "assignmentId": 3,
        "answer": answer,
        "reviewStatus": status,
        "maxPoints": max_points,
    }))
    .unwrap()
}

fn app(api: Arc<InMemoryApi>) -> Router {
    console_router(AppState::with_api(api), 1000)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_service_name() {
    let app = app(Arc::new(InMemoryApi::default()));
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "assignment-console");
}

#[tokio::test]
async fn catalog_lists_all_fifteen_types() {
    let app = app(Arc::new(InMemoryApi::default()));
    let (status, body) = send(&app, "GET", "/api/question-types", None).await;
    assert_eq!(status, StatusCode::OK);

    let types = body.as_array().unwrap();
    assert_eq!(types.len(), 15);
    let matching = types
        .iter()
        .find(|t| t["tag"] == "match-picture-to-text")
        .unwrap();
    assert_eq!(matching["hasSaveRule"], true);
    assert_eq!(matching["defaultContent"]["pairs"].as_array().unwrap().len(), 2);
    let free_text = types.iter().find(|t| t["tag"] == "free-text").unwrap();
    assert_eq!(free_text["reviewByDefault"], true);
}

#[tokio::test]
async fn default_content_for_unknown_tag_is_rejected() {
    let app = app(Arc::new(InMemoryApi::default()));

    let (status, body) = send(&app, "GET", "/api/question-types/fill-blank/default-content", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["sentence"].is_string());

    let (status, body) = send(&app, "GET", "/api/question-types/essay/default-content", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("essay"));
}

#[tokio::test]
async fn validate_reports_why_match_content_cannot_be_saved() {
    let app = app(Arc::new(InMemoryApi::default()));
    let uri = "/api/question-types/match-picture-to-text/validate";

    let one_pair = json!({ "text": "Match", "pairs": [{ "image": "a.png", "text": "apple" }] });
    let (status, body) = send(&app, "POST", uri, Some(one_pair)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["reason"], "insufficient pairs");

    let blank_text = json!({
        "text": "Match",
        "pairs": [{ "image": "a.png", "text": "apple" }, { "image": "b.png", "text": "  " }]
    });
    let (_, body) = send(&app, "POST", uri, Some(blank_text)).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["reason"], "incomplete pair");

    let complete = json!({
        "text": "Match",
        "pairs": [{ "image": "a.png", "text": "apple" }, { "image": "b.png", "text": "banana" }]
    });
    let (_, body) = send(&app, "POST", uri, Some(complete)).await;
    assert_eq!(body["valid"], true);
    assert!(body.get("reason").is_none());

    let wrong_shape = json!({ "text": "Pick", "options": [] });
    let (_, body) = send(&app, "POST", uri, Some(wrong_shape)).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["reason"], "malformed content");
}

#[tokio::test]
async fn render_uses_answer_shape() {
    let app = app(Arc::new(InMemoryApi::default()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/answers/render",
        Some(json!({ "selectedOptions": ["A", "C"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["strategy"], "choice-list");
    assert_eq!(body["display"], "A, C");

    let (_, body) = send(&app, "POST", "/api/answers/render", Some(json!({ "foo": 1 }))).await;
    assert_eq!(body["strategy"], "unknown");
}

#[tokio::test]
async fn invalid_match_question_never_reaches_the_api() {
    let api = Arc::new(InMemoryApi::with_reviews(vec![]));
    let app = app(api.clone());

    let payload = json!({
        "assignmentBlockId": 4,
        "type": "match-picture-to-text",
        "content": { "text": "Match", "pairs": [{ "image": "a.png", "text": "" }, { "image": "b.png", "text": "b" }] },
        "points": 2,
        "requiresTeacherReview": false
    });
    let (status, body) = send(&app, "POST", "/api/questions", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("incomplete pair"));
    assert_eq!(api.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn question_lifecycle_through_gateway() {
    let api = Arc::new(InMemoryApi::with_reviews(vec![]));
    let app = app(api.clone());

    let payload = json!({
        "assignmentBlockId": 4,
        "type": "free-text",
        "content": { "text": "Describe your weekend" },
        "points": 3,
        "requiresTeacherReview": true
    });
    let (status, created) = send(&app, "POST", "/api/questions", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["type"], "free-text");

    let update = json!({
        "assignmentBlockId": 4,
        "type": "single-best-choice",
        "content": {
            "text": "Pick one",
            "options": [{ "text": "A", "isCorrect": true }, { "text": "B", "isCorrect": false }]
        },
        "points": 1
    });
    let (status, updated) = send(&app, "PATCH", &format!("/api/questions/{}", id), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["type"], "single-best-choice");

    let (status, listed) = send(&app, "GET", "/api/assignment-blocks/4/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);
    assert_eq!(listed["items"][0]["id"], id);

    let (status, _) = send(&app, "DELETE", &format!("/api/questions/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/api/questions/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn zero_points_question_is_rejected() {
    let api = Arc::new(InMemoryApi::with_reviews(vec![]));
    let app = app(api.clone());
    let payload = json!({
        "assignmentBlockId": 4,
        "type": "free-text",
        "content": { "text": "Describe your weekend" },
        "points": 0
    });
    let (status, _) = send(&app, "POST", "/api/questions", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(api.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn review_list_filters_renders_and_clamps_page() {
    let reviews = (1..=7)
        .map(|id| {
            let status = if id % 2 == 0 {
                ReviewStatus::Reviewed
            } else {
                ReviewStatus::Pending
            };
            review(id, json!({ "text": format!("answer {}", id) }), status, Some(3))
        })
        .collect();
    let api = Arc::new(InMemoryApi::with_reviews(reviews));
    let app = app(api.clone());

    let (status, body) = send(&app, "GET", "/api/answer-reviews?limit=5&page=9", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 7);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["page"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["renderedAnswer"]["display"], "answer 6");

    let (_, body) = send(&app, "GET", "/api/answer-reviews?reviewStatus=pending", None).await;
    assert_eq!(body["total"], 4);
    let items = body["items"].as_array().unwrap();
    assert!(items.iter().all(|row| row["actionable"] == true));
    assert!(items.iter().all(|row| row["state"] == "pending"));

    let last = api.list_calls.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.review_status, Some(ReviewStatus::Pending));
    assert_eq!(last.limit, 10);
}

#[tokio::test]
async fn unsupported_page_size_is_rejected() {
    let api = Arc::new(InMemoryApi::with_reviews(vec![]));
    let app = app(api.clone());
    let (status, _) = send(&app, "GET", "/api/answer-reviews?limit=7", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(api.list_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn review_submission_respects_point_bounds_and_finality() {
    let api = Arc::new(InMemoryApi::with_reviews(vec![review(
        1,
        json!({ "text": "my answer" }),
        ReviewStatus::Pending,
        Some(3),
    )]));
    let app = app(api.clone());
    let uri = "/api/answer-reviews/1/review";

    let (status, _) = send(&app, "POST", uri, Some(json!({ "isCorrect": true, "points": 4 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(api.submit_calls.load(Ordering::SeqCst), 0);

    let (status, _) = send(&app, "POST", uri, Some(json!({ "isCorrect": true, "points": -1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(api.submit_calls.load(Ordering::SeqCst), 0);

    let (status, body) = send(&app, "POST", uri, Some(json!({ "isCorrect": true, "points": 3 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviewStatus"], "reviewed");
    assert_eq!(body["points"], 3);
    assert_eq!(api.submit_calls.load(Ordering::SeqCst), 1);

    let (status, _) = send(&app, "POST", uri, Some(json!({ "isCorrect": false, "points": 0 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(api.submit_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_max_points_falls_back_to_question_points() {
    let api = Arc::new(InMemoryApi::with_reviews(vec![review(
        2,
        json!({ "imageUrl": "https://cdn.example.com/p.png" }),
        ReviewStatus::Pending,
        None,
    )]));
    api.insert_question(
        serde_json::from_value(json!({
            "id": 902,
            "assignmentBlockId": 4,
            "type": "free-text-photo",
            "content": { "text": "Photograph your work", "imageUrl": "" },
            "points": 2
        }))
        .unwrap(),
    );
    let app = app(api.clone());
    let uri = "/api/answer-reviews/2/review";

    let (status, _) = send(&app, "POST", uri, Some(json!({ "isCorrect": true, "points": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "POST", uri, Some(json!({ "isCorrect": true, "points": 2 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 2);
}

#[tokio::test]
async fn unknown_review_maps_to_not_found() {
    let app = app(Arc::new(InMemoryApi::with_reviews(vec![])));
    let (status, body) = send(
        &app,
        "POST",
        "/api/answer-reviews/77/review",
        Some(json!({ "isCorrect": true, "points": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Answer review not found");
}

#[tokio::test]
async fn empty_review_list_reports_first_page() {
    let app = app(Arc::new(InMemoryApi::with_reviews(vec![])));
    let (status, body) = send(&app, "GET", "/api/answer-reviews?page=6", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalPages"], 0);
    assert!(body["items"].as_array().unwrap().is_empty());
}
