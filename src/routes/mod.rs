pub mod answer_reviews;
pub mod health;
pub mod question_types;
pub mod questions;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{
        cors::console_cors,
        rate_limit::{rps_middleware, RateLimiter},
    },
    AppState,
};

/// Every console route behind one rate limiter. `/health` stays outside it.
pub fn console_router(state: AppState, rps: u32) -> Router {
    let base_routes = Router::new().route("/health", get(health::health));

    let console_api = Router::new()
        .route("/api/question-types", get(question_types::list_question_types))
        .route(
            "/api/question-types/:tag/default-content",
            get(question_types::get_default_content),
        )
        .route(
            "/api/question-types/:tag/validate",
            post(question_types::check_content),
        )
        .route("/api/answers/render", post(question_types::render_answer))
        .route(
            "/api/assignment-blocks/:id/questions",
            get(questions::list_block_questions),
        )
        .route("/api/questions", post(questions::create_question))
        .route(
            "/api/questions/:id",
            get(questions::get_question)
                .patch(questions::update_question)
                .delete(questions::delete_question),
        )
        .route("/api/answer-reviews", get(answer_reviews::list_answer_reviews))
        .route(
            "/api/answer-reviews/:id/review",
            post(answer_reviews::submit_answer_review),
        )
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::per_second(rps),
            rps_middleware,
        ));

    base_routes
        .merge(console_api)
        .with_state(state)
        .layer(console_cors())
        .layer(TraceLayer::new_for_http())
}
