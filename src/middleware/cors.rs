use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// The console front end is served from a different origin than the gateway.
pub fn console_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .allow_origin(Any)
}
