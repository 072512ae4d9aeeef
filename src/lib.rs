pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    api_service::{ApiService, ConsoleApi},
    catalog::QuestionTypeCatalog,
    review_submission::InFlightReviews,
};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ConsoleApi>,
    pub catalog: QuestionTypeCatalog,
    pub in_flight: InFlightReviews,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let api = ApiService::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::with_api(Arc::new(api)))
    }

    pub fn with_api(api: Arc<dyn ConsoleApi>) -> Self {
        Self {
            api,
            catalog: QuestionTypeCatalog::standard(),
            in_flight: InFlightReviews::new(),
        }
    }
}
