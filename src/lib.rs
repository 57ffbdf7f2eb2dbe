pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::PgPool;

use crate::database::{PgStore, Store};
use crate::services::{
    ai_service::AIService, analytics_service::AnalyticsService,
    application_service::ApplicationService, job_service::JobService,
    saved_job_service::SavedJobService, user_service::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub saved_job_service: SavedJobService,
    pub analytics_service: AnalyticsService,
    pub ai_service: AIService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self::with_store(Arc::new(PgStore::new(pool)))
    }

    /// Wires every service over one shared store. The provider client is built once here.
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            user_service: UserService::new(
                store.clone(),
                config.jwt_secret.clone(),
                config.jwt_ttl_days,
            ),
            job_service: JobService::new(store.clone()),
            application_service: ApplicationService::new(store.clone()),
            saved_job_service: SavedJobService::new(store.clone()),
            analytics_service: AnalyticsService::new(store),
            ai_service: AIService::new(
                http_client,
                config.openai_api_key.clone(),
                config.openai_model.clone(),
                config.openai_max_tokens,
                config.openai_base_url.clone(),
            ),
        }
    }
}
