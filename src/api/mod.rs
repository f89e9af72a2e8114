pub mod health;
pub mod report;
pub mod tax;

use crate::config::Config;
use crate::datasource::{FileTradeSource, SampleDataSource, TradeSource};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Source of the bundled sample dataset, when configured.
    pub sample_source: Option<Arc<dyn TradeSource>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let sample_source: Option<Arc<dyn TradeSource>> =
            match (&config.sample_data_path, &config.sample_data_url) {
                (Some(path), _) => Some(Arc::new(FileTradeSource::new(path.clone()))),
                (None, Some(url)) => Some(Arc::new(SampleDataSource::new(url.clone()))),
                (None, None) => None,
            };
        Self {
            config,
            sample_source,
        }
    }

    /// Replace the sample dataset source.
    pub fn with_sample_source(mut self, source: Arc<dyn TradeSource>) -> Self {
        self.sample_source = Some(source);
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/report", post(report::post_report))
        .route("/v1/sample", get(report::get_sample_report))
        .route("/v1/tax", post(tax::post_tax))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}
