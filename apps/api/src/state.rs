use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::cv::store::CvStore;
use crate::fit::FitAnalyzer;
use crate::jobs::reed::ReedClient;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jobs: ReedClient,
    pub llm: LlmClient,
    /// Uploaded CV profiles. In-memory only; entries expire after an hour.
    pub cv_store: CvStore,
    /// Pluggable fit analyzer. Production wiring uses `LlmFitAnalyzer`;
    /// handler tests substitute a canned implementation.
    pub fit_analyzer: Arc<dyn FitAnalyzer>,
    pub config: Config,
}
