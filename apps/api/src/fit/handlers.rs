//! Axum route handler for CV fit analysis.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::handlers::CV_GONE_MESSAGE;
use crate::errors::AppError;
use crate::fit::FitAnalysis;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub cv_id: String,
    pub job_title: String,
    pub job_description: String,
    #[serde(default)]
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: FitAnalysis,
    pub detected_industry: String,
}

/// POST /api/cv/analyze
///
/// Recomputed on every request; analyses are never cached.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let profile = state
        .cv_store
        .get(&request.cv_id)
        .await
        .ok_or_else(|| AppError::NotFound(CV_GONE_MESSAGE.to_string()))?;

    info!(
        "Analyzing CV fit for {} at {}",
        request.job_title, request.company_name
    );

    let analysis = state
        .fit_analyzer
        .analyze(&profile, &request.job_title, &request.job_description)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        detected_industry: profile.detected_industry,
        analysis,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::config::Config;
    use crate::cv::profile::CvProfile;
    use crate::cv::store::CvStore;
    use crate::fit::{DomainMatch, FitAnalyzer};
    use crate::jobs::reed::ReedClient;
    use crate::llm_client::LlmClient;

    /// Canned analyzer standing in for the LLM.
    struct StubAnalyzer {
        score: u32,
    }

    #[async_trait]
    impl FitAnalyzer for StubAnalyzer {
        async fn analyze(
            &self,
            _profile: &CvProfile,
            _job_title: &str,
            _job_description: &str,
        ) -> Result<FitAnalysis, AppError> {
            Ok(FitAnalysis {
                is_valid_cv: Some(true),
                rejection_reason: None,
                score: self.score,
                domain_match: DomainMatch::GoodMatch,
                matching_skills: vec!["Python".to_string()],
                missing_skills: vec![],
                advice: vec![],
                project_recommendations: vec![],
                summary: "Strong candidate".to_string(),
                score_interpretation: String::new(),
                breakdown: serde_json::Value::Null,
                job_analysis: serde_json::Value::Null,
            })
        }
    }

    async fn test_state(analyzer: Arc<dyn FitAnalyzer>) -> AppState {
        let db = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        AppState {
            db,
            jobs: ReedClient::new(None),
            llm: LlmClient::new(None),
            cv_store: CvStore::with_ttl(Duration::from_secs(60)),
            fit_analyzer: analyzer,
            config: Config {
                database_url: "sqlite::memory:".to_string(),
                reed_api_key: None,
                github_token: None,
                frontend_dist: "frontend/dist".into(),
                port: 0,
                rust_log: "info".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_analyze_returns_stub_result_for_stored_cv() {
        let state = test_state(Arc::new(StubAnalyzer { score: 88 })).await;
        let profile = CvProfile::from_text("cv.txt", "txt", "Jane Doe\nEngineer\npython".to_string());
        let cv_id = state.cv_store.insert(profile).await;

        let response = handle_analyze(
            State(state),
            Json(AnalyzeRequest {
                cv_id,
                job_title: "Engineer".to_string(),
                job_description: "python work".to_string(),
                company_name: "Acme".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(response.0.success);
        assert_eq!(response.0.analysis.score, 88);
        assert_eq!(response.0.detected_industry, "General");
    }

    #[tokio::test]
    async fn test_analyze_unknown_cv_id_is_not_found() {
        let state = test_state(Arc::new(StubAnalyzer { score: 50 })).await;
        let result = handle_analyze(
            State(state),
            Json(AnalyzeRequest {
                cv_id: "missing".to_string(),
                job_title: "Engineer".to_string(),
                job_description: "python work".to_string(),
                company_name: String::new(),
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_analyze_empty_job_description_is_rejected() {
        let state = test_state(Arc::new(StubAnalyzer { score: 50 })).await;
        let result = handle_analyze(
            State(state),
            Json(AnalyzeRequest {
                cv_id: "anything".to_string(),
                job_title: "Engineer".to_string(),
                job_description: "   ".to_string(),
                company_name: String::new(),
            }),
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
