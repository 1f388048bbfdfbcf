//! Axum route handlers for the Jobs API.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::jobs::normalize::Job;
use crate::jobs::reed::SearchParams;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    pub full_time: bool,
    pub part_time: bool,
    pub permanent: bool,
    pub contract: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub location: Option<String>,
    // Accepted for forward compatibility; Reed serves UK listings only.
    #[allow(dead_code)]
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub filters: SearchFilters,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub location: Option<String>,
    #[allow(dead_code)]
    pub country: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(rename = "fullTime")]
    pub full_time: Option<bool>,
    #[serde(rename = "partTime")]
    pub part_time: Option<bool>,
    pub permanent: Option<bool>,
    pub contract: Option<bool>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub count: u32,
    pub page: u32,
    pub results_per_page: usize,
    pub jobs: Vec<Job>,
}

/// GET /api/jobs/search — query-string variant kept for older clients.
pub async fn handle_search_get(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    if query.q.trim().is_empty() {
        return Err(AppError::Validation(
            "Search keywords cannot be empty".to_string(),
        ));
    }

    let params = SearchParams {
        query: query.q,
        location: query.location,
        page: query.page.max(1),
        results_per_page: query.limit.clamp(1, 200),
        full_time: query.full_time,
        part_time: query.part_time,
        permanent: query.permanent,
        contract: query.contract,
    };

    run_search(&state, params).await
}

/// POST /api/jobs/search
pub async fn handle_search_post(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation(
            "Search keywords cannot be empty".to_string(),
        ));
    }

    let params = SearchParams {
        query: request.query,
        location: request.location,
        page: 1,
        results_per_page: 100,
        full_time: Some(request.filters.full_time),
        part_time: Some(request.filters.part_time),
        permanent: Some(request.filters.permanent),
        contract: Some(request.filters.contract),
    };

    run_search(&state, params).await
}

async fn run_search(
    state: &AppState,
    params: SearchParams,
) -> Result<Json<SearchResponse>, AppError> {
    let outcome = state.jobs.search(&params).await?;
    Ok(Json(SearchResponse {
        success: true,
        count: outcome.total,
        page: params.page,
        results_per_page: params.results_per_page,
        jobs: outcome.jobs,
    }))
}

/// GET /api/jobs/countries
pub async fn handle_countries() -> Json<Value> {
    Json(json!({
        "countries": [
            {"code": "gb", "name": "United Kingdom", "flag": "🇬🇧"},
            {"code": "us", "name": "United States", "flag": "🇺🇸"}
        ]
    }))
}

/// GET /api/jobs/:id
pub async fn handle_job_details(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let job = state.jobs.job_details(&job_id).await?;
    Ok(Json(json!({ "success": true, "job": job })))
}
