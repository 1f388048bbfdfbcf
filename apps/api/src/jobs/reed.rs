//! Reed API client — pagination, dedup, and strict location filtering.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::normalize::{location_matches, normalize_job, Job, ReedJob};

const BASE_URL: &str = "https://www.reed.co.uk/api/1.0";
/// Reed rejects resultsToTake above 100, so larger requests are batched.
const MAX_PER_REQUEST: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<ReedJob>,
    #[serde(rename = "totalResults", default)]
    total_results: u32,
}

/// Search parameters accepted by the gateway.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub query: String,
    pub location: Option<String>,
    pub page: u32,
    pub results_per_page: usize,
    pub full_time: Option<bool>,
    pub part_time: Option<bool>,
    pub permanent: Option<bool>,
    pub contract: Option<bool>,
}

#[derive(Debug)]
pub struct SearchOutcome {
    /// Total results the upstream reports, not the number returned here.
    pub total: u32,
    pub jobs: Vec<Job>,
}

#[derive(Clone)]
pub struct ReedClient {
    client: Client,
    /// Precomputed Basic auth header; Reed takes the key as the username.
    auth_header: Option<String>,
}

impl ReedClient {
    pub fn new(api_key: Option<String>) -> Self {
        let auth_header = api_key.map(|key| format!("Basic {}", BASE64.encode(format!("{key}:"))));
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            auth_header,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.auth_header.is_some()
    }

    fn auth(&self) -> Result<String, AppError> {
        self.auth_header.clone().ok_or_else(|| {
            AppError::JobApi(
                "API key missing. Please set REED_API_KEY in the environment.".to_string(),
            )
        })
    }

    /// Searches Reed, batching upstream requests of at most 100 results and
    /// dropping duplicates and location mismatches along the way.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchOutcome, AppError> {
        let auth = self.auth()?;

        let total_needed = params.results_per_page.max(1);
        let base_skip = (params.page.max(1) as usize - 1) * total_needed;

        let mut jobs = Vec::new();
        let mut seen_ids: HashSet<i64> = HashSet::new();
        let mut total_found = 0;
        let mut fetched = 0;

        while fetched < total_needed {
            let take = (total_needed - fetched).min(MAX_PER_REQUEST);
            let page = self
                .fetch_page(&auth, params, take, base_skip + fetched)
                .await?;
            total_found = page.total_results;

            if page.results.is_empty() {
                break;
            }

            let batch_len = page.results.len();
            for job in &page.results {
                if let Some(search_location) = params.location.as_deref() {
                    let job_location = job.location_name.as_deref().unwrap_or("");
                    if !location_matches(job_location, search_location) {
                        continue;
                    }
                }
                let Some(id) = job.job_id else { continue };
                if seen_ids.insert(id) {
                    jobs.push(normalize_job(job, false));
                }
            }

            fetched += batch_len;
            // A short page means the upstream ran out of results.
            if batch_len < take {
                break;
            }
        }

        info!(
            "Reed search returned {} unique jobs ({} available upstream)",
            jobs.len(),
            total_found
        );

        Ok(SearchOutcome {
            total: total_found,
            jobs,
        })
    }

    async fn fetch_page(
        &self,
        auth: &str,
        params: &SearchParams,
        take: usize,
        skip: usize,
    ) -> Result<SearchPage, AppError> {
        let mut query: Vec<(&str, String)> = vec![
            ("keywords", params.query.clone()),
            ("resultsToTake", take.to_string()),
            ("resultsToSkip", skip.to_string()),
        ];

        if let Some(location) = &params.location {
            query.push(("locationName", location.clone()));
            query.push(("distanceFromLocation", "0".to_string()));
        }

        for (name, value) in [
            ("fullTime", params.full_time),
            ("partTime", params.part_time),
            ("permanent", params.permanent),
            ("contract", params.contract),
        ] {
            if let Some(v) = value {
                query.push((name, v.to_string()));
            }
        }

        let response = self
            .client
            .get(format!("{BASE_URL}/search"))
            .header(reqwest::header::AUTHORIZATION, auth)
            .query(&query)
            .send()
            .await
            .map_err(job_api_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::JobApi(format!(
                "Reed API error: {}",
                status.as_u16()
            )));
        }

        response.json::<SearchPage>().await.map_err(job_api_error)
    }

    /// Fetches full details for a single job by Reed id.
    pub async fn job_details(&self, job_id: &str) -> Result<Job, AppError> {
        let auth = self.auth()?;

        let response = self
            .client
            .get(format!("{BASE_URL}/jobs/{job_id}"))
            .header(reqwest::header::AUTHORIZATION, auth)
            .send()
            .await
            .map_err(job_api_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::JobApi(format!(
                "Job not found or API error: {}",
                status.as_u16()
            )));
        }

        let job: ReedJob = response.json().await.map_err(job_api_error)?;
        Ok(normalize_job(&job, true))
    }
}

fn job_api_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::JobApi("Request timeout. Please try again.".to_string())
    } else {
        AppError::JobApi(format!("Error fetching jobs: {e}"))
    }
}
