//! Axum route handlers for CV optimization and document download.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cv::handlers::CV_GONE_MESSAGE;
use crate::cv::profile::CvProfile;
use crate::errors::AppError;
use crate::fit::FitAnalysis;
use crate::optimizer::cover_letter::generate_cover_letter;
use crate::optimizer::{gap_analysis_text, generate_tailored_cv, TailoredCv};
use crate::render::{compile_typst, sanitize_filename, typst};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub cv_id: String,
    pub job_title: String,
    pub job_description: String,
    pub company_name: String,
    #[serde(default)]
    pub ats_analysis: Option<FitAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct TailorPreviewResponse {
    pub success: bool,
    pub tailored_cv: String,
    pub job_title: String,
    pub company: String,
}

async fn stored_profile(state: &AppState, cv_id: &str) -> Result<CvProfile, AppError> {
    state
        .cv_store
        .get(cv_id)
        .await
        .ok_or_else(|| AppError::NotFound(CV_GONE_MESSAGE.to_string()))
}

/// POST /api/cv/generate — runs the optimization and returns the preview
/// text without rendering a document.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorPreviewResponse>, AppError> {
    let profile = stored_profile(&state, &request.cv_id).await?;

    info!(
        "Generating tailored CV for {} at {}",
        request.job_title, request.company_name
    );

    let tailored = generate_tailored_cv(
        &state.llm,
        &profile,
        &request.job_title,
        &request.company_name,
        &request.job_description,
        request.ats_analysis.as_ref(),
    )
    .await?;

    Ok(Json(TailorPreviewResponse {
        success: true,
        tailored_cv: gap_analysis_text(&tailored, request.ats_analysis.as_ref()),
        job_title: request.job_title,
        company: request.company_name,
    }))
}

/// POST /api/cv/generate/pdf — full pipeline: optimize, render, stream back
/// the PDF with improvement metadata in response headers.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<(HeaderMap, Bytes), AppError> {
    let profile = stored_profile(&state, &request.cv_id).await?;

    info!(
        "Generating PDF CV for {} at {}",
        request.job_title, request.company_name
    );

    let tailored = generate_tailored_cv(
        &state.llm,
        &profile,
        &request.job_title,
        &request.company_name,
        &request.job_description,
        request.ats_analysis.as_ref(),
    )
    .await?;

    let source = typst::cv_document(&tailored);
    let pdf = compile_typst(&source).await?;

    let filename = format!(
        "CV_{}_{}.pdf",
        sanitize_filename(&request.company_name),
        sanitize_filename(&request.job_title)
    );
    info!("PDF generated successfully: {filename}");

    Ok((pdf_headers(&filename, &tailored)?, Bytes::from(pdf)))
}

/// POST /api/cv/generate/cover-letter/pdf
pub async fn handle_cover_letter_pdf(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<(HeaderMap, Bytes), AppError> {
    let profile = stored_profile(&state, &request.cv_id).await?;

    info!(
        "Generating cover letter PDF for {} at {}",
        request.job_title, request.company_name
    );

    let letter = generate_cover_letter(
        &state.llm,
        &profile,
        &request.job_title,
        &request.company_name,
        &request.job_description,
    )
    .await?;

    let source = typst::cover_letter_document(&letter, &request.job_title, &request.company_name);
    let pdf = compile_typst(&source).await?;

    let filename = format!(
        "Cover_Letter_{}_{}.pdf",
        sanitize_filename(&request.company_name),
        sanitize_filename(&request.job_title)
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("attachment; filename={filename}"))?,
    );

    Ok((headers, Bytes::from(pdf)))
}

fn pdf_headers(filename: &str, tailored: &TailoredCv) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        header_value(&format!("attachment; filename={filename}"))?,
    );
    // Browsers hide custom headers from JS unless explicitly exposed.
    headers.insert(
        "Access-Control-Expose-Headers",
        HeaderValue::from_static("X-New-Score, X-Skills-Added"),
    );
    headers.insert(
        "X-New-Score",
        header_value(&tailored.improvement_report.new_score_display())?,
    );
    headers.insert(
        "X-Skills-Added",
        header_value(&tailored.improvement_report.skills_added.join(","))?,
    );
    Ok(headers)
}

/// Header values must be visible ASCII; anything else is dropped rather than
/// failing the whole download.
fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    let ascii: String = value
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect();
    HeaderValue::from_str(&ascii)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid header value: {e}")))
}
