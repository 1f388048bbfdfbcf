//! Axum route handlers for CV upload and retrieval.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::cv::extract::{extract_text, ExtractError};
use crate::cv::profile::{ContactInfo, CvProfile};
use crate::errors::AppError;
use crate::state::AppState;

/// Upload size cap. Checked here as well as by the body limit layer so the
/// user gets a descriptive message instead of a bare 413.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const CV_GONE_MESSAGE: &str = "CV not found or expired. Please upload again.";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub cv_id: String,
    pub filename: String,
    pub format: String,
    pub text_length: usize,
    pub skills: Vec<String>,
    pub skills_count: usize,
    pub contact: ContactInfo,
    pub education: Vec<String>,
    pub name: Option<String>,
    pub experience_years: Option<f64>,
    pub detected_industry: String,
    pub preview: String,
}

#[derive(Debug, Serialize)]
pub struct CvDetailResponse {
    pub success: bool,
    pub cv_id: String,
    pub name: Option<String>,
    pub skills: Vec<String>,
    pub skills_count: usize,
    pub contact: ContactInfo,
    pub education: Vec<String>,
    pub experience_years: Option<f64>,
    pub detected_industry: String,
    pub text_length: usize,
    pub filename: String,
    pub format: String,
}

/// POST /api/cv/upload
///
/// Accepts a multipart upload, extracts text, and returns the parsed profile
/// along with the session id used by the analyze/generate endpoints.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let filename = field.file_name().map(str::to_string);
        if file.is_none() {
            if let Some(filename) = filename {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                file = Some((filename, data));
            }
        }
    }

    let (filename, content) =
        file.ok_or_else(|| AppError::Validation("No file found in upload".to_string()))?;

    if content.is_empty() {
        return Err(AppError::Validation(
            "Empty file received. Please upload a valid file.".to_string(),
        ));
    }
    if content.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "File too large. Maximum size is 10MB.".to_string(),
        ));
    }

    let (format, text) = extract_text(&content, &filename).map_err(extract_error_to_app)?;
    let profile = CvProfile::from_text(&filename, format.as_str(), text);
    let preview = profile.preview();

    let cv_id = state.cv_store.insert(profile.clone()).await;
    info!(
        "CV uploaded: {cv_id} ({} skills detected)",
        profile.skills.len()
    );

    Ok(Json(UploadResponse {
        success: true,
        cv_id,
        filename: profile.filename,
        format: profile.format,
        text_length: profile.text_length,
        skills_count: profile.skills.len(),
        skills: profile.skills,
        contact: profile.contact,
        education: profile.education,
        name: profile.name,
        experience_years: profile.experience_years,
        detected_industry: profile.detected_industry,
        preview,
    }))
}

/// GET /api/cv/:id
pub async fn handle_get_cv(
    State(state): State<AppState>,
    Path(cv_id): Path<String>,
) -> Result<Json<CvDetailResponse>, AppError> {
    let profile = state
        .cv_store
        .get(&cv_id)
        .await
        .ok_or_else(|| AppError::NotFound(CV_GONE_MESSAGE.to_string()))?;

    Ok(Json(CvDetailResponse {
        success: true,
        cv_id,
        name: profile.name,
        skills_count: profile.skills.len(),
        skills: profile.skills,
        contact: profile.contact,
        education: profile.education,
        experience_years: profile.experience_years,
        detected_industry: profile.detected_industry,
        text_length: profile.text_length,
        filename: profile.filename,
        format: profile.format,
    }))
}

fn extract_error_to_app(e: ExtractError) -> AppError {
    match e {
        ExtractError::UnsupportedFormat(_) => AppError::Validation(e.to_string()),
        ExtractError::Parse { .. } | ExtractError::EmptyText => {
            AppError::UnprocessableEntity(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_maps_to_validation() {
        let err = extract_error_to_app(ExtractError::UnsupportedFormat("cv.png".to_string()));
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_parse_failure_maps_to_unprocessable() {
        let err = extract_error_to_app(ExtractError::EmptyText);
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
