//! Fit Analyzer — scores a candidate profile against a target job via the
//! LLM and parses the response into a typed analysis record.
//!
//! `AppState` holds an `Arc<dyn FitAnalyzer>` so the endpoint and handler
//! code never depend on the LLM directly; tests swap in a canned analyzer.

pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cv::profile::CvProfile;
use crate::errors::AppError;
use crate::fit::prompts::{build_fit_prompt, fit_system};
use crate::llm_client::LlmClient;

/// Fixed user-facing message for uploads the model judges not to be a CV.
pub const NOT_A_CV_MESSAGE: &str =
    "The provided document does not appear to be a CV or Resume. Please upload a valid CV or Resume.";

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Compatibility between the candidate's background and the target role.
/// Each category carries a hard score band, enforced after parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainMatch {
    CompleteMismatch,
    WeakMatch,
    #[default]
    GoodMatch,
}

impl DomainMatch {
    /// Inclusive score band this classification allows.
    pub fn score_band(&self) -> (u32, u32) {
        match self {
            DomainMatch::CompleteMismatch => (15, 29),
            DomainMatch::WeakMatch => (30, 59),
            DomainMatch::GoodMatch => (60, 100),
        }
    }
}

/// Structured fit analysis parsed from the model response.
/// Deliberately tolerant: the model omits empty arrays often enough that
/// every list field defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitAnalysis {
    #[serde(default)]
    pub is_valid_cv: Option<bool>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
    #[serde(default, alias = "overall_ats_score")]
    pub score: u32,
    #[serde(default)]
    pub domain_match: DomainMatch,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub advice: Vec<String>,
    #[serde(default)]
    pub project_recommendations: Vec<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub score_interpretation: String,
    /// Per-factor scoring detail. Kept structurally loose; only the
    /// missing-critical-keywords list is read back server-side.
    #[serde(default)]
    pub breakdown: Value,
    #[serde(default)]
    pub job_analysis: Value,
}

impl FitAnalysis {
    /// Missing critical keywords from the keyword-match factor; the optimizer
    /// prompt highlights these.
    pub fn missing_critical_keywords(&self) -> Vec<String> {
        self.breakdown
            .get("keyword_match")
            .and_then(|v| v.get("missing_critical_keywords"))
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Forces the score into the band its domain classification allows.
    /// The prompt states the bands, but the model is not trusted to respect them.
    pub fn clamp_score_to_band(&mut self) {
        let (lo, hi) = self.domain_match.score_band();
        self.score = self.score.clamp(lo, hi);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The fit analyzer seam.
#[async_trait]
pub trait FitAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        profile: &CvProfile,
        job_title: &str,
        job_description: &str,
    ) -> Result<FitAnalysis, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LLM-backed implementation
// ────────────────────────────────────────────────────────────────────────────

/// Production analyzer: one synchronous chat completion per request, no
/// retries and no caching across repeated analyses of the same pair.
pub struct LlmFitAnalyzer {
    llm: LlmClient,
}

impl LlmFitAnalyzer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl FitAnalyzer for LlmFitAnalyzer {
    async fn analyze(
        &self,
        profile: &CvProfile,
        job_title: &str,
        job_description: &str,
    ) -> Result<FitAnalysis, AppError> {
        let prompt = build_fit_prompt(profile, job_title, job_description);

        let mut analysis: FitAnalysis = self
            .llm
            .call_json(&fit_system(), &prompt)
            .await
            .map_err(|e| AppError::Llm(e.to_string()))?;

        if analysis.is_valid_cv == Some(false) {
            return Err(AppError::UnprocessableEntity(NOT_A_CV_MESSAGE.to_string()));
        }

        analysis.clamp_score_to_band();
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_match_serde_snake_case() {
        let m: DomainMatch = serde_json::from_str(r#""complete_mismatch""#).unwrap();
        assert_eq!(m, DomainMatch::CompleteMismatch);
        let m: DomainMatch = serde_json::from_str(r#""weak_match""#).unwrap();
        assert_eq!(m, DomainMatch::WeakMatch);
        let m: DomainMatch = serde_json::from_str(r#""good_match""#).unwrap();
        assert_eq!(m, DomainMatch::GoodMatch);
    }

    #[test]
    fn test_domain_match_default_is_good() {
        assert_eq!(DomainMatch::default(), DomainMatch::GoodMatch);
    }

    #[test]
    fn test_clamp_lifts_low_good_match_score() {
        let mut analysis = sample_analysis(DomainMatch::GoodMatch, 40);
        analysis.clamp_score_to_band();
        assert_eq!(analysis.score, 60);
    }

    #[test]
    fn test_clamp_caps_high_mismatch_score() {
        let mut analysis = sample_analysis(DomainMatch::CompleteMismatch, 85);
        analysis.clamp_score_to_band();
        assert_eq!(analysis.score, 29);
    }

    #[test]
    fn test_clamp_leaves_in_band_score_alone() {
        let mut analysis = sample_analysis(DomainMatch::WeakMatch, 45);
        analysis.clamp_score_to_band();
        assert_eq!(analysis.score, 45);
    }

    #[test]
    fn test_full_model_response_deserializes() {
        let json = r#"{
            "is_valid_cv": true,
            "rejection_reason": null,
            "job_analysis": {
                "job_title": "Data Engineer",
                "extracted_keywords": {"must_have": ["SQL", "Python"]}
            },
            "domain_match": "good_match",
            "overall_ats_score": 78,
            "score_interpretation": "Solid match with minor gaps",
            "breakdown": {
                "keyword_match": {
                    "score": 80,
                    "weight": 35,
                    "missing_critical_keywords": ["Airflow"]
                }
            },
            "matching_skills": ["SQL", "Python"],
            "missing_skills": ["Airflow"],
            "advice": ["Add metrics to your SQL work"],
            "project_recommendations": ["Build a pipeline using Airflow"],
            "summary": "Good match overall."
        }"#;

        let analysis: FitAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.score, 78);
        assert_eq!(analysis.domain_match, DomainMatch::GoodMatch);
        assert_eq!(analysis.matching_skills, vec!["SQL", "Python"]);
        assert_eq!(analysis.missing_skills, vec!["Airflow"]);
        assert_eq!(analysis.missing_critical_keywords(), vec!["Airflow"]);
    }

    #[test]
    fn test_sparse_model_response_deserializes_with_defaults() {
        let json = r#"{"overall_ats_score": 22, "domain_match": "complete_mismatch"}"#;
        let analysis: FitAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.score, 22);
        assert!(analysis.matching_skills.is_empty());
        assert!(analysis.missing_critical_keywords().is_empty());
    }

    #[test]
    fn test_score_field_name_also_accepted() {
        let json = r#"{"score": 66}"#;
        let analysis: FitAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.score, 66);
    }

    fn sample_analysis(domain_match: DomainMatch, score: u32) -> FitAnalysis {
        FitAnalysis {
            is_valid_cv: Some(true),
            rejection_reason: None,
            score,
            domain_match,
            matching_skills: vec![],
            missing_skills: vec![],
            advice: vec![],
            project_recommendations: vec![],
            summary: String::new(),
            score_interpretation: String::new(),
            breakdown: Value::Null,
            job_analysis: Value::Null,
        }
    }
}
