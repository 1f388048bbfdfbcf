//! CV Optimizer — rewrites CV content against a target job without
//! fabricating experience, and generates cover letters.
//!
//! The model is told not to invent material; `enforce_vocabulary` is the
//! backstop that makes the constraint hold even when it does.

pub mod cover_letter;
pub mod handlers;
pub mod prompts;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::cv::profile::CvProfile;
use crate::errors::AppError;
use crate::fit::FitAnalysis;
use crate::llm_client::LlmClient;
use crate::optimizer::prompts::{build_tailor_prompt, tailor_system};

// ────────────────────────────────────────────────────────────────────────────
// Tailored CV document model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CvHeader {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub dates: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub dates: Option<String>,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub technologies: Option<String>,
    pub dates: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: Option<String>,
    pub year: Option<String>,
}

/// The model reports scores inconsistently as numbers or strings, so both
/// score fields stay as raw values with display helpers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementReport {
    pub original_score: Option<Value>,
    pub new_score: Option<Value>,
    pub skills_added: Vec<String>,
    pub remaining_gaps: Vec<String>,
}

impl ImprovementReport {
    /// Header-safe rendering of the estimated new score.
    pub fn new_score_display(&self) -> String {
        match &self.new_score {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }
}

/// Structured tailored CV returned by the optimization prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TailoredCv {
    pub header: CvHeader,
    pub summary: Option<String>,
    pub education: Vec<EducationEntry>,
    /// Category name -> skills. Ordered map so rendering is deterministic.
    pub skills: BTreeMap<String, Vec<String>>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub improvement_report: ImprovementReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the optimization prompt and enforces the no-fabrication rule on the
/// result.
pub async fn generate_tailored_cv(
    llm: &LlmClient,
    profile: &CvProfile,
    job_title: &str,
    company_name: &str,
    job_description: &str,
    ats_analysis: Option<&FitAnalysis>,
) -> Result<TailoredCv, AppError> {
    let prompt = build_tailor_prompt(profile, job_title, company_name, job_description, ats_analysis);

    let mut tailored: TailoredCv = llm
        .call_json(&tailor_system(), &prompt)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    enforce_vocabulary(&mut tailored, &profile.text, job_description);
    Ok(tailored)
}

/// Drops any skill that appears in neither the original CV text nor the job
/// description. Rewording existing content is allowed; new material is not,
/// and the improvement report must stay consistent with what survived.
pub fn enforce_vocabulary(tailored: &mut TailoredCv, cv_text: &str, job_description: &str) {
    let cv_lower = cv_text.to_lowercase();
    let jd_lower = job_description.to_lowercase();
    let in_vocabulary =
        |skill: &str| -> bool {
            let s = skill.trim().to_lowercase();
            !s.is_empty() && (cv_lower.contains(&s) || jd_lower.contains(&s))
        };

    for skills in tailored.skills.values_mut() {
        skills.retain(|skill| {
            let keep = in_vocabulary(skill);
            if !keep {
                warn!("Dropping out-of-vocabulary skill from tailored CV: {skill}");
            }
            keep
        });
    }
    tailored.skills.retain(|_, skills| !skills.is_empty());

    tailored
        .improvement_report
        .skills_added
        .retain(|skill| in_vocabulary(skill));
}

/// Preview text shown before the user downloads the PDF.
pub fn gap_analysis_text(tailored: &TailoredCv, ats_analysis: Option<&FitAnalysis>) -> String {
    match ats_analysis {
        Some(analysis) => {
            let new_score = tailored.improvement_report.new_score_display();
            let new_score = if new_score.is_empty() {
                "N/A".to_string()
            } else {
                new_score
            };
            format!(
                "Optimization Complete. Score improved from {}% to {}%.",
                analysis.score, new_score
            )
        }
        None => "CV Optimized Successfully. Ready for PDF download.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CV_TEXT: &str = "Jane Doe\nPython developer with SQL and Docker experience.";
    const JD_TEXT: &str = "We need Python, Kubernetes, and Terraform.";

    fn tailored_with_skills(skills: &[(&str, &[&str])], added: &[&str]) -> TailoredCv {
        TailoredCv {
            skills: skills
                .iter()
                .map(|(category, list)| {
                    (
                        category.to_string(),
                        list.iter().map(|s| s.to_string()).collect(),
                    )
                })
                .collect(),
            improvement_report: ImprovementReport {
                skills_added: added.iter().map(|s| s.to_string()).collect(),
                ..ImprovementReport::default()
            },
            ..TailoredCv::default()
        }
    }

    #[test]
    fn test_enforce_vocabulary_keeps_cv_and_jd_skills() {
        let mut tailored = tailored_with_skills(
            &[("languages", &["Python", "SQL"]), ("cloud", &["Kubernetes"])],
            &["Kubernetes"],
        );
        enforce_vocabulary(&mut tailored, CV_TEXT, JD_TEXT);

        assert_eq!(tailored.skills["languages"], vec!["Python", "SQL"]);
        assert_eq!(tailored.skills["cloud"], vec!["Kubernetes"]);
        assert_eq!(tailored.improvement_report.skills_added, vec!["Kubernetes"]);
    }

    #[test]
    fn test_enforce_vocabulary_drops_invented_skills() {
        let mut tailored = tailored_with_skills(
            &[("languages", &["Python", "Haskell"])],
            &["Haskell", "Terraform"],
        );
        enforce_vocabulary(&mut tailored, CV_TEXT, JD_TEXT);

        // Haskell appears nowhere; Terraform is in the JD so it may stay.
        assert_eq!(tailored.skills["languages"], vec!["Python"]);
        assert_eq!(tailored.improvement_report.skills_added, vec!["Terraform"]);
    }

    #[test]
    fn test_enforce_vocabulary_removes_emptied_categories() {
        let mut tailored = tailored_with_skills(&[("esoteric", &["Haskell", "COBOL"])], &[]);
        enforce_vocabulary(&mut tailored, CV_TEXT, JD_TEXT);
        assert!(tailored.skills.is_empty());
    }

    #[test]
    fn test_enforce_vocabulary_is_case_insensitive() {
        let mut tailored = tailored_with_skills(&[("tools", &["DOCKER"])], &[]);
        enforce_vocabulary(&mut tailored, CV_TEXT, JD_TEXT);
        assert_eq!(tailored.skills["tools"], vec!["DOCKER"]);
    }

    #[test]
    fn test_gap_analysis_with_analysis_reports_scores() {
        let mut tailored = tailored_with_skills(&[], &[]);
        tailored.improvement_report.new_score = Some(json!(91));
        let analysis: FitAnalysis =
            serde_json::from_str(r#"{"overall_ats_score": 72}"#).unwrap();

        let text = gap_analysis_text(&tailored, Some(&analysis));
        assert_eq!(text, "Optimization Complete. Score improved from 72% to 91%.");
    }

    #[test]
    fn test_gap_analysis_without_analysis_is_generic() {
        let tailored = tailored_with_skills(&[], &[]);
        let text = gap_analysis_text(&tailored, None);
        assert_eq!(text, "CV Optimized Successfully. Ready for PDF download.");
    }

    #[test]
    fn test_new_score_display_accepts_string_or_number() {
        let mut report = ImprovementReport::default();
        assert_eq!(report.new_score_display(), "");

        report.new_score = Some(json!("95"));
        assert_eq!(report.new_score_display(), "95");

        report.new_score = Some(json!(88));
        assert_eq!(report.new_score_display(), "88");
    }

    #[test]
    fn test_tailored_cv_deserializes_from_model_shape() {
        let json = r#"{
            "header": {"name": "Jane Doe", "email": "jane@example.com"},
            "summary": "Backend developer with three years of Python.",
            "education": [{"degree": "BSc Computer Science", "institution": "University of Manchester"}],
            "skills": {"languages": ["Python", "SQL"], "tools": ["Docker"]},
            "experience": [{
                "title": "Software Engineer",
                "company": "Acme Ltd",
                "dates": "Jan 2020 - Mar 2023",
                "bullets": ["Built APIs serving 2M requests/day"]
            }],
            "improvement_report": {
                "original_score": 70,
                "new_score": "92",
                "skills_added": ["Docker"],
                "remaining_gaps": ["Kubernetes production experience"]
            }
        }"#;

        let tailored: TailoredCv = serde_json::from_str(json).unwrap();
        assert_eq!(tailored.header.name, "Jane Doe");
        assert_eq!(tailored.experience.len(), 1);
        assert_eq!(tailored.skills.len(), 2);
        assert!(tailored.projects.is_empty());
        assert_eq!(tailored.improvement_report.new_score_display(), "92");
    }
}
