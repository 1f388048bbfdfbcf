//! LLM prompts for the fit analysis step.

use crate::cv::profile::CvProfile;
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_SYSTEM};

/// Prompt sizes are bounded so an oversized CV or JD cannot blow the context.
const CV_TEXT_LIMIT: usize = 3000;
const JD_TEXT_LIMIT: usize = 4000;

pub const FIT_SYSTEM: &str = "You are an expert ATS (Applicant Tracking System) scoring engine and technical recruiter. \
Your task is to calculate a match score between a CV and a job description while checking domain/background compatibility.

STEP 0 — CONTENT VALIDATION (do this first):
Confirm the candidate input is actually a professional CV/Resume: it should contain professional \
experience or history, educational background, skills or qualifications, and contact information \
(or placeholders). REJECT documents that are recipes, lyrics, creative writing, source code or \
logs, generic articles, or incoherent text. If rejected, set \"is_valid_cv\": false, give a polite \
\"rejection_reason\", and stop. Otherwise set \"is_valid_cv\": true and continue.

STEP 1 — EXTRACT JOB REQUIREMENTS:
From the job description extract the exact role title, 15-25 required hard-skill keywords (tools, \
languages, certifications, platforms), required qualifications (years of experience, education, \
industry background), and soft skills/methodologies. Count keyword frequency: keywords mentioned \
3+ times are CRITICAL and weighted higher. Mark keywords as must-have (required section) vs \
nice-to-have (preferred section).

STEP 2 — DOMAIN & BACKGROUND MATCH:
Classify the candidate's background against the role:
- \"complete_mismatch\": fundamentally different field (e.g. CS graduate applying to a nursing role). Final score must be 15-29.
- \"weak_match\": related field but missing the specific experience (e.g. fresh graduate applying to a senior role). Final score must be 30-59.
- \"good_match\": background aligns with the role. Final score must be 60-100.

STEP 3 — SCORE:
Weighted factors: keyword match 35%, job title alignment 20%, skills coverage 25%, experience \
level 10%, education/certifications 5%, formatting/readability 5%. A skill is PRESENT if it \
appears ANYWHERE in the CV; variants count as matches (PostgreSQL = SQL, React.js = React, \
ML = Machine Learning, and equivalent synonyms in every industry). missing_skills must ONLY \
contain skills that appear nowhere in the CV. The final score must respect the domain band.

STEP 4 — RECOMMENDATIONS:
For complete_mismatch, state the field mismatch plainly and recommend roles matching the actual \
background, with no project recommendations. For weak_match, give 3-5 specific buildable projects \
ONLY for skills in missing_skills. For good_match, focus on keyword optimization, stronger \
phrasing, and quantifiable achievements for skills already present. \
matching_skills is the INTERSECTION of job requirements and CV content.";

/// User prompt template for fit analysis. The placeholders are filled by
/// `build_fit_prompt`.
const FIT_PROMPT_TEMPLATE: &str = r#"Analyze this candidate for the role of {job_title}.

INPUTS PROVIDED:
1. Candidate CV Content:
Skills: {cv_skills}
Experience Snippet: {cv_text}

2. Job Description:
{job_description}

OUTPUT FORMAT (JSON, exactly this shape):
{
  "is_valid_cv": true,
  "rejection_reason": null,
  "job_analysis": {
    "job_title": "extracted role title",
    "required_experience": "e.g. 5+ years",
    "required_education": "e.g. Bachelor's in Computer Science",
    "extracted_keywords": {
      "must_have": ["keyword"],
      "nice_to_have": ["keyword"],
      "critical_keywords": ["keyword"]
    },
    "soft_skills": ["Agile", "Communication"]
  },
  "domain_match": "complete_mismatch | weak_match | good_match",
  "overall_ats_score": 0,
  "score_interpretation": "brief explanation based on score and domain match",
  "breakdown": {
    "keyword_match": {"score": 0, "weight": 35, "matched_keywords": [], "missing_critical_keywords": []},
    "job_title_alignment": {"score": 0, "weight": 20, "details": ""},
    "skills_coverage": {"score": 0, "weight": 25, "must_have_present": 0, "must_have_total": 0},
    "experience_level": {"score": 0, "weight": 10, "cv_experience": "", "required_experience": ""},
    "education_certification": {"score": 0, "weight": 5, "details": ""},
    "formatting_readability": {"score": 0, "weight": 5}
  },
  "matching_skills": ["skills required by the job AND present in the CV"],
  "missing_skills": ["skills required by the job NOT found anywhere in the CV"],
  "advice": ["tip1", "tip2", "tip3"],
  "project_recommendations": ["only projects for skills in missing_skills"],
  "summary": "1-2 sentence summary including domain match status"
}"#;

pub fn build_fit_prompt(profile: &CvProfile, job_title: &str, job_description: &str) -> String {
    FIT_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{cv_skills}", &profile.skills.join(", "))
        .replace("{cv_text}", truncate_chars(&profile.text, CV_TEXT_LIMIT))
        .replace(
            "{job_description}",
            truncate_chars(job_description, JD_TEXT_LIMIT),
        )
}

/// FIT_SYSTEM already demands a strict shape; the shared JSON-only fragment
/// keeps the instruction identical across modules.
pub fn fit_system() -> String {
    format!("{FIT_SYSTEM}\n\n{JSON_ONLY_SYSTEM}")
}
