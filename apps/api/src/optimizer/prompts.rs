//! LLM prompts for CV optimization and cover letter generation.

use crate::cv::profile::CvProfile;
use crate::fit::FitAnalysis;
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_SYSTEM, NO_FABRICATION_INSTRUCTION};

const CV_TEXT_LIMIT: usize = 6000;
const JD_TEXT_LIMIT: usize = 3000;

const TAILOR_SYSTEM: &str = "You are an expert CV optimization specialist. Your task is to produce a \
highly optimized, ATS-friendly CV in structured JSON for PDF generation. You will receive ATS \
scoring results identifying missing keywords, domain match status, and recommendations; use them.

WHEN EXPERIENCE IS WEAK OR LIMITED: still optimize wording, structure, and clarity of existing \
content, and improve bullets to be outcome-focused from information already present. Do NOT \
create new roles, projects, or sections to fill space.

PERMITTED TRANSFORMATIONS: reorder projects so the most relevant appear first; merge or split \
bullets for clarity; strengthen language around real achievements; add missing keywords from the \
ATS analysis when the underlying skill or experience exists but was not named.

REQUIREMENTS:
1. Professional Summary: 2-3 sentences stating what the candidate IS, never what they WANT. \
Do not use 'seeking', 'looking for', 'aspiring to', or name the target company or role.
2. Skills: keep ALL relevant skills from the original CV. You MAY list critical missing keywords \
that are standard for the role, but do NOT invent experience bullets to support them. Group \
skills into 3-5 categories that fit the CV's industry.
3. Experience: strong action verbs, quantifiable achievements with metrics, job description \
keywords placed naturally.
4. ATS compatibility: standard section headings, concise bullets (70-180 characters).
5. Omit any section with no real data entirely. No empty arrays, nulls, or placeholders.
6. Consistency: a skill listed in improvement_report.skills_added MUST appear in a skills \
category; never report a skill as added without inserting it.
7. Scoring: if there were no missing critical keywords and the phrasing was optimized, new_score \
must be 95-100; deduct only for genuine gaps you could not close.";

const TAILOR_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

INPUTS PROVIDED:

1. ATS Scoring Results:
{ats_analysis}

2. Current CV:
{cv_text}

3. Target Job:
{job_title} at {company_name}
{job_description}
{contact_section}

TASK: Using the ATS scoring results, optimize the CV to improve the score while maintaining honesty.

Pay special attention to:
- Missing critical keywords: {missing_critical}
- Domain match status: {domain_match}

OUTPUT JSON STRUCTURE (standard CV order; omit keys with no real data):
{
  "header": {
    "name": "Full Name",
    "email": "email@example.com",
    "phone": "+XX-XXXXXXXXXX",
    "location": "City, Country",
    "linkedin": "LinkedIn URL (only if in original CV)",
    "github": "GitHub URL (only if in original CV)"
  },
  "summary": "2-3 sentence summary",
  "education": [
    {"degree": "Degree Title", "institution": "University Name", "location": "City, Country", "dates": "Month Year - Month Year"}
  ],
  "skills": {
    "category_name": ["Skill1", "Skill2"]
  },
  "experience": [
    {"title": "Job Title", "company": "Company Name", "location": "City, Country", "dates": "Month Year - Month Year", "bullets": ["Achievement with metrics and keywords"]}
  ],
  "projects": [
    {"name": "Project Name", "technologies": "Tech1, Tech2", "dates": "Month Year", "description": "Description with impact"}
  ],
  "certifications": [
    {"name": "Certification Name", "issuer": "Issuer Organization", "year": "Year"}
  ],
  "improvement_report": {
    "original_score": "value from the ATS input",
    "new_score": "estimated new score (0-100) after adding missing keywords",
    "skills_added": ["skills you actually inserted into the CV"],
    "remaining_gaps": ["skills or experience you could NOT add"]
  }
}"#;

pub fn build_tailor_prompt(
    profile: &CvProfile,
    job_title: &str,
    company_name: &str,
    job_description: &str,
    ats_analysis: Option<&FitAnalysis>,
) -> String {
    let ats_json = ats_analysis
        .and_then(|a| serde_json::to_string_pretty(a).ok())
        .unwrap_or_else(|| "No prior ATS analysis available.".to_string());

    let missing_critical = ats_analysis
        .map(|a| a.missing_critical_keywords().join(", "))
        .unwrap_or_default();

    let domain_match = ats_analysis
        .and_then(|a| serde_json::to_value(a.domain_match).ok())
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_else(|| "good_match".to_string());

    TAILOR_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{ats_analysis}", &ats_json)
        .replace("{cv_text}", truncate_chars(&profile.text, CV_TEXT_LIMIT))
        .replace("{job_title}", job_title)
        .replace("{company_name}", company_name)
        .replace(
            "{job_description}",
            truncate_chars(job_description, JD_TEXT_LIMIT),
        )
        .replace("{contact_section}", &contact_section(profile))
        .replace("{missing_critical}", &missing_critical)
        .replace("{domain_match}", &domain_match)
}

/// Extracted contact details are injected verbatim so the model never
/// substitutes placeholders for real data.
fn contact_section(profile: &CvProfile) -> String {
    let mut lines = Vec::new();
    if let Some(name) = &profile.name {
        lines.push(format!("   - Name: {name}"));
    }
    if let Some(email) = &profile.contact.email {
        lines.push(format!("   - Email: {email}"));
    }
    if let Some(phone) = &profile.contact.phone {
        lines.push(format!("   - Phone: {phone}"));
    }
    if let Some(linkedin) = &profile.contact.linkedin {
        lines.push(format!("   - LinkedIn: {linkedin}"));
    }

    if lines.is_empty() {
        return String::new();
    }

    format!(
        "\n4. EXTRACTED CONTACT INFORMATION (USE EXACTLY AS PROVIDED):\n{}\n   IMPORTANT: Use the contact details above EXACTLY. Do NOT use placeholders.\n",
        lines.join("\n")
    )
}

pub fn tailor_system() -> String {
    format!("{TAILOR_SYSTEM}\n\n{JSON_ONLY_SYSTEM}")
}

pub const COVER_LETTER_SYSTEM: &str = "You are an expert career writer producing concise, specific \
cover letters. The letter must be grounded entirely in the candidate's real CV content: reference \
actual experience and skills, connect them to the job's requirements, and never invent employers, \
titles, dates, or achievements. Three to four short paragraphs; professional but warm tone; no \
cliches like 'I am writing to express my interest'.";

const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"{no_fabrication}

CANDIDATE CV:
{cv_text}

TARGET JOB:
{job_title} at {company_name}
{job_description}

TASK: Write a cover letter for this application.

OUTPUT JSON STRUCTURE:
{
  "candidate_name": "Full Name from the CV",
  "recipient": "Hiring Team, Company Name",
  "paragraphs": [
    "Opening paragraph naming the role and the candidate's strongest relevant qualification",
    "Evidence paragraph connecting real CV experience to the job's requirements",
    "Closing paragraph with availability and a forward-looking note"
  ],
  "closing": "Kind regards"
}"#;

pub fn build_cover_letter_prompt(
    profile: &CvProfile,
    job_title: &str,
    company_name: &str,
    job_description: &str,
) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{cv_text}", truncate_chars(&profile.text, CV_TEXT_LIMIT))
        .replace("{job_title}", job_title)
        .replace("{company_name}", company_name)
        .replace(
            "{job_description}",
            truncate_chars(job_description, JD_TEXT_LIMIT),
        )
}

pub fn cover_letter_system() -> String {
    format!("{COVER_LETTER_SYSTEM}\n\n{JSON_ONLY_SYSTEM}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CvProfile {
        CvProfile::from_text(
            "cv.txt",
            "txt",
            "Jane Doe\nEngineer\njane@example.com\nPython and SQL work since 2019 - 2023".to_string(),
        )
    }

    #[test]
    fn test_tailor_prompt_includes_contact_block_when_present() {
        let prompt = build_tailor_prompt(&profile(), "Engineer", "Acme", "Python role", None);
        assert!(prompt.contains("EXTRACTED CONTACT INFORMATION"));
        assert!(prompt.contains("jane@example.com"));
        assert!(prompt.contains("Engineer at Acme"));
    }

    #[test]
    fn test_tailor_prompt_without_analysis_says_so() {
        let prompt = build_tailor_prompt(&profile(), "Engineer", "Acme", "JD", None);
        assert!(prompt.contains("No prior ATS analysis available."));
        assert!(prompt.contains("Domain match status: good_match"));
    }

    #[test]
    fn test_tailor_prompt_injects_analysis_fields() {
        let analysis: FitAnalysis = serde_json::from_str(
            r#"{
                "overall_ats_score": 55,
                "domain_match": "weak_match",
                "breakdown": {"keyword_match": {"missing_critical_keywords": ["Kubernetes"]}}
            }"#,
        )
        .unwrap();

        let prompt = build_tailor_prompt(&profile(), "Engineer", "Acme", "JD", Some(&analysis));
        assert!(prompt.contains("Missing critical keywords: Kubernetes"));
        assert!(prompt.contains("Domain match status: weak_match"));
    }

    #[test]
    fn test_prompts_carry_no_fabrication_instruction() {
        let tailor = build_tailor_prompt(&profile(), "Engineer", "Acme", "JD", None);
        let letter = build_cover_letter_prompt(&profile(), "Engineer", "Acme", "JD");
        assert!(tailor.contains("must NOT invent or fabricate"));
        assert!(letter.contains("must NOT invent or fabricate"));
    }

    #[test]
    fn test_contact_section_empty_without_details() {
        let bare = CvProfile::from_text("cv.txt", "txt", "no details at all".to_string());
        assert!(contact_section(&bare).is_empty());
    }
}
