//! Cover letter generation — same inputs and honesty constraints as the CV
//! optimizer, letter-shaped output.

use serde::{Deserialize, Serialize};

use crate::cv::profile::CvProfile;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::optimizer::prompts::{build_cover_letter_prompt, cover_letter_system};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverLetter {
    pub candidate_name: String,
    pub recipient: String,
    pub paragraphs: Vec<String>,
    pub closing: String,
}

/// Generates a cover letter and fills any fields the model left blank with
/// sensible fallbacks so the rendered document is never half-empty.
pub async fn generate_cover_letter(
    llm: &LlmClient,
    profile: &CvProfile,
    job_title: &str,
    company_name: &str,
    job_description: &str,
) -> Result<CoverLetter, AppError> {
    let prompt = build_cover_letter_prompt(profile, job_title, company_name, job_description);

    let mut letter: CoverLetter = llm
        .call_json(&cover_letter_system(), &prompt)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    apply_fallbacks(&mut letter, profile, company_name);

    if letter.paragraphs.is_empty() {
        return Err(AppError::Llm(
            "Cover letter generation returned no content".to_string(),
        ));
    }

    Ok(letter)
}

fn apply_fallbacks(letter: &mut CoverLetter, profile: &CvProfile, company_name: &str) {
    if letter.candidate_name.trim().is_empty() {
        letter.candidate_name = profile.name.clone().unwrap_or_default();
    }
    if letter.recipient.trim().is_empty() {
        letter.recipient = format!("Hiring Team, {company_name}");
    }
    if letter.closing.trim().is_empty() {
        letter.closing = "Kind regards".to_string();
    }
    letter.paragraphs.retain(|p| !p.trim().is_empty());
}
