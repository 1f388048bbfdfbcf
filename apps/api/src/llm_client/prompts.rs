// Shared prompt fragments and prompt-building utilities.
// Each module that talks to the model keeps its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Honesty constraint appended to every prompt that rewrites candidate material.
pub const NO_FABRICATION_INSTRUCTION: &str = "\
IMPORTANT CONSTRAINTS ABOUT EXPERIENCE AND PROJECTS:
- You must NOT invent or fabricate work experience, job titles, companies, dates, locations, or projects.
- You must NOT add internships, freelance roles, or side projects not present in the original CV.
- You must NOT fabricate certifications, degrees, or institutions.
- Rewording, reordering, and clearer phrasing of real content is the only permitted transformation.";

/// Truncates on a character count so prompt sizes stay bounded regardless of
/// how large the uploaded document was.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_chars_cuts_at_limit() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        let text = "héllo wörld";
        let truncated = truncate_chars(text, 7);
        assert_eq!(truncated, "héllo w");
    }
}
