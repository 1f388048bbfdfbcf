//! Structured candidate profile built from extracted CV text.
//!
//! All extraction here is heuristic and best-effort: skills come from a
//! cross-industry vocabulary, contact details from regexes, the rest from
//! line-level pattern matching. The LLM sees the raw text anyway; the
//! profile exists so the UI can show something immediately after upload.

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Skills vocabulary covering the industries the product targets.
/// Single-word entries match on word boundaries; multi-word entries match as
/// substrings.
const UNIVERSAL_SKILLS: &[&str] = &[
    // Programming
    "python", "javascript", "typescript", "java", "c++", "c#", "go", "rust",
    "ruby", "php", "swift", "kotlin", "scala", "r", "matlab", "sql",
    // AI/ML
    "machine learning", "deep learning", "neural networks", "nlp",
    "computer vision", "tensorflow", "pytorch", "keras", "scikit-learn",
    "transformers", "llm", "rag", "langchain",
    // Web
    "react", "vue", "angular", "node.js", "express", "fastapi", "django",
    "flask", "spring", "html", "css", "tailwind", "bootstrap",
    // Cloud & DevOps
    "aws", "azure", "gcp", "docker", "kubernetes", "terraform",
    "jenkins", "ci/cd", "git", "github", "gitlab",
    // Databases
    "postgresql", "mysql", "mongodb", "redis", "elasticsearch",
    "dynamodb", "firebase", "sqlite", "oracle",
    // Healthcare
    "patient care", "clinical documentation", "hipaa", "emr", "ehr",
    "medical terminology", "vital signs", "cpr", "bls", "acls",
    "patient assessment", "medication administration", "iv therapy",
    "wound care", "electronic health records", "medical coding",
    "icd-10", "healthcare compliance",
    // Marketing
    "seo", "google analytics", "content strategy", "social media marketing",
    "email marketing", "ppc", "google ads", "facebook ads", "hubspot",
    "marketing automation", "conversion optimization", "a/b testing",
    "content creation", "copywriting", "brand management", "crm",
    "salesforce", "market research",
    // Finance / accounting
    "financial modeling", "gaap", "ifrs", "financial analysis",
    "budgeting", "forecasting", "excel", "quickbooks", "sap",
    "accounts payable", "accounts receivable", "audit", "tax preparation",
    "risk assessment", "bloomberg terminal", "financial reporting",
    "variance analysis", "cost accounting", "cpa", "cfa",
    // Sales
    "lead generation", "cold calling", "relationship building",
    "negotiation", "sales pipeline", "quota achievement", "crm software",
    "b2b sales", "b2c sales", "account management", "upselling",
    "customer retention", "sales presentations",
    // HR
    "recruitment", "talent acquisition", "onboarding", "employee relations",
    "performance management", "hris", "workday", "adp", "payroll",
    "benefits administration", "training and development", "hr compliance",
    "labor law", "employee engagement", "compensation analysis",
    // Project management
    "agile", "scrum", "kanban", "waterfall", "project planning",
    "risk management", "stakeholder management", "budget management",
    "resource allocation", "jira", "confluence", "ms project",
    "pmp", "prince2", "gantt charts",
    // Design
    "adobe photoshop", "adobe illustrator", "figma", "sketch",
    "ui design", "ux design", "wireframing", "prototyping",
    "user research", "visual design", "graphic design", "branding",
    "typography", "color theory", "adobe xd",
    // Education
    "curriculum development", "lesson planning", "classroom management",
    "student assessment", "differentiated instruction", "educational technology",
    "learning management systems", "google classroom", "canvas",
    "special education", "tesol", "esl", "teaching certification",
    // Legal
    "contract law", "litigation", "legal research", "legal writing",
    "case management", "westlaw", "lexisnexis", "compliance",
    "corporate law", "intellectual property", "employment law",
    "regulatory compliance", "due diligence",
    // Manufacturing / engineering
    "autocad", "solidworks", "cad", "lean manufacturing", "six sigma",
    "quality control", "iso 9001", "osha", "process improvement",
    "supply chain", "inventory management", "plc programming",
    "cnc", "welding", "blueprint reading",
    // Soft skills
    "leadership", "communication", "problem solving", "teamwork",
    "time management", "critical thinking", "adaptability",
    "conflict resolution", "presentation skills", "analytical skills",
    "attention to detail", "customer service", "multitasking",
    "decision making", "collaboration", "interpersonal skills",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "bachelor", "master", "phd", "doctorate", "degree", "university",
    "college", "bsc", "msc", "ba", "ma", "mba", "engineering",
    "diploma", "certification", "associate", "graduate",
    "a level", "a-level", "gcse", "school", "sixth form", "academy",
];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\(?\d{2,4}\)?[\s.-]?)?\d{3,4}[\s.-]?\d{3,4}[\s.-]?\d{0,4}")
        .unwrap()
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"linkedin\.com/in/[\w-]+").unwrap());

static DATE_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*[-–—]\s*(?:(\d{4})|present|current)").unwrap());

/// Contact details pulled out of the CV text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
}

/// Structured candidate profile produced from an uploaded CV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvProfile {
    pub filename: String,
    pub format: String,
    pub text: String,
    pub text_length: usize,
    pub name: Option<String>,
    pub skills: Vec<String>,
    pub contact: ContactInfo,
    pub education: Vec<String>,
    pub experience_years: Option<f64>,
    pub detected_industry: String,
}

impl CvProfile {
    pub fn from_text(filename: &str, format: &str, text: String) -> Self {
        let skills = extract_skills(&text);
        let contact = extract_contact(&text);
        let education = extract_education(&text);
        let name = extract_name(&text);
        let experience_years = extract_experience_years(&text, Utc::now().year());
        let detected_industry = detect_industry(&text);

        Self {
            filename: filename.to_string(),
            format: format.to_string(),
            text_length: text.len(),
            text,
            name,
            skills,
            contact,
            education,
            experience_years,
            detected_industry,
        }
    }

    /// First 500 characters, for the upload response.
    pub fn preview(&self) -> String {
        let mut end = 500;
        if self.text.len() <= end {
            return self.text.clone();
        }
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &self.text[..end])
    }
}

/// Matches the vocabulary against the CV text and returns display-cased,
/// sorted, deduplicated skills.
pub fn extract_skills(text: &str) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for skill in UNIVERSAL_SKILLS {
        let matched = if skill.contains(' ') {
            text_lower.contains(skill)
        } else {
            word_boundary_match(&text_lower, skill)
        };
        if matched {
            found.push(title_case(skill));
        }
    }

    found.sort();
    found.dedup();
    found
}

/// Whole-word containment check. "r" must not match inside "rust".
fn word_boundary_match(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = begin == 0 || !is_word_char(haystack[..begin].chars().last());
        let after_ok = end == haystack.len() || !is_word_char(haystack[end..].chars().next());
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}

fn is_word_char(c: Option<char>) -> bool {
    c.map(|c| c.is_alphanumeric() || c == '_').unwrap_or(false)
}

/// "machine learning" -> "Machine Learning", "node.js" -> "Node.Js".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

pub fn extract_contact(text: &str) -> ContactInfo {
    let text_lower = text.to_lowercase();
    ContactInfo {
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RE
            .find(text)
            .map(|m| m.as_str().trim().to_string())
            .filter(|p| !p.is_empty()),
        linkedin: LINKEDIN_RE.find(&text_lower).map(|m| m.as_str().to_string()),
    }
}

/// Lines mentioning an education keyword, capped at five.
pub fn extract_education(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            if line.len() <= 10 {
                return false;
            }
            let lower = line.to_lowercase();
            EDUCATION_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .take(5)
        .map(String::from)
        .collect()
}

/// The candidate name usually sits in the first three non-empty lines:
/// a short, mostly-alphabetic line of 2–4 words without contact details.
pub fn extract_name(text: &str) -> Option<String> {
    static NUMBER_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}[-.\s]?\d{3}").unwrap());

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()).take(3) {
        if line.contains('@') || NUMBER_RUN_RE.is_match(line) {
            continue;
        }
        let words = line.split_whitespace().count();
        if !(2..=4).contains(&words) || line.len() >= 50 {
            continue;
        }
        let chars = line.chars().count();
        let alpha = line
            .chars()
            .filter(|c| c.is_alphabetic() || c.is_whitespace())
            .count();
        if chars > 0 && alpha as f64 / chars as f64 > 0.8 {
            return Some(line.to_string());
        }
    }
    None
}

/// Sums years across date ranges like "2020 - 2023" or "2019 – present".
/// Individual ranges outside 0–50 years are treated as noise and skipped.
pub fn extract_experience_years(text: &str, current_year: i32) -> Option<f64> {
    let text_lower = text.to_lowercase();
    let mut total = 0;

    for caps in DATE_RANGE_RE.captures_iter(&text_lower) {
        let Ok(start) = caps[1].parse::<i32>() else {
            continue;
        };
        let end = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or(current_year);
        let years = end - start;
        if (0..=50).contains(&years) {
            total += years;
        }
    }

    (total > 0).then_some(total as f64)
}

/// Coarse industry classification from keyword counts. Requires at least two
/// hits before committing to anything more specific than "General".
pub fn detect_industry(text: &str) -> String {
    const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
        ("Software Engineering", &["python", "javascript", "react", "api", "git", "docker", "programming"]),
        ("Data Science/AI", &["machine learning", "tensorflow", "data analysis", "statistics", "data science"]),
        ("Healthcare", &["patient care", "clinical", "medical", "hipaa", "emr", "nursing", "healthcare"]),
        ("Marketing", &["seo", "marketing", "content", "social media", "google analytics", "campaign"]),
        ("Finance", &["financial", "accounting", "gaap", "audit", "excel", "budgeting", "finance"]),
        ("Design", &["photoshop", "figma", "ui", "ux", "design", "visual", "graphic"]),
        ("HR", &["recruitment", "hr", "hiring", "onboarding", "employee", "human resources"]),
        ("Sales", &["sales", "crm", "lead generation", "b2b", "negotiation", "revenue"]),
        ("Education", &["teaching", "curriculum", "classroom", "student", "education", "instructor"]),
    ];

    let text_lower = text.to_lowercase();
    let mut best = ("General", 0);

    for (industry, keywords) in INDUSTRY_KEYWORDS {
        let score = keywords.iter().filter(|k| text_lower.contains(**k)).count();
        if score > best.1 {
            best = (industry, score);
        }
    }

    if best.1 >= 2 {
        best.0.to_string()
    } else {
        "General".to_string()
    }
}
