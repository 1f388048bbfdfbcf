//! Normalization of Reed wire records into the uniform job shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A job as the Reed search and details endpoints return it.
/// Every field is optional; upstream payloads are not trusted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReedJob {
    pub job_id: Option<i64>,
    pub job_title: Option<String>,
    pub employer_name: Option<String>,
    pub location_name: Option<String>,
    pub job_description: Option<String>,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
    pub contract_type: Option<String>,
    pub job_type: Option<String>,
    pub job_url: Option<String>,
    pub date: Option<String>,
    pub expiration_date: Option<String>,
    pub full_time: Option<bool>,
    pub part_time: Option<bool>,
    pub applications: Option<u32>,
    pub employer_profile_url: Option<String>,
}

/// Normalized job record returned to the frontend regardless of source.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_display: String,
    pub contract_type: String,
    pub contract_time: String,
    pub category: String,
    pub redirect_url: String,
    pub created: String,
    pub date_display: String,
    pub expiration_date: String,
    pub posted_by: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applications: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_profile_url: Option<String>,
}

pub fn normalize_job(job: &ReedJob, full_details: bool) -> Job {
    let salary_min = job.minimum_salary;
    let salary_max = job.maximum_salary;
    let raw_date = job.date.clone().unwrap_or_default();
    let employer = job.employer_name.clone();

    Job {
        id: job.job_id.map(|id| id.to_string()).unwrap_or_default(),
        title: job
            .job_title
            .clone()
            .unwrap_or_else(|| "Unknown Title".to_string()),
        company: employer
            .clone()
            .unwrap_or_else(|| "Unknown Company".to_string()),
        location: job
            .location_name
            .clone()
            .unwrap_or_else(|| "Unknown Location".to_string()),
        description: job.job_description.clone().unwrap_or_default(),
        salary_min,
        salary_max,
        salary_display: format_salary(salary_min, salary_max),
        contract_type: job.contract_type.clone().unwrap_or_default(),
        contract_time: contract_time(
            job.full_time.unwrap_or(false),
            job.part_time.unwrap_or(false),
        )
        .to_string(),
        category: job.job_type.clone().unwrap_or_default(),
        redirect_url: job.job_url.clone().unwrap_or_default(),
        created: format_posted_date(&raw_date),
        date_display: raw_date,
        expiration_date: job.expiration_date.clone().unwrap_or_default(),
        posted_by: employer.unwrap_or_default(),
        source: "Reed.co.uk".to_string(),
        applications: full_details.then(|| job.applications.unwrap_or(0)),
        employer_profile_url: full_details
            .then(|| job.employer_profile_url.clone().unwrap_or_default()),
    }
}

pub fn contract_time(full_time: bool, part_time: bool) -> &'static str {
    match (full_time, part_time) {
        (true, true) => "Full Time / Part Time",
        (true, false) => "Full Time",
        (false, true) => "Part Time",
        (false, false) => "Unknown",
    }
}

/// Strict location check. Reed's own location matching is fuzzy, so the
/// gateway re-verifies that the job's location contains the search term.
pub fn location_matches(job_location: &str, search_location: &str) -> bool {
    job_location
        .to_lowercase()
        .contains(&search_location.to_lowercase())
}

/// Converts Reed's DD/MM/YYYY posted date to ISO-8601, passing through
/// anything it cannot parse.
pub fn format_posted_date(date_str: &str) -> String {
    if date_str.is_empty() {
        return String::new();
    }
    for pattern in ["%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(parsed) = NaiveDate::parse_from_str(date_str, pattern) {
            return format!("{parsed}T00:00:00");
        }
    }
    date_str.to_string()
}

/// Human-readable salary range. The unit is guessed from the magnitude:
/// under £100 reads as hourly, under £1000 as daily, otherwise annual.
pub fn format_salary(salary_min: Option<f64>, salary_max: Option<f64>) -> String {
    match (salary_min, salary_max) {
        (None, None) => "Salary not specified".to_string(),
        (Some(min), Some(max)) => {
            let unit = salary_unit(min);
            let decimals = if unit == "per hour" { 2 } else { 0 };
            if (min - max).abs() < f64::EPSILON {
                format!("£{} {unit}", format_amount(min, decimals))
            } else {
                format!(
                    "£{} - £{} {unit}",
                    format_amount(min, decimals),
                    format_amount(max, decimals)
                )
            }
        }
        (Some(min), None) => format!("From £{} {}", format_amount(min, 0), salary_unit(min)),
        (None, Some(max)) => format!("Up to £{} {}", format_amount(max, 0), salary_unit(max)),
    }
}

fn salary_unit(reference: f64) -> &'static str {
    if reference < 100.0 {
        "per hour"
    } else if reference < 1000.0 {
        "per day"
    } else {
        "per annum"
    }
}

/// Formats with thousands separators, e.g. 45000 -> "45,000".
fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reed_job() -> ReedJob {
        ReedJob {
            job_id: Some(12345),
            job_title: Some("Machine Learning Engineer".to_string()),
            employer_name: Some("Acme Ltd".to_string()),
            location_name: Some("London".to_string()),
            job_description: Some("Build models.".to_string()),
            minimum_salary: Some(55000.0),
            maximum_salary: Some(70000.0),
            contract_type: Some("Permanent".to_string()),
            job_type: Some("IT".to_string()),
            job_url: Some("https://reed.co.uk/jobs/12345".to_string()),
            date: Some("05/01/2024".to_string()),
            full_time: Some(true),
            ..ReedJob::default()
        }
    }

    #[test]
    fn test_normalize_job_maps_core_fields() {
        let job = normalize_job(&reed_job(), false);
        assert_eq!(job.id, "12345");
        assert_eq!(job.title, "Machine Learning Engineer");
        assert_eq!(job.company, "Acme Ltd");
        assert_eq!(job.posted_by, "Acme Ltd");
        assert_eq!(job.source, "Reed.co.uk");
        assert_eq!(job.contract_time, "Full Time");
        assert!(job.applications.is_none());
    }

    #[test]
    fn test_normalize_job_full_details_includes_extras() {
        let mut reed = reed_job();
        reed.applications = Some(42);
        let job = normalize_job(&reed, true);
        assert_eq!(job.applications, Some(42));
        assert_eq!(job.employer_profile_url.as_deref(), Some(""));
    }

    #[test]
    fn test_normalize_job_missing_fields_get_placeholders() {
        let job = normalize_job(&ReedJob::default(), false);
        assert_eq!(job.id, "");
        assert_eq!(job.title, "Unknown Title");
        assert_eq!(job.company, "Unknown Company");
        assert_eq!(job.location, "Unknown Location");
        assert_eq!(job.salary_display, "Salary not specified");
        assert_eq!(job.contract_time, "Unknown");
    }

    #[test]
    fn test_contract_time_both_flags() {
        assert_eq!(contract_time(true, true), "Full Time / Part Time");
        assert_eq!(contract_time(false, true), "Part Time");
    }

    #[test]
    fn test_format_posted_date_reed_format() {
        assert_eq!(format_posted_date("05/01/2024"), "2024-01-05T00:00:00");
    }

    #[test]
    fn test_format_posted_date_iso_input() {
        assert_eq!(format_posted_date("2024-01-05"), "2024-01-05T00:00:00");
    }

    #[test]
    fn test_format_posted_date_unparsable_passthrough() {
        assert_eq!(format_posted_date("yesterday"), "yesterday");
        assert_eq!(format_posted_date(""), "");
    }

    #[test]
    fn test_format_salary_annual_range() {
        assert_eq!(
            format_salary(Some(45000.0), Some(60000.0)),
            "£45,000 - £60,000 per annum"
        );
    }

    #[test]
    fn test_format_salary_hourly_has_decimals() {
        assert_eq!(
            format_salary(Some(12.5), Some(15.0)),
            "£12.50 - £15.00 per hour"
        );
    }

    #[test]
    fn test_format_salary_daily_band() {
        assert_eq!(
            format_salary(Some(400.0), Some(550.0)),
            "£400 - £550 per day"
        );
    }

    #[test]
    fn test_format_salary_equal_min_max_collapses() {
        assert_eq!(format_salary(Some(50000.0), Some(50000.0)), "£50,000 per annum");
    }

    #[test]
    fn test_format_salary_only_min() {
        assert_eq!(format_salary(Some(30000.0), None), "From £30,000 per annum");
    }

    #[test]
    fn test_format_salary_only_max() {
        assert_eq!(format_salary(None, Some(80.0)), "Up to £80 per hour");
    }

    #[test]
    fn test_location_matches_is_case_insensitive_substring() {
        assert!(location_matches("Central London", "london"));
        assert!(!location_matches("Manchester", "London"));
    }

    #[test]
    fn test_format_amount_grouping() {
        assert_eq!(format_amount(1234567.0, 0), "1,234,567");
        assert_eq!(format_amount(999.0, 0), "999");
        assert_eq!(format_amount(1000.0, 2), "1,000.00");
    }
}
