use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::document::{lenient_date, null_as_default, string_or_number};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree_name: Option<String>,
    pub college_name: Option<String>,
    pub specialization: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub passing_year: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub score: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPreferences {
    #[serde(deserialize_with = "null_as_default")]
    pub preferred_locations: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub job_types: Vec<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub expected_salary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentRecord {
    pub designation: Option<String>,
    pub company_name: Option<String>,
    #[serde(deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(deserialize_with = "null_as_default")]
    pub is_current: bool,
    /// Total entered by hand on the first record; overrides the computed total.
    pub total_experience_manual: Option<String>,
}

/// Candidate profile document (`candidate_profiles.data`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub resume_headline: Option<String>,
    pub profile_summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub residential_address: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<EducationEntry>,
    pub job_preferences: Option<JobPreferences>,
    /// Stored resume reference (object key or data URL).
    pub resume: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub employment: Vec<EmploymentRecord>,
}

/// Employer company profile document (`employer_profiles.data`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployerProfile {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub phone: Option<String>,
    pub email: Option<String>,
    pub pan_card_image: Option<String>,
    pub gst_image: Option<String>,
    pub certificate_of_incorporation: Option<String>,
    pub website: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub established_since: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub team_size: Option<String>,
    pub industry_sector: Option<String>,
    pub company_type: Option<String>,
    pub corporate_address: Option<String>,
    pub why_join_us: Option<String>,
    pub logo: Option<String>,
    pub cover_image: Option<String>,
    pub contact_full_name: Option<String>,
    pub contact_designation: Option<String>,
    pub contact_official_email: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub contact_mobile: Option<String>,
}

/// Review flags kept on the employer account, outside the profile document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerAccount {
    pub is_approved: bool,
    pub profile_submitted_for_review: bool,
}
