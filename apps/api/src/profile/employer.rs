use serde::{Deserialize, Serialize};

use crate::models::document::has_text;
use crate::profile::models::{EmployerAccount, EmployerProfile};
use crate::profile::scorer::{score_sections, SectionRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployerCompletion {
    pub completion: u8,
    /// Required fields only; this is what the dashboard prompts for.
    pub missing_fields: Vec<String>,
    pub all_missing_fields: Vec<String>,
    pub is_profile_complete: bool,
    pub is_approved: bool,
    pub profile_submitted_for_review: bool,
    pub can_post_jobs: bool,
    pub message: String,
}

macro_rules! field_rule {
    ($field:ident, $weight:expr, $required:expr) => {
        SectionRule {
            name: stringify!($field),
            weight: $weight,
            required: $required,
            is_complete: |p: &EmployerProfile| has_text(p.$field.as_deref()),
        }
    };
}

/// Weights: company basics and KYC documents 2, company details 1.5,
/// branding and contact person 1. Total weight 32.
const EMPLOYER_FIELDS: &[SectionRule<EmployerProfile>] = &[
    field_rule!(company_name, 2.0, true),
    field_rule!(description, 2.0, true),
    field_rule!(location, 2.0, true),
    field_rule!(phone, 2.0, true),
    field_rule!(email, 2.0, true),
    field_rule!(pan_card_image, 2.0, true),
    field_rule!(gst_image, 2.0, true),
    field_rule!(certificate_of_incorporation, 2.0, true),
    field_rule!(website, 1.5, false),
    field_rule!(established_since, 1.5, false),
    field_rule!(team_size, 1.5, false),
    field_rule!(industry_sector, 1.5, false),
    field_rule!(company_type, 1.5, false),
    field_rule!(corporate_address, 1.5, false),
    field_rule!(why_join_us, 1.0, false),
    field_rule!(logo, 1.0, false),
    field_rule!(cover_image, 1.0, false),
    field_rule!(contact_full_name, 1.0, false),
    field_rule!(contact_designation, 1.0, false),
    field_rule!(contact_official_email, 1.0, false),
    field_rule!(contact_mobile, 1.0, false),
];

fn document_label(field: &str) -> &str {
    match field {
        "pan_card_image" => "PAN Card Image",
        "gst_image" => "GST Certificate",
        "certificate_of_incorporation" => "Certificate of Incorporation",
        other => other,
    }
}

fn status_message(missing_required: &[String], account: EmployerAccount) -> String {
    if !missing_required.is_empty() {
        let labels: Vec<&str> = missing_required.iter().map(|f| document_label(f)).collect();
        format!(
            "Please complete your profile by uploading: {}. Then wait for admin approval.",
            labels.join(", ")
        )
    } else if !account.profile_submitted_for_review {
        "Your profile is complete. Save your profile to submit it for admin review.".to_string()
    } else if !account.is_approved {
        "Thank you for completing your profile! Your profile has been submitted for admin review."
            .to_string()
    } else {
        "Thank you for completing your profile! Your profile is approved and you can now post jobs."
            .to_string()
    }
}

/// Weighted completion for an employer. `can_post_jobs` additionally needs
/// admin approval.
pub fn calculate_employer_completion(
    profile: Option<&EmployerProfile>,
    account: EmployerAccount,
) -> EmployerCompletion {
    let Some(profile) = profile else {
        return EmployerCompletion {
            completion: 0,
            missing_fields: vec!["All profile fields".to_string()],
            all_missing_fields: vec!["All profile fields".to_string()],
            is_profile_complete: false,
            is_approved: account.is_approved,
            profile_submitted_for_review: account.profile_submitted_for_review,
            can_post_jobs: false,
            message: "Please complete your company profile to post jobs.".to_string(),
        };
    };

    let score = score_sections(profile, EMPLOYER_FIELDS);
    let is_profile_complete = score.is_complete();
    let message = status_message(&score.missing_required, account);

    EmployerCompletion {
        completion: score.percentage(),
        is_profile_complete,
        is_approved: account.is_approved,
        profile_submitted_for_review: account.profile_submitted_for_review,
        can_post_jobs: is_profile_complete && account.is_approved,
        message,
        missing_fields: score.missing_required,
        all_missing_fields: score.missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn required_only() -> EmployerProfile {
        EmployerProfile {
            company_name: s("Acme Robotics"),
            description: s("Warehouse automation"),
            location: s("Pune"),
            phone: s("9876543210"),
            email: s("hr@acme.example"),
            pan_card_image: s("docs/pan.png"),
            gst_image: s("docs/gst.png"),
            certificate_of_incorporation: s("docs/coi.pdf"),
            ..Default::default()
        }
    }

    #[test]
    fn test_total_weight_is_32() {
        let total: f64 = EMPLOYER_FIELDS.iter().map(|r| r.weight).sum();
        assert_eq!(total, 32.0);
        assert_eq!(EMPLOYER_FIELDS.iter().filter(|r| r.required).count(), 8);
    }

    #[test]
    fn test_required_only_profile_is_complete() {
        let result = calculate_employer_completion(Some(&required_only()), EmployerAccount::default());
        assert!(result.is_profile_complete);
        assert!(result.missing_fields.is_empty());
        // 16 / 32
        assert_eq!(result.completion, 50);
        assert_eq!(result.all_missing_fields.len(), 13);
        assert!(!result.can_post_jobs);
    }

    #[test]
    fn test_hand_computed_percentage() {
        let mut profile = required_only();
        profile.pan_card_image = None;
        profile.website = s("https://acme.example");
        profile.team_size = s("50");
        profile.logo = s("logo.png");
        // (14 + 1.5 + 1.5 + 1) / 32 = 18 / 32 = 56.25%
        let result = calculate_employer_completion(Some(&profile), EmployerAccount::default());
        assert_eq!(result.completion, 56);
        assert!(!result.is_profile_complete);
        assert_eq!(result.missing_fields, vec!["pan_card_image"]);
    }

    #[test]
    fn test_half_point_rounds_up() {
        // 4 / 32 = 12.5% rounds to 13.
        let profile = EmployerProfile {
            company_name: s("Acme"),
            description: s("Robots"),
            ..Default::default()
        };
        let result = calculate_employer_completion(Some(&profile), EmployerAccount::default());
        assert_eq!(result.completion, 13);
    }

    #[test]
    fn test_can_post_jobs_needs_approval() {
        let approved = EmployerAccount {
            is_approved: true,
            profile_submitted_for_review: true,
        };
        let result = calculate_employer_completion(Some(&required_only()), approved);
        assert!(result.can_post_jobs);
        assert!(result.message.contains("approved and you can now post jobs"));
    }

    #[test]
    fn test_messages_follow_review_state() {
        let unsubmitted =
            calculate_employer_completion(Some(&required_only()), EmployerAccount::default());
        assert!(unsubmitted.message.contains("Save your profile to submit"));

        let mut docs_missing = required_only();
        docs_missing.gst_image = None;
        docs_missing.certificate_of_incorporation = Some("  ".to_string());
        let result = calculate_employer_completion(Some(&docs_missing), EmployerAccount::default());
        assert_eq!(
            result.message,
            "Please complete your profile by uploading: GST Certificate, Certificate of Incorporation. Then wait for admin approval."
        );

        let submitted = EmployerAccount {
            is_approved: false,
            profile_submitted_for_review: true,
        };
        let result = calculate_employer_completion(Some(&required_only()), submitted);
        assert!(result.message.contains("submitted for admin review"));
        assert!(!result.can_post_jobs);
    }

    #[test]
    fn test_missing_profile_default() {
        let result = calculate_employer_completion(None, EmployerAccount::default());
        assert_eq!(result.completion, 0);
        assert_eq!(result.missing_fields, vec!["All profile fields"]);
        assert!(!result.can_post_jobs);
        assert_eq!(
            result.message,
            "Please complete your company profile to post jobs."
        );
    }
}
