use serde::{Deserialize, Serialize};

use crate::models::document::has_text;
use crate::profile::models::{CandidateProfile, EducationEntry};
use crate::profile::scorer::{score_sections, SectionRule};

/// 10th, PUC/Diploma and a degree.
pub const MIN_EDUCATION_ENTRIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCompletion {
    pub percentage: u8,
    pub missing_sections: Vec<String>,
}

const CANDIDATE_SECTIONS: &[SectionRule<CandidateProfile>] = &[
    SectionRule {
        name: "Resume Headline",
        weight: 1.0,
        required: true,
        is_complete: has_headline,
    },
    SectionRule {
        name: "Profile Summary",
        weight: 1.0,
        required: true,
        is_complete: has_summary,
    },
    SectionRule {
        name: "Key Skills",
        weight: 1.0,
        required: true,
        is_complete: has_skills,
    },
    SectionRule {
        name: "Personal Details",
        weight: 1.0,
        required: true,
        is_complete: has_personal_details,
    },
    SectionRule {
        name: "Education (need at least 3 complete entries)",
        weight: 1.0,
        required: true,
        is_complete: has_education,
    },
    SectionRule {
        name: "Work Location Preferences",
        weight: 1.0,
        required: true,
        is_complete: has_preferred_locations,
    },
    SectionRule {
        name: "Resume Attachment",
        weight: 1.0,
        required: true,
        is_complete: has_resume,
    },
];

fn has_headline(p: &CandidateProfile) -> bool {
    has_text(p.resume_headline.as_deref())
}

fn has_summary(p: &CandidateProfile) -> bool {
    has_text(p.profile_summary.as_deref())
}

fn has_skills(p: &CandidateProfile) -> bool {
    !p.skills.is_empty()
}

fn has_personal_details(p: &CandidateProfile) -> bool {
    [
        &p.date_of_birth,
        &p.gender,
        &p.father_name,
        &p.mother_name,
        &p.residential_address,
    ]
    .iter()
    .any(|field| has_text(field.as_deref()))
}

fn is_complete_education(entry: &EducationEntry) -> bool {
    has_text(entry.degree_name.as_deref()) && has_text(entry.college_name.as_deref())
}

fn has_education(p: &CandidateProfile) -> bool {
    p.education.iter().filter(|e| is_complete_education(e)).count() >= MIN_EDUCATION_ENTRIES
}

fn has_preferred_locations(p: &CandidateProfile) -> bool {
    p.job_preferences
        .as_ref()
        .is_some_and(|prefs| !prefs.preferred_locations.is_empty())
}

fn has_resume(p: &CandidateProfile) -> bool {
    has_text(p.resume.as_deref())
}

/// Seven equally weighted sections. A missing profile scores zero and
/// reports nothing missing.
pub fn calculate_candidate_completion(profile: Option<&CandidateProfile>) -> CandidateCompletion {
    let Some(profile) = profile else {
        return CandidateCompletion {
            percentage: 0,
            missing_sections: vec![],
        };
    };

    let score = score_sections(profile, CANDIDATE_SECTIONS);
    CandidateCompletion {
        percentage: score.percentage(),
        missing_sections: score.missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::JobPreferences;

    fn education(degree: &str, college: &str) -> EducationEntry {
        EducationEntry {
            degree_name: Some(degree.to_string()),
            college_name: Some(college.to_string()),
            ..Default::default()
        }
    }

    fn complete_profile() -> CandidateProfile {
        CandidateProfile {
            resume_headline: Some("Backend developer".to_string()),
            profile_summary: Some("Four years building payment APIs".to_string()),
            skills: vec!["Rust".to_string()],
            gender: Some("female".to_string()),
            education: vec![
                education("SSLC", "City High School"),
                education("PUC", "State PU College"),
                education("B.E.", "Institute of Technology"),
            ],
            job_preferences: Some(JobPreferences {
                preferred_locations: vec!["Bengaluru".to_string()],
                ..Default::default()
            }),
            resume: Some("resumes/abc.pdf".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_profile_is_100() {
        let result = calculate_candidate_completion(Some(&complete_profile()));
        assert_eq!(result.percentage, 100);
        assert!(result.missing_sections.is_empty());
    }

    #[test]
    fn test_empty_profile_lists_all_sections() {
        let result = calculate_candidate_completion(Some(&CandidateProfile::default()));
        assert_eq!(result.percentage, 0);
        assert_eq!(
            result.missing_sections,
            vec![
                "Resume Headline",
                "Profile Summary",
                "Key Skills",
                "Personal Details",
                "Education (need at least 3 complete entries)",
                "Work Location Preferences",
                "Resume Attachment",
            ]
        );
    }

    #[test]
    fn test_missing_profile_scores_zero_with_no_sections() {
        let result = calculate_candidate_completion(None);
        assert_eq!(result.percentage, 0);
        assert!(result.missing_sections.is_empty());
    }

    #[test]
    fn test_whitespace_strings_do_not_count() {
        let mut profile = complete_profile();
        profile.resume_headline = Some("   ".to_string());
        let result = calculate_candidate_completion(Some(&profile));
        // 6 / 7 = 85.7%
        assert_eq!(result.percentage, 86);
        assert_eq!(result.missing_sections, vec!["Resume Headline"]);
    }

    #[test]
    fn test_two_education_entries_are_not_enough() {
        let mut profile = complete_profile();
        profile.education.pop();
        let result = calculate_candidate_completion(Some(&profile));
        assert_eq!(
            result.missing_sections,
            vec!["Education (need at least 3 complete entries)"]
        );
    }

    #[test]
    fn test_incomplete_education_entries_are_ignored() {
        let mut profile = complete_profile();
        profile.education.push(education("M.Tech", ""));
        profile.education[0].college_name = None;
        // Four entries, only two complete.
        let result = calculate_candidate_completion(Some(&profile));
        assert_eq!(result.percentage, 86);
    }

    #[test]
    fn test_any_personal_field_counts() {
        let mut profile = complete_profile();
        profile.gender = None;
        profile.residential_address = Some("12 MG Road".to_string());
        assert_eq!(calculate_candidate_completion(Some(&profile)).percentage, 100);
    }

    #[test]
    fn test_preferences_without_locations_missing() {
        let mut profile = complete_profile();
        profile.job_preferences = Some(JobPreferences::default());
        let result = calculate_candidate_completion(Some(&profile));
        assert_eq!(result.missing_sections, vec!["Work Location Preferences"]);
    }

    #[test]
    fn test_partial_profile_rounds() {
        let profile = CandidateProfile {
            resume_headline: Some("Analyst".to_string()),
            skills: vec!["SQL".to_string()],
            ..Default::default()
        };
        // 2 / 7 = 28.57%
        assert_eq!(calculate_candidate_completion(Some(&profile)).percentage, 29);
    }
}
