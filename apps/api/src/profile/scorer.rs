//! Weighted section scorer shared by every profile type.
//!
//! A profile type contributes a table of [`SectionRule`]s; the scorer only
//! sums weights. Candidate and employer scoring differ purely in their
//! tables.

use serde::Serialize;

pub struct SectionRule<P> {
    /// Reported verbatim in the missing lists.
    pub name: &'static str,
    pub weight: f64,
    pub required: bool,
    pub is_complete: fn(&P) -> bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScore {
    pub completed_weight: f64,
    pub total_weight: f64,
    /// Every incomplete section, in table order.
    pub missing: Vec<String>,
    /// Incomplete sections flagged `required`, in table order.
    pub missing_required: Vec<String>,
}

impl SectionScore {
    /// `round(completed / total * 100)`, or 0 for an empty table.
    pub fn percentage(&self) -> u8 {
        if self.total_weight <= 0.0 {
            return 0;
        }
        ((self.completed_weight / self.total_weight) * 100.0)
            .round()
            .clamp(0.0, 100.0) as u8
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

pub fn score_sections<P>(profile: &P, rules: &[SectionRule<P>]) -> SectionScore {
    let mut completed_weight = 0.0;
    let mut total_weight = 0.0;
    let mut missing = Vec::new();
    let mut missing_required = Vec::new();

    for rule in rules {
        total_weight += rule.weight;
        if (rule.is_complete)(profile) {
            completed_weight += rule.weight;
            continue;
        }
        missing.push(rule.name.to_string());
        if rule.required {
            missing_required.push(rule.name.to_string());
        }
    }

    SectionScore {
        completed_weight,
        total_weight,
        missing,
        missing_required,
    }
}
