//! Deterministic cache keys. Query structs serialize in declaration order, so
//! identical queries always map to the same key.

use serde::Serialize;
use uuid::Uuid;

pub const JOB_FILTER_COUNTS: &str = "job_filter_counts";

fn encode<Q: Serialize + ?Sized>(query: &Q) -> String {
    serde_json::to_string(query).unwrap_or_default()
}

pub fn job_list<Q: Serialize + ?Sized>(query: &Q) -> String {
    format!("jobs_{}", encode(query))
}

pub fn job_detail(job_id: Uuid) -> String {
    format!("job_{job_id}")
}

pub fn employer_grid<Q: Serialize + ?Sized>(query: &Q) -> String {
    format!("employers_v4_{}", encode(query))
}

pub fn employer_detail(employer_id: Uuid) -> String {
    format!("employer_{employer_id}")
}

pub fn candidate_applications(candidate_id: Uuid) -> String {
    format!("/api/candidate/applications/{candidate_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Query {
        location: Option<String>,
        page: u32,
    }

    #[test]
    fn test_same_query_same_key() {
        let a = Query {
            location: Some("Pune".to_string()),
            page: 1,
        };
        let b = Query {
            location: Some("Pune".to_string()),
            page: 1,
        };
        assert_eq!(job_list(&a), job_list(&b));
        assert_eq!(job_list(&a), r#"jobs_{"location":"Pune","page":1}"#);
    }

    #[test]
    fn test_different_pages_differ() {
        let a = Query {
            location: None,
            page: 1,
        };
        let b = Query {
            location: None,
            page: 2,
        };
        assert_ne!(employer_grid(&a), employer_grid(&b));
        assert!(employer_grid(&a).starts_with("employers_v4_"));
    }

    #[test]
    fn test_detail_keys() {
        let id = Uuid::nil();
        assert_eq!(job_detail(id), format!("job_{id}"));
        assert!(candidate_applications(id).starts_with("/api/candidate/applications/"));
    }
}
