use serde::{Deserialize, Serialize};

use crate::models::offer::RemoteType;

/// Filter set accepted by the query API and translated into the search
/// engine's bool-query DSL. Every field is optional; an empty request means
/// "match everything".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub keywords: Option<Vec<String>>,
    pub regions: Option<Vec<String>>,
    pub departments: Option<Vec<String>>,
    pub cities: Option<Vec<String>>,
    pub contract_types: Option<Vec<String>>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub experience_levels: Option<Vec<String>>,
    pub rome_codes: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub is_remote: Option<bool>,
    pub remote_types: Option<Vec<RemoteType>>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Split a comma-separated query parameter into a list, dropping empty
/// segments. `None` (or a string of separators only) stays `None`.
pub fn split_csv(param: Option<String>) -> Option<Vec<String>> {
    let values: Vec<String> = param?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_drops_empty_segments() {
        assert_eq!(
            split_csv(Some("a, b,,c".to_string())),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(split_csv(Some(",,".to_string())), None);
        assert_eq!(split_csv(None), None);
    }
}
