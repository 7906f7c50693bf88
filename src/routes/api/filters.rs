use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::search::analytics::term_buckets;
use crate::search::client::SearchClient;

/// Distinct values of a keyword field, optionally scoped by a term filter
/// on another field. Engine failures degrade to an empty list.
async fn distinct_values(
    search: &SearchClient,
    field: &str,
    size: usize,
    scope: Option<(&str, &str)>,
) -> Vec<String> {
    let query = match scope {
        Some((scope_field, value)) => json!({ "term": { scope_field: value } }),
        None => json!({ "match_all": {} }),
    };
    let body = json!({
        "query": query,
        "size": 0,
        "aggs": { "values": { "terms": { "field": field, "size": size } } }
    });
    match search.search(&body).await {
        Ok(response) => {
            let aggregations = response.get("aggregations").cloned().unwrap_or(Value::Null);
            term_buckets(&aggregations, "values")
                .into_iter()
                .map(|(value, _)| value)
                .collect()
        }
        Err(e) => {
            tracing::warn!("Filter-option query for '{field}' failed: {e}");
            Vec::new()
        }
    }
}

pub async fn regions(State(search): State<SearchClient>) -> Json<Vec<String>> {
    Json(distinct_values(&search, "location_region", 50, None).await)
}

#[derive(Debug, Deserialize)]
pub struct DepartmentsParams {
    pub region: Option<String>,
}

pub async fn departments(
    State(search): State<SearchClient>,
    Query(params): Query<DepartmentsParams>,
) -> Json<Vec<String>> {
    let scope = params
        .region
        .as_deref()
        .map(|region| ("location_region", region));
    Json(distinct_values(&search, "location_department", 150, scope).await)
}

#[derive(Debug, Deserialize)]
pub struct CitiesParams {
    pub department: Option<String>,
}

pub async fn cities(
    State(search): State<SearchClient>,
    Query(params): Query<CitiesParams>,
) -> Json<Vec<String>> {
    let scope = params
        .department
        .as_deref()
        .map(|department| ("location_department", department));
    Json(distinct_values(&search, "location_city", 200, scope).await)
}

pub async fn contracts(State(search): State<SearchClient>) -> Json<Vec<String>> {
    Json(distinct_values(&search, "contract_type", 50, None).await)
}

pub async fn experience_levels(State(search): State<SearchClient>) -> Json<Vec<String>> {
    Json(distinct_values(&search, "experience_level", 20, None).await)
}

pub async fn rome_codes(State(search): State<SearchClient>) -> Json<Vec<String>> {
    Json(distinct_values(&search, "rome_code", 100, None).await)
}
