//! Aggregation queries for the analytics endpoints.
//!
//! Each function issues one aggregation search and parses the buckets into
//! typed rows. Engine-side read failures degrade to empty results with a
//! logged warning: the dashboards prefer a blank panel over a 5xx.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::models::filters::FilterRequest;
use crate::reference;
use crate::search::client::SearchClient;
use crate::search::query::build_query;

/// Aggregation level for geography distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoLevel {
    Region,
    Department,
    City,
}

impl GeoLevel {
    pub fn field(self) -> &'static str {
        match self {
            GeoLevel::Region => "location_region",
            GeoLevel::Department => "location_department",
            GeoLevel::City => "location_city",
        }
    }
}

/// Calendar interval for publication timelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineInterval {
    Day,
    Week,
    Month,
}

impl TimelineInterval {
    pub fn as_str(self) -> &'static str {
        match self {
            TimelineInterval::Day => "day",
            TimelineInterval::Week => "week",
            TimelineInterval::Month => "month",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractCount {
    pub contract_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationCount {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub date: String,
    pub count: u64,
}

/// Salary statistics (count/min/max/avg/sum on `salary_min`), optionally
/// grouped under a terms bucket. Returns the raw aggregations object; an
/// engine failure returns an empty object.
pub async fn salary_stats(
    client: &SearchClient,
    group_by: Option<&str>,
    filters: &FilterRequest,
) -> Value {
    run_aggregations(client, filters, salary_aggs(group_by))
        .await
        .unwrap_or_else(|| json!({}))
}

/// Top N most requested skills.
pub async fn top_skills(client: &SearchClient, top: usize, filters: &FilterRequest) -> Vec<SkillCount> {
    let aggs = json!({ "top_skills": { "terms": { "field": "skills", "size": top } } });
    match run_aggregations(client, filters, aggs).await {
        Some(aggregations) => term_buckets(&aggregations, "top_skills")
            .into_iter()
            .map(|(skill, count)| SkillCount { skill, count })
            .collect(),
        None => Vec::new(),
    }
}

/// Distribution of contract types.
pub async fn contract_distribution(
    client: &SearchClient,
    filters: &FilterRequest,
) -> Vec<ContractCount> {
    let aggs = json!({ "contracts": { "terms": { "field": "contract_type", "size": 20 } } });
    match run_aggregations(client, filters, aggs).await {
        Some(aggregations) => term_buckets(&aggregations, "contracts")
            .into_iter()
            .map(|(contract_type, count)| ContractCount {
                contract_type,
                count,
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Geographic distribution at the requested level. Department buckets are
/// enriched with the department name from the reference table.
pub async fn geography_stats(
    client: &SearchClient,
    level: GeoLevel,
    filters: &FilterRequest,
) -> Vec<LocationCount> {
    let aggs = json!({ "locations": { "terms": { "field": level.field(), "size": 50 } } });
    match run_aggregations(client, filters, aggs).await {
        Some(aggregations) => parse_geography(&aggregations, level),
        None => Vec::new(),
    }
}

/// Publication-date histogram at a calendar interval.
pub async fn timeline(
    client: &SearchClient,
    interval: TimelineInterval,
    filters: &FilterRequest,
) -> Vec<TimelinePoint> {
    let aggs = json!({
        "timeline": {
            "date_histogram": {
                "field": "published_at",
                "calendar_interval": interval.as_str()
            }
        }
    });
    match run_aggregations(client, filters, aggs).await {
        Some(aggregations) => parse_timeline(&aggregations),
        None => Vec::new(),
    }
}

/// Run a zero-hit search carrying only aggregations; `None` on engine
/// failure.
async fn run_aggregations(
    client: &SearchClient,
    filters: &FilterRequest,
    aggs: Value,
) -> Option<Value> {
    let body = json!({
        "query": build_query(filters),
        "size": 0,
        "aggs": aggs
    });
    match client.search(&body).await {
        Ok(response) => response.get("aggregations").cloned(),
        Err(e) => {
            tracing::warn!("Aggregation query failed, returning empty result: {e}");
            None
        }
    }
}

fn salary_aggs(group_by: Option<&str>) -> Value {
    let stats = json!({ "salary_stats": { "stats": { "field": "salary_min" } } });
    match group_by {
        Some(field) => json!({
            "grouped": {
                "terms": { "field": field, "size": 50 },
                "aggs": stats
            }
        }),
        None => stats,
    }
}

/// Pull `(key, doc_count)` pairs out of a terms aggregation.
pub(crate) fn term_buckets(aggregations: &Value, name: &str) -> Vec<(String, u64)> {
    let Some(buckets) = aggregations
        .get(name)
        .and_then(|agg| agg.get("buckets"))
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };
    buckets
        .iter()
        .filter_map(|bucket| {
            let key = bucket.get("key")?;
            let key = key
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| key.to_string());
            let count = bucket.get("doc_count").and_then(|v| v.as_u64())?;
            Some((key, count))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn parse_geography(aggregations: &Value, level: GeoLevel) -> Vec<LocationCount> {
    term_buckets(aggregations, "locations")
        .into_iter()
        .map(|(location, count)| {
            let name = match level {
                GeoLevel::Department => {
                    reference::department_name(&location).map(String::from)
                }
                _ => None,
            };
            LocationCount {
                location,
                name,
                count,
            }
        })
        .collect()
}

fn parse_timeline(aggregations: &Value) -> Vec<TimelinePoint> {
    let Some(buckets) = aggregations
        .pointer("/timeline/buckets")
        .and_then(|v| v.as_array())
    else {
        return Vec::new();
    };
    buckets
        .iter()
        .filter_map(|bucket| {
            let date = bucket
                .get("key_as_string")
                .and_then(|v| v.as_str())?
                .to_string();
            let count = bucket.get("doc_count").and_then(|v| v.as_u64())?;
            Some(TimelinePoint { date, count })
        })
        .collect()
}
