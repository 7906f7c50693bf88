use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::models::filters::{FilterRequest, split_csv};
use crate::search::analytics::{
    ContractCount, GeoLevel, LocationCount, SkillCount, TimelineInterval, TimelinePoint,
    contract_distribution, geography_stats, salary_stats, timeline, top_skills,
};
use crate::search::client::SearchClient;

const DEFAULT_TOP_SKILLS: usize = 20;
const MAX_TOP_SKILLS: usize = 100;

/// Keyword fields salary stats may be grouped by.
const SALARY_GROUP_FIELDS: &[&str] = &[
    "experience_level",
    "location_region",
    "location_department",
    "contract_type",
    "work_schedule",
    "remote_type",
    "education_level",
    "company_size",
];

fn keyword_region_filters(keywords: Option<String>, regions: Option<String>) -> FilterRequest {
    FilterRequest {
        keywords: split_csv(keywords),
        regions: split_csv(regions),
        ..Default::default()
    }
}

#[derive(Debug, Deserialize)]
pub struct SalaryParams {
    pub group_by: Option<String>,
    pub keywords: Option<String>,
    pub regions: Option<String>,
}

/// Salary statistics, optionally grouped by a keyword field
/// (experience_level, location_region, contract_type, ...).
pub async fn salary(
    State(search): State<SearchClient>,
    Query(params): Query<SalaryParams>,
) -> Result<Json<Value>, AppError> {
    if let Some(group_by) = params.group_by.as_deref()
        && !SALARY_GROUP_FIELDS.contains(&group_by)
    {
        return Err(AppError::BadRequest(format!(
            "Cannot group salary stats by '{group_by}'"
        )));
    }
    let filters = keyword_region_filters(params.keywords, params.regions);
    let stats = salary_stats(&search, params.group_by.as_deref(), &filters).await;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct SkillsParams {
    pub top: Option<usize>,
    pub keywords: Option<String>,
    pub regions: Option<String>,
}

/// Top N most requested skills.
pub async fn skills(
    State(search): State<SearchClient>,
    Query(params): Query<SkillsParams>,
) -> Json<Vec<SkillCount>> {
    let top = params.top.unwrap_or(DEFAULT_TOP_SKILLS).clamp(1, MAX_TOP_SKILLS);
    let filters = keyword_region_filters(params.keywords, params.regions);
    Json(top_skills(&search, top, &filters).await)
}

#[derive(Debug, Deserialize)]
pub struct GeographyParams {
    pub level: Option<GeoLevel>,
    pub keywords: Option<String>,
}

/// Geographic distribution of offers at region, department or city level.
pub async fn geography(
    State(search): State<SearchClient>,
    Query(params): Query<GeographyParams>,
) -> Json<Vec<LocationCount>> {
    let filters = keyword_region_filters(params.keywords, None);
    let level = params.level.unwrap_or(GeoLevel::Region);
    Json(geography_stats(&search, level, &filters).await)
}

#[derive(Debug, Deserialize)]
pub struct ContractsParams {
    pub keywords: Option<String>,
}

/// Distribution of contract types.
pub async fn contracts(
    State(search): State<SearchClient>,
    Query(params): Query<ContractsParams>,
) -> Json<Vec<ContractCount>> {
    let filters = keyword_region_filters(params.keywords, None);
    Json(contract_distribution(&search, &filters).await)
}

#[derive(Debug, Deserialize)]
pub struct TimelineParams {
    pub interval: Option<TimelineInterval>,
    pub keywords: Option<String>,
}

/// Publication timeline at a calendar interval.
pub async fn publication_timeline(
    State(search): State<SearchClient>,
    Query(params): Query<TimelineParams>,
) -> Json<Vec<TimelinePoint>> {
    let filters = keyword_region_filters(params.keywords, None);
    let interval = params.interval.unwrap_or(TimelineInterval::Week);
    Json(timeline(&search, interval, &filters).await)
}
