use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::models::filters::{FilterRequest, split_csv};
use crate::search::analytics::{
    GeoLevel, TimelineInterval, contract_distribution, geography_stats, salary_stats, timeline,
    top_skills,
};
use crate::search::client::SearchClient;
use crate::search::offers::count_offers;

/// Headline KPIs: totals, salary spread, top regions and skills, contract
/// mix.
pub async fn overview(State(search): State<SearchClient>) -> Json<Value> {
    let filters = FilterRequest::default();

    let total_offers = count_offers(&search, &filters).await;
    let salary_raw = salary_stats(&search, None, &filters).await;
    let salary = salary_raw.get("salary_stats").cloned().unwrap_or(json!({}));

    let mut top_regions = geography_stats(&search, GeoLevel::Region, &filters).await;
    top_regions.truncate(3);
    let skills = top_skills(&search, 3, &filters).await;

    let contracts = contract_distribution(&search, &filters).await;
    let total_with_contract: u64 = contracts.iter().map(|c| c.count).sum();
    // Contract types may carry the short code or the full label.
    let cdi_count = contracts
        .iter()
        .find(|c| c.contract_type.contains("CDI") || c.contract_type.contains("indéterminée"))
        .map(|c| c.count)
        .unwrap_or(0);
    let cdi_percentage = if total_with_contract > 0 {
        (cdi_count as f64 / total_with_contract as f64 * 100.0 * 10.0).round() / 10.0
    } else {
        0.0
    };

    Json(json!({
        "total_offers": total_offers,
        "salary_avg": salary.get("avg").cloned().unwrap_or(json!(0)),
        "salary_min": salary.get("min").cloned().unwrap_or(json!(0)),
        "salary_max": salary.get("max").cloned().unwrap_or(json!(0)),
        "top_regions": top_regions,
        "top_skills": skills,
        "cdi_percentage": cdi_percentage,
        "contract_distribution": contracts
    }))
}

#[derive(Debug, Deserialize)]
pub struct KpiParams {
    pub keywords: Option<String>,
    pub regions: Option<String>,
}

/// KPIs narrowed by optional keyword/region filters.
pub async fn kpis(
    State(search): State<SearchClient>,
    Query(params): Query<KpiParams>,
) -> Json<Value> {
    let filters = FilterRequest {
        keywords: split_csv(params.keywords),
        regions: split_csv(params.regions),
        ..Default::default()
    };

    let total = count_offers(&search, &filters).await;
    let salary_raw = salary_stats(&search, None, &filters).await;

    Json(json!({
        "total_offers": total,
        "salary_stats": salary_raw.get("salary_stats").cloned().unwrap_or(json!({})),
    }))
}

#[derive(Debug, Deserialize)]
pub struct TimelineParams {
    pub interval: Option<TimelineInterval>,
}

/// Publication timeline wrapped with its interval.
pub async fn publication_timeline(
    State(search): State<SearchClient>,
    Query(params): Query<TimelineParams>,
) -> Json<Value> {
    let interval = params.interval.unwrap_or(TimelineInterval::Week);
    let data = timeline(&search, interval, &FilterRequest::default()).await;
    Json(json!({
        "interval": interval.as_str(),
        "data": data
    }))
}
