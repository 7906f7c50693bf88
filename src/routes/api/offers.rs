use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::models::filters::{FilterRequest, split_csv};
use crate::search::client::SearchClient;
use crate::search::offers::{
    DEFAULT_PAGE_SIZE, DEFAULT_SORT_FIELD, OfferPage, SortOrder, count_offers, get_offer,
    search_offers,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    // Comma-separated filter lists
    pub keywords: Option<String>,
    pub regions: Option<String>,
    pub departments: Option<String>,
    pub contract_types: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
}

impl ListParams {
    fn filters(&self) -> FilterRequest {
        FilterRequest {
            keywords: split_csv(self.keywords.clone()),
            regions: split_csv(self.regions.clone()),
            departments: split_csv(self.departments.clone()),
            contract_types: split_csv(self.contract_types.clone()),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// Paginated offer list with query-parameter filters.
pub async fn list(
    State(search): State<SearchClient>,
    Query(params): Query<ListParams>,
) -> Json<OfferPage> {
    let filters = params.filters();
    let page = search_offers(
        &search,
        &filters,
        params.page.unwrap_or(1),
        params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        params.sort_by.as_deref().unwrap_or(DEFAULT_SORT_FIELD),
        params.sort_order.unwrap_or(SortOrder::Desc),
    )
    .await;
    Json(page)
}

/// Offer search with the full filter set in the request body.
pub async fn search(
    State(search): State<SearchClient>,
    Query(params): Query<PageParams>,
    Json(filters): Json<FilterRequest>,
) -> Json<OfferPage> {
    let page = search_offers(
        &search,
        &filters,
        params.page.unwrap_or(1),
        params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        params.sort_by.as_deref().unwrap_or(DEFAULT_SORT_FIELD),
        params.sort_order.unwrap_or(SortOrder::Desc),
    )
    .await;
    Json(page)
}

/// Single offer by canonical id; 404 when the engine does not have it.
/// An engine failure also surfaces as 404 rather than a 5xx, matching the
/// read path's availability-first policy.
pub async fn get(
    State(search): State<SearchClient>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let offer = match get_offer(&search, &id).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!("Offer lookup for {id} failed: {e}");
            None
        }
    };
    let offer = offer.ok_or_else(|| AppError::NotFound(format!("Offer {id} not found")))?;
    Ok(Json(offer))
}

#[derive(Debug, Deserialize)]
pub struct CountParams {
    pub keywords: Option<String>,
    pub regions: Option<String>,
    pub departments: Option<String>,
    pub contract_types: Option<String>,
}

/// Count of offers matching the filters.
pub async fn count(
    State(search): State<SearchClient>,
    Query(params): Query<CountParams>,
) -> Json<Value> {
    let filters = FilterRequest {
        keywords: split_csv(params.keywords),
        regions: split_csv(params.regions),
        departments: split_csv(params.departments),
        contract_types: split_csv(params.contract_types),
        ..Default::default()
    };
    let count = count_offers(&search, &filters).await;
    Json(json!({ "count": count }))
}
