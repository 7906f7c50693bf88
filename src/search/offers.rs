//! Offer retrieval: paginated search, single lookup, counting.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::models::filters::FilterRequest;
use crate::search::client::SearchClient;
use crate::search::query::build_query;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_SORT_FIELD: &str = "published_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One page of search results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct OfferPage {
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub pages: u64,
    pub items: Vec<Value>,
}

impl OfferPage {
    fn empty(page: u64, size: u64) -> Self {
        Self {
            total: 0,
            page,
            size,
            pages: 0,
            items: Vec::new(),
        }
    }
}

/// Search offers with filters, pagination and sorting. An engine failure
/// degrades to an empty page rather than an error.
pub async fn search_offers(
    client: &SearchClient,
    filters: &FilterRequest,
    page: u64,
    size: u64,
    sort_by: &str,
    sort_order: SortOrder,
) -> OfferPage {
    let page = page.max(1);
    let size = size.clamp(1, MAX_PAGE_SIZE);
    let body = json!({
        "query": build_query(filters),
        "from": (page - 1) * size,
        "size": size,
        "sort": [{ sort_by: { "order": sort_order.as_str() } }]
    });

    match client.search(&body).await {
        Ok(response) => parse_offer_page(&response, page, size),
        Err(e) => {
            tracing::warn!("Offer search failed, returning empty page: {e}");
            OfferPage::empty(page, size)
        }
    }
}

/// Count offers matching the filters; zero on engine failure.
pub async fn count_offers(client: &SearchClient, filters: &FilterRequest) -> u64 {
    match client.count(&build_query(filters)).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Offer count failed, returning zero: {e}");
            0
        }
    }
}

/// Fetch one offer by canonical id. `Ok(None)` when the engine does not
/// have the document; the route layer turns that into a 404.
pub async fn get_offer(client: &SearchClient, id: &str) -> Result<Option<Value>, AppError> {
    client.get(id).await
}

fn parse_offer_page(response: &Value, page: u64, size: u64) -> OfferPage {
    let total = response
        .pointer("/hits/total/value")
        .and_then(|v| v.as_u64())
        .unwrap_or(0);
    let items = response
        .pointer("/hits/hits")
        .and_then(|v| v.as_array())
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit.get("_source").cloned())
                .collect()
        })
        .unwrap_or_default();
    OfferPage {
        total,
        page,
        size,
        pages: total.div_ceil(size),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hits_into_a_page() {
        let response = json!({
            "hits": {
                "total": { "value": 41, "relation": "eq" },
                "hits": [
                    { "_id": "francetravail:1", "_source": { "id": "francetravail:1" } },
                    { "_id": "francetravail:2", "_source": { "id": "francetravail:2" } }
                ]
            }
        });
        let page = parse_offer_page(&response, 2, 20);
        assert_eq!(page.total, 41);
        assert_eq!(page.page, 2);
        assert_eq!(page.pages, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0]["id"], "francetravail:1");
    }

    #[test]
    fn malformed_response_yields_an_empty_page() {
        let page = parse_offer_page(&json!({}), 1, 20);
        assert_eq!(page.total, 0);
        assert_eq!(page.pages, 0);
        assert!(page.items.is_empty());
    }
}
