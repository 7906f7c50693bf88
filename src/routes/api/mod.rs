pub mod analytics;
pub mod filters;
pub mod offers;
pub mod stats;

use axum::Router;
use axum::routing::{get, post};

use crate::search::client::SearchClient;

pub fn router(search: SearchClient) -> Router {
    let api = Router::new()
        // Offers
        .route("/offers", get(offers::list))
        .route("/offers/search", post(offers::search))
        .route("/offers/count/total", get(offers::count))
        .route("/offers/{id}", get(offers::get))
        // Analytics
        .route("/analytics/salary", get(analytics::salary))
        .route("/analytics/skills", get(analytics::skills))
        .route("/analytics/geography", get(analytics::geography))
        .route("/analytics/contracts", get(analytics::contracts))
        .route("/analytics/timeline", get(analytics::publication_timeline))
        // Stats
        .route("/stats/overview", get(stats::overview))
        .route("/stats/kpis", get(stats::kpis))
        .route("/stats/timeline", get(stats::publication_timeline))
        // Filter options
        .route("/filters/regions", get(filters::regions))
        .route("/filters/departments", get(filters::departments))
        .route("/filters/cities", get(filters::cities))
        .route("/filters/contracts", get(filters::contracts))
        .route("/filters/experience-levels", get(filters::experience_levels))
        .route("/filters/rome-codes", get(filters::rome_codes))
        .with_state(search);

    Router::new().nest("/api/v1", api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    /// Router wired to a port nothing listens on: every engine call fails,
    /// which is exactly the degradation path the read API promises to
    /// absorb.
    fn unreachable_engine_router() -> Router {
        let search = SearchClient::new("http://127.0.0.1:9", "jobmarket_test").unwrap();
        router(search)
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = unreachable_engine_router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn offer_list_degrades_to_an_empty_page() {
        let (status, payload) = get_json("/api/v1/offers?page=2&size=10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["total"], json!(0));
        assert_eq!(payload["page"], json!(2));
        assert_eq!(payload["items"], json!([]));
    }

    #[tokio::test]
    async fn unknown_offer_is_a_404() {
        let (status, payload) = get_json("/api/v1/offers/francetravail:000AAAA").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(
            payload["error"]
                .as_str()
                .unwrap()
                .contains("francetravail:000AAAA")
        );
    }

    #[tokio::test]
    async fn count_and_filter_options_degrade_to_zero_and_empty() {
        let (status, payload) = get_json("/api/v1/offers/count/total?keywords=python").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["count"], json!(0));

        let (status, payload) = get_json("/api/v1/filters/regions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!([]));
    }

    #[tokio::test]
    async fn invalid_enum_parameters_are_rejected() {
        let (status, _) = get_json("/api/v1/analytics/geography?level=galaxy").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/api/v1/analytics/timeline?interval=century").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn salary_grouping_is_allowlisted() {
        let (status, payload) = get_json("/api/v1/analytics/salary?group_by=raw").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].as_str().unwrap().contains("raw"));

        let (status, _) = get_json("/api/v1/analytics/salary?group_by=experience_level").await;
        assert_eq!(status, StatusCode::OK);
    }
}
