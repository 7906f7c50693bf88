//! France Travail API client: OAuth2 client-credentials token exchange and
//! range-paginated offer search.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::collectors::{OfferApi, OfferQuery, SearchPage};
use crate::error::AppError;

const REQUEST_TIMEOUT_SECS: u64 = 60;
/// Refresh the token this many seconds before it actually expires.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 30;
/// Never cache a token for less than this, whatever the upstream TTL says.
const TOKEN_MIN_TTL_SECS: i64 = 60;
const DEFAULT_TOKEN_TTL_SECS: f64 = 3600.0;

/// Connection settings for the France Travail API.
#[derive(Debug, Clone)]
pub struct FranceTravailConfig {
    pub token_url: String,
    pub search_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<f64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// HTTP client for the France Travail offer search API.
///
/// The bearer token is cached in memory and refreshed shortly before
/// expiry. The collector loop is sequential, so the cache is plain mutable
/// state behind `&mut self`.
pub struct FranceTravailClient {
    http: reqwest::Client,
    config: FranceTravailConfig,
    token: Option<CachedToken>,
}

impl FranceTravailClient {
    pub fn new(config: FranceTravailConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            config,
            token: None,
        })
    }

    /// Return a valid bearer token, fetching a fresh one when the cached
    /// token is absent or about to expire. Any failure here is fatal to a
    /// collection run: without a token no further request can be
    /// authorized.
    async fn token(&mut self) -> Result<String, AppError> {
        let now = Utc::now();
        if let Some(cached) = &self.token
            && now < cached.expires_at
        {
            return Ok(cached.access_token.clone());
        }

        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        if let Some(scope) = &self.config.scope {
            form.push(("scope", scope.as_str()));
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Auth(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("malformed token response: {e}")))?;

        let access_token = payload
            .access_token
            .ok_or_else(|| AppError::Auth("access_token missing in response".to_string()))?;
        let expires_at = token_expiry(now, payload.expires_in);

        tracing::debug!("Fetched new access token, valid until {expires_at}");
        self.token = Some(CachedToken {
            access_token: access_token.clone(),
            expires_at,
        });
        Ok(access_token)
    }
}

#[async_trait]
impl OfferApi for FranceTravailClient {
    async fn search(&mut self, query: &OfferQuery) -> Result<SearchPage, AppError> {
        let token = self.token().await?;
        let params = build_search_params(query);

        let response = self
            .http
            .get(&self.config.search_url)
            .bearer_auth(&token)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        // 204: the window is past the last result, an empty page by contract.
        if status.as_u16() == 204 {
            return Ok(SearchPage::default());
        }
        if !status.is_success() {
            return Err(AppError::Search(format!(
                "offer search returned {status}"
            )));
        }

        if let Some(content_range) = response
            .headers()
            .get("Content-Range")
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!("Content-Range: {content_range}");
        }

        let payload: Value = response.json().await?;
        if let Some(max_results) = payload.get("maxResults") {
            tracing::debug!("Server maxResults: {max_results}");
        }
        if let Some(aggregates) = payload.get("filtresPossibles").and_then(|v| v.as_array()) {
            tracing::debug!("Server returned {} aggregate filter groups", aggregates.len());
        }

        let offers = payload
            .get("resultats")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(SearchPage { offers })
    }
}

/// Expiry instant for a freshly fetched token: the upstream TTL minus the
/// refresh margin, floored so a tiny TTL does not cause refresh loops.
fn token_expiry(now: DateTime<Utc>, expires_in: Option<f64>) -> DateTime<Utc> {
    let ttl = expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS) as i64;
    let effective = (ttl - TOKEN_REFRESH_MARGIN_SECS).max(TOKEN_MIN_TTL_SECS);
    now + chrono::Duration::seconds(effective)
}

/// Render a windowed query as upstream query parameters.
fn build_search_params(query: &OfferQuery) -> Vec<(String, String)> {
    let mut params = vec![(
        "range".to_string(),
        format!("{}-{}", query.range_start, query.range_end),
    )];
    if let Some(keywords) = &query.keywords {
        params.push(("motsCles".to_string(), keywords.clone()));
    }
    if !query.rome_codes.is_empty() {
        params.push(("codeROME".to_string(), query.rome_codes.join(",")));
    }
    if let Some(contract_type) = &query.contract_type {
        params.push(("typeContrat".to_string(), contract_type.clone()));
    }
    if let Some(experience) = &query.experience {
        params.push(("experience".to_string(), experience.clone()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn token_expiry_applies_refresh_margin() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let expiry = token_expiry(now, Some(1500.0));
        assert_eq!(expiry, now + chrono::Duration::seconds(1470));
    }

    #[test]
    fn token_expiry_floors_tiny_ttls() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let expiry = token_expiry(now, Some(10.0));
        assert_eq!(expiry, now + chrono::Duration::seconds(60));
    }

    #[test]
    fn token_expiry_defaults_when_ttl_missing() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let expiry = token_expiry(now, None);
        assert_eq!(expiry, now + chrono::Duration::seconds(3570));
    }

    #[test]
    fn search_params_render_the_full_filter_set() {
        let query = OfferQuery {
            range_start: 150,
            range_end: 299,
            keywords: Some("data engineer".to_string()),
            rome_codes: vec!["M1811".to_string(), "M1405".to_string()],
            contract_type: Some("CDI".to_string()),
            experience: Some("2".to_string()),
        };
        let params = build_search_params(&query);
        assert_eq!(
            params,
            vec![
                ("range".to_string(), "150-299".to_string()),
                ("motsCles".to_string(), "data engineer".to_string()),
                ("codeROME".to_string(), "M1811,M1405".to_string()),
                ("typeContrat".to_string(), "CDI".to_string()),
                ("experience".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn search_params_omit_absent_filters() {
        let query = OfferQuery {
            range_start: 0,
            range_end: 149,
            ..Default::default()
        };
        let params = build_search_params(&query);
        assert_eq!(params, vec![("range".to_string(), "0-149".to_string())]);
    }
}
