//! Thin HTTP client for the search/aggregation engine.
//!
//! The engine owns indexing, querying, and aggregation; this wrapper only
//! shapes query-DSL bodies and parses responses. Constructed once at
//! startup and passed by reference (no ambient singleton).

use std::time::Duration;

use serde_json::{Value, json};

use crate::error::AppError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IndexReport {
    pub indexed: usize,
    pub errors: usize,
    /// Records lacking an `id` field, which cannot be upserted.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    base_url: String,
    index: String,
}

impl SearchClient {
    pub fn new(base_url: &str, index: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{suffix}", self.base_url, self.index)
    }

    /// True when the engine answers at all.
    pub async fn ping(&self) -> bool {
        match self.http.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Create the offer index with its field mapping. Returns false when
    /// the index already exists and `force` is not set; with `force` the
    /// existing index is deleted first.
    pub async fn create_index(&self, force: bool) -> Result<bool, AppError> {
        let exists = self
            .http
            .head(self.url(""))
            .send()
            .await?
            .status()
            .is_success();

        if exists {
            if !force {
                tracing::info!("Index '{}' already exists", self.index);
                return Ok(false);
            }
            tracing::warn!("Deleting existing index '{}'", self.index);
            let response = self.http.delete(self.url("")).send().await?;
            if !response.status().is_success() {
                return Err(AppError::Search(format!(
                    "index deletion returned {}",
                    response.status()
                )));
            }
        }

        let response = self
            .http
            .put(self.url(""))
            .json(&index_mapping())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Search(format!(
                "index creation returned {}",
                response.status()
            )));
        }
        tracing::info!("Index '{}' created", self.index);
        Ok(true)
    }

    /// Upsert a batch of canonical records by id via the bulk endpoint.
    pub async fn bulk_index(&self, offers: &[Value]) -> Result<IndexReport, AppError> {
        let (body, skipped) = build_bulk_body(offers);
        if body.is_empty() {
            return Ok(IndexReport {
                skipped,
                ..Default::default()
            });
        }

        let response = self
            .http
            .post(self.url("/_bulk"))
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Search(format!(
                "bulk indexing returned {}",
                response.status()
            )));
        }

        let payload: Value = response.json().await?;
        let mut report = parse_bulk_response(&payload);
        report.skipped = skipped;
        Ok(report)
    }

    /// Fetch one document by id; `None` when the engine does not have it.
    pub async fn get(&self, id: &str) -> Result<Option<Value>, AppError> {
        let response = self
            .http
            .get(self.url(&format!("/_doc/{id}")))
            .send()
            .await?;
        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::Search(format!(
                "document fetch returned {}",
                response.status()
            )));
        }
        let payload: Value = response.json().await?;
        Ok(payload.get("_source").cloned())
    }

    /// Count documents matching a query-DSL query.
    pub async fn count(&self, query: &Value) -> Result<u64, AppError> {
        let response = self
            .http
            .post(self.url("/_count"))
            .json(&json!({ "query": query }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Search(format!(
                "count returned {}",
                response.status()
            )));
        }
        let payload: Value = response.json().await?;
        Ok(payload.get("count").and_then(|v| v.as_u64()).unwrap_or(0))
    }

    /// Run a raw search body (query + pagination + sort and/or aggs).
    pub async fn search(&self, body: &Value) -> Result<Value, AppError> {
        let response = self
            .http
            .post(self.url("/_search"))
            .json(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AppError::Search(format!(
                "search returned {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}

/// Assemble the ndjson bulk body, skipping records without an id.
fn build_bulk_body(offers: &[Value]) -> (String, usize) {
    let mut body = String::new();
    let mut skipped = 0usize;
    for offer in offers {
        let Some(id) = offer.get("id").and_then(|v| v.as_str()) else {
            skipped += 1;
            continue;
        };
        let doc = prepare_document(offer);
        body.push_str(&json!({ "index": { "_id": id } }).to_string());
        body.push('\n');
        body.push_str(&doc.to_string());
        body.push('\n');
    }
    (body, skipped)
}

fn parse_bulk_response(payload: &Value) -> IndexReport {
    let items = payload
        .get("items")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    let mut report = IndexReport::default();
    for item in &items {
        let entry = item.get("index").unwrap_or(item);
        if entry.get("error").is_some() {
            report.errors += 1;
            if let Some(reason) = entry.pointer("/error/reason").and_then(|v| v.as_str()) {
                tracing::warn!(
                    "Indexing error for {}: {reason}",
                    entry.get("_id").and_then(|v| v.as_str()).unwrap_or("?")
                );
            }
        } else {
            report.indexed += 1;
        }
    }
    report
}

/// Shape a canonical record for indexing: fold lat/lon into a geo_point
/// and null out date strings the engine would reject.
pub fn prepare_document(offer: &Value) -> Value {
    let mut doc = offer.clone();
    let Some(obj) = doc.as_object_mut() else {
        return doc;
    };

    let lat = obj.get("location_latitude").and_then(|v| v.as_f64());
    let lon = obj.get("location_longitude").and_then(|v| v.as_f64());
    if let (Some(lat), Some(lon)) = (lat, lon) {
        obj.insert(
            "location_coordinates".to_string(),
            json!({ "lat": lat, "lon": lon }),
        );
        obj.remove("location_latitude");
        obj.remove("location_longitude");
    }

    for field in ["published_at", "updated_at", "collected_at"] {
        let invalid = obj
            .get(field)
            .and_then(|v| v.as_str())
            .is_some_and(|text| chrono::DateTime::parse_from_rfc3339(text).is_err());
        if invalid {
            obj.insert(field.to_string(), Value::Null);
        }
    }

    doc
}

/// Index settings and field mapping for the offer index: keyword fields
/// for aggregation, french-analyzed text for search, geo_point for the
/// folded coordinates, raw payload stored but not indexed.
pub fn index_mapping() -> Value {
    let french_text = json!({
        "type": "text",
        "analyzer": "french_analyzer",
        "fields": { "keyword": { "type": "keyword" } }
    });
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0,
            "analysis": {
                "analyzer": {
                    "french_analyzer": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "french_elision", "french_stop", "french_stemmer"]
                    }
                },
                "filter": {
                    "french_elision": {
                        "type": "elision",
                        "articles_case": true,
                        "articles": ["l", "m", "t", "qu", "n", "s", "j", "d", "c", "jusqu", "quoiqu", "lorsqu", "puisqu"]
                    },
                    "french_stop": { "type": "stop", "stopwords": "_french_" },
                    "french_stemmer": { "type": "stemmer", "language": "light_french" }
                }
            }
        },
        "mappings": {
            "properties": {
                "id": { "type": "keyword" },
                "source": { "type": "keyword" },
                "title": french_text,
                "description": { "type": "text", "analyzer": "french_analyzer" },
                "company_name": french_text,
                "rome_code": { "type": "keyword" },
                "rome_label": french_text,
                "job_category": { "type": "keyword" },
                "naf_code": { "type": "keyword" },
                "sector": { "type": "keyword" },
                "sector_label": french_text,
                "location_city": { "type": "keyword" },
                "location_department": { "type": "keyword" },
                "location_region": { "type": "keyword" },
                "location_coordinates": { "type": "geo_point" },
                "location_commune_code": { "type": "keyword" },
                "contract_type": { "type": "keyword" },
                "contract_nature": { "type": "keyword" },
                "work_schedule": { "type": "keyword" },
                "weekly_hours": { "type": "float" },
                "is_alternance": { "type": "boolean" },
                "salary_min": { "type": "float" },
                "salary_max": { "type": "float" },
                "salary_unit": { "type": "keyword" },
                "salary_comment": { "type": "text", "analyzer": "french_analyzer" },
                "salary_benefits": { "type": "keyword" },
                "skills": { "type": "keyword" },
                "skills_required": { "type": "nested" },
                "skills_desired": { "type": "nested" },
                "soft_skills": { "type": "keyword" },
                "languages": { "type": "nested" },
                "education_level": { "type": "keyword" },
                "education_required": { "type": "nested" },
                "experience_required": { "type": "keyword" },
                "experience_level": { "type": "keyword" },
                "experience_code": { "type": "keyword" },
                "company_size": { "type": "keyword" },
                "company_adapted": { "type": "boolean" },
                "work_context": { "type": "keyword" },
                "permits_required": { "type": "keyword" },
                "travel_frequency": { "type": "keyword" },
                "accessible_handicap": { "type": "boolean" },
                "is_remote": { "type": "boolean" },
                "remote_type": { "type": "keyword" },
                "published_at": { "type": "date" },
                "updated_at": { "type": "date" },
                "collected_at": { "type": "date" },
                "positions_count": { "type": "integer" },
                "qualification_code": { "type": "keyword" },
                "qualification_label": french_text,
                "url": { "type": "keyword" },
                "raw": { "type": "object", "enabled": false }
            }
        }
    })
}
