//! Translate a [`FilterRequest`] into the engine's bool-query DSL.

use serde_json::{Value, json};

use crate::models::filters::FilterRequest;

/// Build the query clause for a filter set: `match_all` when nothing is
/// set, otherwise a `bool` query whose `must` clauses AND the filters
/// together. Keywords turn into a should-group matching title, description
/// or skills.
pub fn build_query(filters: &FilterRequest) -> Value {
    let mut must: Vec<Value> = Vec::new();

    if let Some(keywords) = &filters.keywords
        && !keywords.is_empty()
    {
        let mut should: Vec<Value> = Vec::new();
        for keyword in keywords {
            should.push(json!({ "match": { "title": keyword } }));
            should.push(json!({ "match": { "description": keyword } }));
            should.push(json!({ "match": { "skills": keyword } }));
        }
        must.push(json!({ "bool": { "should": should, "minimum_should_match": 1 } }));
    }

    push_terms(&mut must, "location_region", &filters.regions);
    push_terms(&mut must, "location_department", &filters.departments);
    push_terms(&mut must, "location_city", &filters.cities);
    push_terms(&mut must, "contract_type", &filters.contract_types);
    push_terms(&mut must, "experience_level", &filters.experience_levels);
    push_terms(&mut must, "rome_code", &filters.rome_codes);
    push_terms(&mut must, "skills", &filters.skills);

    if filters.salary_min.is_some() || filters.salary_max.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(min) = filters.salary_min {
            range.insert("gte".to_string(), json!(min));
        }
        if let Some(max) = filters.salary_max {
            range.insert("lte".to_string(), json!(max));
        }
        must.push(json!({ "range": { "salary_min": Value::Object(range) } }));
    }

    if let Some(is_remote) = filters.is_remote {
        must.push(json!({ "term": { "is_remote": is_remote } }));
    }
    if let Some(remote_types) = &filters.remote_types
        && !remote_types.is_empty()
    {
        must.push(json!({ "terms": { "remote_type": remote_types } }));
    }

    if filters.date_from.is_some() || filters.date_to.is_some() {
        let mut range = serde_json::Map::new();
        if let Some(from) = &filters.date_from {
            range.insert("gte".to_string(), json!(from));
        }
        if let Some(to) = &filters.date_to {
            range.insert("lte".to_string(), json!(to));
        }
        must.push(json!({ "range": { "published_at": Value::Object(range) } }));
    }

    if must.is_empty() {
        return json!({ "match_all": {} });
    }
    json!({ "bool": { "must": must } })
}

fn push_terms(must: &mut Vec<Value>, field: &str, values: &Option<Vec<String>>) {
    if let Some(values) = values
        && !values.is_empty()
    {
        must.push(json!({ "terms": { field: values } }));
    }
}
