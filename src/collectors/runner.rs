//! Paginated collection loop for the upstream offer source.
//!
//! Drives range-windowed search requests, deduplicates by native id across
//! the whole run, enforces the caller's record limit, and appends each
//! surviving batch to the raw and normalized JSONL sinks. Persistence is
//! append-only with at-least-once semantics; id-based dedup downstream is
//! the correctness backstop.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;

use crate::collectors::francetravail::mapper;
use crate::collectors::{OfferApi, OfferQuery};
use crate::error::AppError;
use crate::storage::jsonl;

/// Upstream maximum page size; the offset window advances by this width.
pub const PAGE_SIZE: usize = 150;
/// The upstream rejects offsets at or beyond this ceiling. Past it the
/// filter space must be subdivided, not the offset.
pub const MAX_OFFSET: usize = 1150;
/// Page size used in sample mode (one request, a handful of records).
pub const SAMPLE_PAGE_SIZE: usize = 10;

/// Contract-type codes enumerated in split mode.
const SPLIT_CONTRACT_TYPES: &[&str] = &["CDI", "CDD", "MIS", "CCE", "LIB"];
/// Experience codes enumerated in split mode.
const SPLIT_EXPERIENCE_CODES: &[&str] = &["0", "1", "2", "3", "4"];

#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    pub keywords: Option<String>,
    pub rome_codes: Vec<String>,
    /// Overall record cap; reaching it stops the whole run, truncating the
    /// current batch so exactly `limit` records are persisted.
    pub limit: Option<usize>,
    /// Enumerate contract-type x experience filter combinations to work
    /// around the per-query result ceiling.
    pub split_by_contract: bool,
    /// Single small page, for quick inspection.
    pub sample: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub collected: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub raw: PathBuf,
    pub normalized: PathBuf,
}

/// Derive the sink filename from the active filters.
pub fn output_filename(options: &CollectOptions) -> String {
    if let Some(keywords) = &options.keywords {
        let slug: String = keywords
            .replace([' ', ','], "_")
            .chars()
            .take(50)
            .collect();
        return format!("offers_kw_{slug}.jsonl");
    }
    if !options.rome_codes.is_empty() {
        return format!("offers_rome_{}.jsonl", options.rome_codes.join("_"));
    }
    if options.sample {
        return "offers_sample.jsonl".to_string();
    }
    "offers.jsonl".to_string()
}

/// Sink locations for a run: raw and normalized streams side by side under
/// the output directory, keyed by the filter-derived filename.
pub fn output_paths(out_dir: &Path, options: &CollectOptions) -> OutputPaths {
    let filename = output_filename(options);
    OutputPaths {
        raw: out_dir.join("raw").join(mapper::SOURCE).join(&filename),
        normalized: out_dir
            .join("normalized")
            .join(mapper::SOURCE)
            .join(&filename),
    }
}

/// The filter combinations a run iterates: the contract x experience
/// cross-product (plus contract-only passes) in split mode, a single
/// unfiltered pass otherwise.
fn filter_combinations(options: &CollectOptions) -> Vec<(Option<String>, Option<String>)> {
    if !options.split_by_contract {
        return vec![(None, None)];
    }
    let mut combinations = Vec::new();
    for contract in SPLIT_CONTRACT_TYPES {
        for experience in SPLIT_EXPERIENCE_CODES {
            combinations.push((Some(contract.to_string()), Some(experience.to_string())));
        }
    }
    // Contract-only passes catch offers carrying no experience criterion.
    for contract in SPLIT_CONTRACT_TYPES {
        combinations.push((Some(contract.to_string()), None));
    }
    combinations
}

/// Run a full collection against the upstream source.
///
/// A request failure on one filter combination abandons that combination
/// and moves on; a token-acquisition failure aborts the run, since no
/// further request can be authorized.
pub async fn collect(
    api: &mut impl OfferApi,
    options: &CollectOptions,
    out_dir: &Path,
) -> Result<CollectReport, AppError> {
    let paths = output_paths(out_dir, options);
    let page_size = if options.sample { SAMPLE_PAGE_SIZE } else { PAGE_SIZE };

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut report = CollectReport::default();

    tracing::info!(
        keywords = options.keywords.as_deref(),
        rome_codes = ?options.rome_codes,
        limit = options.limit,
        split = options.split_by_contract,
        sample = options.sample,
        "Starting collection into {}",
        paths.normalized.display()
    );

    for (contract_type, experience) in filter_combinations(options) {
        if options.split_by_contract {
            tracing::info!(
                contract = contract_type.as_deref(),
                experience = experience.as_deref(),
                "Collecting filter combination"
            );
        }

        let mut range_start = 0usize;
        loop {
            if options.sample && range_start > 0 {
                break;
            }
            if range_start >= MAX_OFFSET {
                tracing::warn!(
                    "Offset ceiling ({MAX_OFFSET}) reached; subdivide the filter space to go further"
                );
                break;
            }

            let query = OfferQuery {
                range_start,
                range_end: (range_start + page_size - 1).min(MAX_OFFSET - 1),
                keywords: options.keywords.clone(),
                rome_codes: options.rome_codes.clone(),
                contract_type: contract_type.clone(),
                experience: experience.clone(),
            };

            let page = match api.search(&query).await {
                Ok(page) => page,
                Err(AppError::Auth(msg)) => {
                    // Unauthorized means every further request would fail too.
                    return Err(AppError::Auth(msg));
                }
                Err(e) => {
                    tracing::warn!(
                        contract = contract_type.as_deref(),
                        experience = experience.as_deref(),
                        "Upstream error, abandoning combination: {e}"
                    );
                    break;
                }
            };

            if page.offers.is_empty() {
                tracing::info!(
                    "Range {}-{}: no offers, combination exhausted",
                    query.range_start,
                    query.range_end
                );
                break;
            }

            let mut new_offers: Vec<Value> = Vec::new();
            let mut batch_duplicates = 0usize;
            for offer in page.offers {
                match offer.get("id").and_then(|v| v.as_str()) {
                    Some(id) if !seen_ids.contains(id) => {
                        seen_ids.insert(id.to_string());
                        new_offers.push(offer);
                    }
                    _ => batch_duplicates += 1,
                }
            }
            report.duplicates += batch_duplicates;

            if new_offers.is_empty() {
                tracing::info!(
                    "Range {}-{}: every offer already seen, combination wrapped around",
                    query.range_start,
                    query.range_end
                );
                break;
            }

            let mut limit_reached = false;
            if let Some(limit) = options.limit
                && report.collected + new_offers.len() >= limit
            {
                new_offers.truncate(limit - report.collected);
                limit_reached = true;
            }

            tracing::info!(
                "Range {}-{}: {} new offers ({batch_duplicates} duplicates skipped)",
                query.range_start,
                query.range_end,
                new_offers.len()
            );

            jsonl::append_jsonl(&paths.raw, &new_offers).await?;
            let collected_at = Utc::now();
            let normalized: Vec<_> = new_offers
                .iter()
                .map(|raw| mapper::map_offer(raw, collected_at, false))
                .collect();
            jsonl::append_jsonl(&paths.normalized, &normalized).await?;

            report.collected += new_offers.len();

            if limit_reached {
                tracing::info!("Limit reached: {} offers collected", report.collected);
                return Ok(report);
            }

            range_start += page_size;
        }
    }

    tracing::info!(
        "Collection finished: {} offers, {} duplicates skipped",
        report.collected,
        report.duplicates
    );
    Ok(report)
}
