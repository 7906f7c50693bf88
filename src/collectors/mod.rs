// Collector module: the upstream-source seam and the paginated collection
// loop that drives it.

pub mod francetravail;
pub mod runner;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AppError;

/// One page-sized window of an upstream search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferQuery {
    /// Inclusive offset window, rendered as the upstream `range` parameter
    /// `"start-end"`.
    pub range_start: usize,
    pub range_end: usize,
    pub keywords: Option<String>,
    pub rome_codes: Vec<String>,
    pub contract_type: Option<String>,
    pub experience: Option<String>,
}

/// A page of raw offer records as returned by the upstream source.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub offers: Vec<Value>,
}

/// Seam for the upstream employment API: given a windowed query, return
/// parsed raw records or fail. The collector loop only ever talks to this
/// trait, so tests drive it with a scripted in-memory source.
#[async_trait]
pub trait OfferApi: Send {
    async fn search(&mut self, query: &OfferQuery) -> Result<SearchPage, AppError>;
}
