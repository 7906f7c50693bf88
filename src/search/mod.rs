pub mod analytics;
pub mod client;
pub mod indexer;
pub mod offers;
pub mod query;
