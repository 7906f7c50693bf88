#![recursion_limit = "256"]

mod analysis;
mod collectors;
mod config;
mod error;
mod maintenance;
mod models;
mod reference;
mod routes;
mod search;
mod storage;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::collectors::francetravail::client::{FranceTravailClient, FranceTravailConfig};
use crate::collectors::runner::{self, CollectOptions};
use crate::config::{Command, Config};
use crate::search::client::SearchClient;
use crate::search::indexer;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(search: SearchClient) -> impl IntoResponse {
    if search.ping().await {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobmarket=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();
    let search = SearchClient::new(&config.es_url, &config.es_index)?;

    match config.resolved_command() {
        Command::Serve { listen_addr } => serve(search, &listen_addr).await,
        Command::Collect {
            keywords,
            rome_codes,
            limit,
            sample,
            split_by_contract,
            output_dir,
            token_url,
            search_url,
            client_id,
            client_secret,
            scope,
        } => {
            let mut api = FranceTravailClient::new(FranceTravailConfig {
                token_url,
                search_url,
                client_id,
                client_secret,
                scope,
            })?;
            let options = CollectOptions {
                keywords,
                rome_codes,
                limit,
                sample,
                split_by_contract,
            };
            let report = runner::collect(&mut api, &options, &output_dir).await?;
            tracing::info!(
                "Done: {} offers collected, {} duplicates skipped",
                report.collected,
                report.duplicates
            );
            Ok(())
        }
        Command::Index {
            file,
            force,
            output_dir,
        } => {
            search.create_index(force).await?;
            let summary =
                indexer::index_normalized_files(&search, &output_dir, file.as_deref()).await?;
            tracing::info!(
                "Done: {} files, {} records indexed, {} errors, {} skipped",
                summary.files,
                summary.indexed,
                summary.errors,
                summary.skipped
            );
            Ok(())
        }
        Command::Dedup { path } => {
            if path.is_dir() {
                let results = maintenance::deduplicate_directory(&path).await?;
                for (file, stats) in &results {
                    tracing::info!(
                        "{file}: {} unique, {} duplicates removed",
                        stats.unique,
                        stats.duplicates
                    );
                }
            } else {
                maintenance::deduplicate_file(&path).await?;
            }
            Ok(())
        }
        Command::Duplicates { dir } => {
            let report = maintenance::find_cross_file_duplicates(&dir).await?;
            tracing::info!(
                "{} files scanned, {} distinct ids, {} present in more than one file",
                report.files,
                report.distinct_ids,
                report.duplicated_ids
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Analyze { file } => {
            let report = analysis::analyze_file(&file).await?;
            tracing::info!(
                "{}: {} offers, {} data jobs, {} with remote work",
                file.display(),
                report.offers,
                report.data_jobs,
                report.remote_offers
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn serve(search: SearchClient, listen_addr: &str) -> anyhow::Result<()> {
    let readyz_search = search.clone();
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(move || readyz(readyz_search.clone())))
        .merge(routes::api::router(search))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!("Listening on {listen_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
