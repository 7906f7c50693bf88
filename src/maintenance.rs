//! Ad hoc maintenance over collected JSONL files: per-file deduplication
//! and cross-file duplicate detection.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::AppError;
use crate::storage::jsonl;

const DEDUPLICATED_SUFFIX: &str = "_deduplicated";

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub total: usize,
    pub unique: usize,
    pub duplicates: usize,
    /// Records without an `id`, dropped with a warning.
    pub missing_id: usize,
}

/// An offer id seen in more than one file.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DuplicateEntry {
    pub id: String,
    pub files: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct CrossFileReport {
    pub files: usize,
    pub distinct_ids: usize,
    pub duplicated_ids: usize,
    pub entries: Vec<DuplicateEntry>,
}

/// Output path for a deduplicated file: `offers.jsonl` becomes
/// `offers_deduplicated.jsonl` next to the original.
pub fn deduplicated_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("offers");
    input.with_file_name(format!("{stem}{DEDUPLICATED_SUFFIX}.jsonl"))
}

/// Rewrite a JSONL file keeping the first record per id.
pub async fn deduplicate_file(input: &Path) -> Result<DedupStats, AppError> {
    let records = jsonl::read_jsonl(input).await?;

    let mut stats = DedupStats::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();
    for record in records {
        stats.total += 1;
        let Some(id) = record.get("id").and_then(|v| v.as_str()) else {
            stats.missing_id += 1;
            tracing::warn!("{}: record without id skipped", input.display());
            continue;
        };
        if seen.insert(id.to_string()) {
            unique.push(record);
        } else {
            stats.duplicates += 1;
        }
    }
    stats.unique = unique.len();

    let output = deduplicated_path(input);
    let mut buf = Vec::new();
    for record in &unique {
        serde_json::to_writer(&mut buf, record)?;
        buf.push(b'\n');
    }
    tokio::fs::write(&output, buf).await?;

    tracing::info!(
        "{}: {} records, {} unique, {} duplicates",
        input.display(),
        stats.total,
        stats.unique,
        stats.duplicates
    );
    Ok(stats)
}

/// Deduplicate every `*.jsonl` in a directory (already-deduplicated
/// outputs are left alone). Returns per-file stats by filename.
pub async fn deduplicate_directory(
    dir: &Path,
) -> Result<BTreeMap<String, DedupStats>, AppError> {
    let mut results = BTreeMap::new();
    for path in source_files(dir).await? {
        let name = file_name(&path);
        let stats = deduplicate_file(&path).await?;
        results.insert(name, stats);
    }
    Ok(results)
}

/// Find ids that appear in more than one file of a directory.
pub async fn find_cross_file_duplicates(dir: &Path) -> Result<CrossFileReport, AppError> {
    let mut id_files: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let files = source_files(dir).await?;
    let file_count = files.len();

    for path in files {
        let name = file_name(&path);
        // A file can itself repeat an id; count each file once per id.
        let mut ids_here: HashSet<String> = HashSet::new();
        for record in jsonl::read_jsonl(&path).await? {
            if let Some(id) = record.get("id").and_then(|v| v.as_str())
                && ids_here.insert(id.to_string())
            {
                id_files.entry(id.to_string()).or_default().push(name.clone());
            }
        }
    }

    let distinct_ids = id_files.len();
    let entries: Vec<DuplicateEntry> = id_files
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(id, files)| DuplicateEntry { id, files })
        .collect();

    Ok(CrossFileReport {
        files: file_count,
        distinct_ids,
        duplicated_ids: entries.len(),
        entries,
    })
}

/// JSONL files in a directory, sorted, excluding deduplicated outputs.
async fn source_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_jsonl = path.extension().is_some_and(|ext| ext == "jsonl");
        let is_dedup_output = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|stem| stem.ends_with(DEDUPLICATED_SUFFIX));
        if path.is_file() && is_jsonl && !is_dedup_output {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}
