//! Push normalized JSONL files into the search engine.

use std::path::{Path, PathBuf};

use crate::collectors::francetravail::mapper;
use crate::error::AppError;
use crate::search::client::SearchClient;
use crate::storage::jsonl;

/// Bulk-request batch size.
pub const INDEX_BATCH_SIZE: usize = 500;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub files: usize,
    pub indexed: usize,
    pub errors: usize,
    pub skipped: usize,
}

/// Index one named normalized file, or every `*.jsonl` under the
/// normalized source directory when `file` is `None`.
pub async fn index_normalized_files(
    client: &SearchClient,
    data_dir: &Path,
    file: Option<&str>,
) -> Result<IndexSummary, AppError> {
    let dir = data_dir.join("normalized").join(mapper::SOURCE);
    let files = match file {
        Some(name) => {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(AppError::NotFound(format!(
                    "normalized file {} does not exist",
                    path.display()
                )));
            }
            vec![path]
        }
        None => list_jsonl_files(&dir).await?,
    };

    if files.is_empty() {
        tracing::warn!("No normalized files found under {}", dir.display());
        return Ok(IndexSummary::default());
    }

    let mut summary = IndexSummary::default();
    for path in files {
        let records = jsonl::read_jsonl(&path).await?;
        let mut file_indexed = 0usize;
        for batch in records.chunks(INDEX_BATCH_SIZE) {
            let report = client.bulk_index(batch).await?;
            file_indexed += report.indexed;
            summary.indexed += report.indexed;
            summary.errors += report.errors;
            summary.skipped += report.skipped;
        }
        summary.files += 1;
        tracing::info!(
            "{}: {file_indexed}/{} records indexed",
            path.display(),
            records.len()
        );
    }
    Ok(summary)
}

/// Every `*.jsonl` directly in a directory, sorted by name.
async fn list_jsonl_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_only_jsonl_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jsonl", "a.jsonl", "notes.txt"] {
            tokio::fs::write(dir.path().join(name), "").await.unwrap();
        }
        tokio::fs::create_dir(dir.path().join("old.jsonl")).await.unwrap();

        let files = list_jsonl_files(dir.path()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["a.jsonl", "b.jsonl"]);
    }

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_jsonl_files(&dir.path().join("absent")).await.unwrap();
        assert!(files.is_empty());
    }
}
