//! Append-only newline-delimited JSON files.
//!
//! One record per line, UTF-8, no envelope. Writers only ever append; a
//! crash mid-run leaves previously appended lines intact and downstream
//! id-based dedup absorbs the partial batch.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;

/// Append rows to a JSONL file, creating parent directories as needed.
pub async fn append_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AppError> {
    if rows.is_empty() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut buf = Vec::new();
    for row in rows {
        serde_json::to_writer(&mut buf, row)?;
        buf.push(b'\n');
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(&buf).await?;
    file.flush().await?;
    Ok(())
}

/// Read every record from a JSONL file.
///
/// Empty lines are skipped; malformed lines are skipped with a warning so
/// one bad record does not poison a whole file.
pub async fn read_jsonl(path: &Path) -> Result<Vec<Value>, AppError> {
    let text = tokio::fs::read_to_string(path).await?;
    let mut records = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(value) => records.push(value),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed JSON at {}:{}: {e}",
                    path.display(),
                    line_no + 1
                );
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn append_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("offers.jsonl");

        let rows = vec![
            json!({"id": "francetravail:1", "salary_min": 2500.5, "title": "Ingénieur données"}),
            json!({"id": "francetravail:2", "title": "Développeur BI à Paris 11ᵉ"}),
        ];
        append_jsonl(&path, &rows).await.unwrap();
        append_jsonl(&path, &rows[..1]).await.unwrap();

        let read = read_jsonl(&path).await.unwrap();
        assert_eq!(read.len(), 3);
        assert_eq!(read[0], rows[0]);
        assert_eq!(read[1], rows[1]);
        assert_eq!(read[2], rows[0]);
        assert_eq!(read[0]["salary_min"].as_f64(), Some(2500.5));
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        tokio::fs::write(&path, "{\"id\": \"a\"}\nnot json\n\n{\"id\": \"b\"}\n")
            .await
            .unwrap();

        let read = read_jsonl(&path).await.unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read[0]["id"], "a");
        assert_eq!(read[1]["id"], "b");
    }

    #[tokio::test]
    async fn canonical_records_survive_the_file_round_trip() {
        use crate::collectors::francetravail::mapper::map_offer;
        use crate::models::offer::JobOffer;
        use chrono::TimeZone;

        let raw = json!({
            "id": "193XKWB",
            "intitule": "Ingénieur données (H/F)",
            "lieuTravail": {"libelle": "75 - PARIS 11", "latitude": 48.8632, "longitude": 2.3708},
            "salaire": {"libelle": "Mensuel de 2500.50 Euros"}
        });
        let collected_at = chrono::Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let offer = map_offer(&raw, collected_at, true);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offers.jsonl");
        append_jsonl(&path, std::slice::from_ref(&offer)).await.unwrap();

        let read = read_jsonl(&path).await.unwrap();
        assert_eq!(read.len(), 1);
        let round_tripped: JobOffer = serde_json::from_value(read[0].clone()).unwrap();
        assert_eq!(round_tripped, offer);
        assert_eq!(round_tripped.salary_min, Some(2500.5));
        assert_eq!(round_tripped.location_city.as_deref(), Some("75 - Paris 11"));
    }

    #[tokio::test]
    async fn empty_row_slice_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("untouched.jsonl");
        append_jsonl::<Value>(&path, &[]).await.unwrap();
        assert!(!path.exists());
    }
}
