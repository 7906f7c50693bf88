//! Ad hoc analysis over a normalized JSONL file: data-job share,
//! technology demand by category, experience and remote-work distribution.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::models::offer::JobOffer;
use crate::reference;
use crate::storage::jsonl;

#[derive(Debug, Default, Serialize)]
pub struct AnalysisReport {
    pub offers: usize,
    /// Offers matching the data-job classifier (ROME code or title keyword).
    pub data_jobs: usize,
    pub remote_offers: usize,
    pub experience_levels: BTreeMap<String, usize>,
    /// category -> technology -> offer count.
    pub technologies: BTreeMap<String, BTreeMap<String, usize>>,
}

/// Analyze one normalized JSONL file. Records that do not deserialize as
/// canonical offers are skipped with a warning.
pub async fn analyze_file(path: &Path) -> Result<AnalysisReport, AppError> {
    let mut report = AnalysisReport::default();

    for record in jsonl::read_jsonl(path).await? {
        let offer: JobOffer = match serde_json::from_value(record) {
            Ok(offer) => offer,
            Err(e) => {
                tracing::warn!("{}: skipping non-canonical record: {e}", path.display());
                continue;
            }
        };
        report.offers += 1;

        if reference::is_data_job(offer.rome_code.as_deref(), offer.title.as_deref()) {
            report.data_jobs += 1;
        }
        if offer.is_remote == Some(true) {
            report.remote_offers += 1;
        }
        if let Some(level) = &offer.experience_level {
            *report.experience_levels.entry(level.clone()).or_default() += 1;
        }

        let mut skills = offer.skills_required.unwrap_or_default();
        skills.extend(offer.skills_desired.unwrap_or_default());
        for (category, techs) in reference::extract_technical_skills(&skills) {
            let bucket = report.technologies.entry(category.to_string()).or_default();
            for tech in techs {
                *bucket.entry(tech.to_string()).or_default() += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn aggregates_classifier_output_per_offer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offers.jsonl");
        let rows = vec![
            json!({
                "id": "francetravail:1",
                "source": "francetravail",
                "title": "Data Engineer",
                "rome_code": "M1811",
                "experience_level": "confirmé",
                "is_remote": true,
                "skills_required": [
                    {"code": null, "label": "Python", "level": "E"},
                    {"code": null, "label": "Apache Spark", "level": "E"}
                ]
            }),
            json!({
                "id": "francetravail:2",
                "source": "francetravail",
                "title": "Chauffeur livreur",
                "experience_level": "junior",
                "is_remote": false
            }),
            json!({"not": "an offer", "id": 12}),
        ];
        jsonl::append_jsonl(&path, &rows).await.unwrap();

        let report = analyze_file(&path).await.unwrap();
        assert_eq!(report.offers, 2);
        assert_eq!(report.data_jobs, 1);
        assert_eq!(report.remote_offers, 1);
        assert_eq!(report.experience_levels.get("confirmé"), Some(&1));
        assert_eq!(report.experience_levels.get("junior"), Some(&1));
        assert_eq!(
            report.technologies.get("languages").and_then(|t| t.get("python")),
            Some(&1)
        );
        assert_eq!(
            report
                .technologies
                .get("bigdata_cloud")
                .and_then(|t| t.get("spark")),
            Some(&1)
        );
    }
}
