use serde::{Deserialize, Serialize};

/// Salary unit extracted from the free-text salary label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalaryUnit {
    Hourly,
    Monthly,
    Yearly,
}

/// Remote-work arrangement classified from the offer description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteType {
    FullRemote,
    Hybrid,
    Occasional,
}

/// A competency or language requirement attached to an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub code: Option<String>,
    pub label: Option<String>,
    pub level: Option<String>,
}

/// A structured education requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationRequirement {
    pub domain: Option<String>,
    pub level: Option<String>,
    pub requirement: Option<String>,
}

/// Canonical, source-agnostic job-offer record.
///
/// Every field beyond `id`/`source` is optional: when the upstream source
/// provides no extractable value, the field stays `None`, never a
/// placeholder. Records are created once per raw payload during mapping and
/// never mutated; re-collection either skips the id or overwrites the stored
/// document wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    // Identification
    pub id: String,
    pub source: String,

    // Basic info
    pub title: Option<String>,
    pub description: Option<String>,
    pub company_name: Option<String>,

    // Classification
    pub rome_code: Option<String>,
    pub rome_label: Option<String>,
    pub job_category: Option<String>,
    pub naf_code: Option<String>,
    pub sector: Option<String>,
    pub sector_label: Option<String>,

    // Location
    pub location_city: Option<String>,
    pub location_department: Option<String>,
    pub location_region: Option<String>,
    pub location_latitude: Option<f64>,
    pub location_longitude: Option<f64>,
    pub location_commune_code: Option<String>,

    // Contract
    pub contract_type: Option<String>,
    pub contract_nature: Option<String>,
    pub work_schedule: Option<String>,
    pub weekly_hours: Option<f64>,
    pub is_alternance: Option<bool>,

    // Compensation
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_unit: Option<SalaryUnit>,
    pub salary_comment: Option<String>,
    pub salary_benefits: Option<Vec<String>>,

    // Skills
    pub skills: Option<Vec<String>>,
    pub skills_required: Option<Vec<Skill>>,
    pub skills_desired: Option<Vec<Skill>>,
    pub soft_skills: Option<Vec<String>>,
    pub languages: Option<Vec<Skill>>,

    // Education & experience
    pub education_level: Option<String>,
    pub education_required: Option<Vec<EducationRequirement>>,
    pub experience_required: Option<String>,
    pub experience_level: Option<String>,
    pub experience_code: Option<String>,

    // Company
    pub company_size: Option<String>,
    pub company_adapted: Option<bool>,

    // Work conditions
    pub work_context: Option<Vec<String>>,
    pub permits_required: Option<Vec<String>>,
    pub travel_frequency: Option<String>,
    pub accessible_handicap: Option<bool>,

    // Remote work
    pub is_remote: Option<bool>,
    pub remote_type: Option<RemoteType>,

    // Metadata
    pub published_at: Option<String>,
    pub updated_at: Option<String>,
    pub collected_at: Option<String>,
    pub positions_count: Option<i64>,
    pub qualification_code: Option<String>,
    pub qualification_label: Option<String>,
    pub url: Option<String>,
    pub raw: Option<serde_json::Value>,
}
