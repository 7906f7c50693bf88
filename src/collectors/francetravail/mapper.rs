//! Raw France Travail payload -> canonical [`JobOffer`].
//!
//! The mapper is a pure, total function: no I/O, no clock, and no failure
//! path. A missing or malformed field degrades that single field to `None`;
//! nothing an upstream payload contains can make mapping a record fail.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::models::offer::{EducationRequirement, JobOffer, RemoteType, SalaryUnit, Skill};
use crate::reference;

pub const SOURCE: &str = "francetravail";

/// Requirement tag on competencies: exigée (required).
const REQUIREMENT_REQUIRED: &str = "E";
/// Requirement tag on competencies: souhaitée (desired).
const REQUIREMENT_DESIRED: &str = "S";

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());

/// Leading decimal before the hour marker, e.g. "35H/semaine" or "37H30".
static WEEKLY_HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)\s*[Hh]").unwrap());

/// Trailing "sur N mois" clause in salary labels ("Annuel de 45000,00 Euros
/// sur 12,00 mois"); stripped so the month count is not read as a bound.
static MONTHS_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+sur\s+[\d.,\s]+mois.*$").unwrap());

/// Map one raw source record to the canonical offer.
///
/// `collected_at` is injected by the caller so mapping stays deterministic:
/// the same raw record and timestamp always produce the same canonical
/// record. `include_raw` controls whether the full original payload is
/// embedded; callers that persist the raw payload separately pass `false`.
pub fn map_offer(raw: &Value, collected_at: DateTime<Utc>, include_raw: bool) -> JobOffer {
    let native_id = get_str(raw, "id")
        .or_else(|| get_str(raw, "id_offre"))
        .unwrap_or_else(|| "unknown".to_string());

    let description = get_str(raw, "description");
    let (is_remote, remote_type) = detect_remote(description.as_deref());

    let (salary_unit, salary_min, salary_max) = get_str(raw, "salaire.libelle")
        .map(|label| parse_salary_label(&label))
        .unwrap_or((None, None, None));

    let skills_required = extract_skills(raw, Some(REQUIREMENT_REQUIRED));
    let skills_desired = extract_skills(raw, Some(REQUIREMENT_DESIRED));
    let all_skills = extract_skills(raw, None);

    let location_department = get_str(raw, "lieuTravail.codePostal")
        .and_then(|code| reference::department_from_postal_code(&code));
    let location_region = location_department
        .as_deref()
        .and_then(reference::region_for_department)
        .map(String::from);

    JobOffer {
        id: format!("{SOURCE}:{native_id}"),
        source: SOURCE.to_string(),

        title: get_str(raw, "intitule").or_else(|| get_str(raw, "title")),
        description,
        company_name: get_str(raw, "entreprise.nom"),

        rome_code: get_str(raw, "romeCode"),
        rome_label: get_str(raw, "romeLibelle"),
        job_category: get_str(raw, "appellationlibelle"),
        naf_code: get_str(raw, "codeNAF"),
        sector: get_str(raw, "secteurActivite"),
        sector_label: get_str(raw, "secteurActiviteLibelle"),

        location_city: get_str(raw, "lieuTravail.libelle")
            .or_else(|| get_str(raw, "lieu"))
            .map(|label| normalize_city(&label)),
        location_department,
        location_region,
        location_latitude: get_f64(raw, "lieuTravail.latitude"),
        location_longitude: get_f64(raw, "lieuTravail.longitude"),
        location_commune_code: get_str(raw, "lieuTravail.commune"),

        contract_type: get_str(raw, "typeContratLibelle")
            .or_else(|| get_str(raw, "typeContrat")),
        contract_nature: get_str(raw, "natureContrat"),
        work_schedule: get_str(raw, "dureeTravailLibelleConverti"),
        weekly_hours: get_str(raw, "dureeTravailLibelle")
            .and_then(|label| parse_weekly_hours(&label)),
        is_alternance: get_bool(raw, "alternance"),

        salary_min,
        salary_max,
        salary_unit,
        salary_comment: get_str(raw, "salaire.commentaire"),
        salary_benefits: extract_benefits(raw),

        skills: non_empty(
            all_skills
                .iter()
                .filter_map(|s| s.label.clone())
                .collect::<Vec<_>>(),
        ),
        skills_required: non_empty(skills_required),
        skills_desired: non_empty(skills_desired),
        soft_skills: non_empty(extract_labels(raw, "qualitesProfessionnelles")),
        languages: non_empty(extract_languages(raw)),

        education_level: get_array(raw, "formations")
            .and_then(|entries| entries.first())
            .and_then(|entry| get_str(entry, "niveauLibelle")),
        education_required: non_empty(extract_education(raw)),
        experience_required: get_str(raw, "experienceLibelle"),
        experience_level: get_str(raw, "experienceLibelle")
            .map(|text| reference::classify_experience_level(&text).to_string()),
        experience_code: get_str(raw, "experienceExige"),

        company_size: get_str(raw, "entreprise.trancheEffectifEtab"),
        company_adapted: get_bool(raw, "entreprise.entrepriseAdaptee"),

        work_context: non_empty(extract_work_context(raw)),
        permits_required: non_empty(extract_labels(raw, "permis")),
        travel_frequency: get_str(raw, "deplacementLibelle"),
        accessible_handicap: get_bool(raw, "accessibleTH"),

        is_remote,
        remote_type,

        published_at: get_str(raw, "dateCreation").or_else(|| get_str(raw, "datePublication")),
        updated_at: get_str(raw, "dateActualisation"),
        collected_at: Some(collected_at.to_rfc3339()),
        positions_count: get_i64(raw, "nombrePostes"),
        qualification_code: get_str(raw, "qualificationCode"),
        qualification_label: get_str(raw, "qualificationLibelle"),
        url: get_str(raw, "origineOffre.urlOrigine"),
        raw: include_raw.then(|| raw.clone()),
    }
}

/// Walk a dotted path through nested objects; any intermediate non-object
/// short-circuits to `None`.
fn get_nested<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = raw;
    for key in path.split('.') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

fn get_str(raw: &Value, path: &str) -> Option<String> {
    get_nested(raw, path)?.as_str().map(String::from)
}

fn get_f64(raw: &Value, path: &str) -> Option<f64> {
    let value = get_nested(raw, path)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn get_i64(raw: &Value, path: &str) -> Option<i64> {
    get_nested(raw, path)?.as_i64()
}

fn get_bool(raw: &Value, path: &str) -> Option<bool> {
    get_nested(raw, path)?.as_bool()
}

fn get_array<'a>(raw: &'a Value, path: &str) -> Option<&'a Vec<Value>> {
    get_nested(raw, path)?.as_array()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

/// Parse a free-text salary label into (unit, min, max).
///
/// The unit comes from a case-insensitive keyword match; the bounds are the
/// first one or two decimals in the label, assigned positionally. A label
/// with no parseable number keeps both bounds `None` (the unit may still be
/// set).
fn parse_salary_label(label: &str) -> (Option<SalaryUnit>, Option<f64>, Option<f64>) {
    let lower = label.to_lowercase();
    let unit = if lower.contains("horaire") {
        Some(SalaryUnit::Hourly)
    } else if lower.contains("mensuel") {
        Some(SalaryUnit::Monthly)
    } else if lower.contains("annuel") {
        Some(SalaryUnit::Yearly)
    } else {
        None
    };

    let amounts_text = MONTHS_CLAUSE_RE.replace(label, "");
    let mut amounts = DECIMAL_RE
        .find_iter(&amounts_text)
        .filter_map(|m| m.as_str().replace(',', ".").parse::<f64>().ok());

    let min = amounts.next();
    let max = amounts.next();
    (unit, min, max)
}

/// Extract the weekly hour count from a work-duration label like
/// "35H/semaine" or "37H30 Travail en journée".
fn parse_weekly_hours(label: &str) -> Option<f64> {
    WEEKLY_HOURS_RE
        .captures(label)?
        .get(1)?
        .as_str()
        .replace(',', ".")
        .parse()
        .ok()
}

/// Normalize a raw city label to title case, preserving a leading numeric
/// department prefix verbatim: "75 - PARIS 11" becomes "75 - Paris 11".
fn normalize_city(label: &str) -> String {
    if let Some((prefix, name)) = label.split_once(" - ")
        && prefix.trim().bytes().all(|b| b.is_ascii_digit())
    {
        return format!("{prefix} - {}", title_case(name));
    }
    title_case(label)
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(title_case_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-case one token, hyphenated segments individually; purely numeric
/// segments (arrondissement numbers) stay digits.
fn title_case_token(token: &str) -> String {
    token
        .split('-')
        .map(|segment| {
            if segment.chars().all(|c| c.is_ascii_digit()) {
                return segment.to_string();
            }
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Extract competencies, optionally keeping only one requirement level
/// (`"E"` required / `"S"` desired); `None` keeps all.
fn extract_skills(raw: &Value, requirement: Option<&str>) -> Vec<Skill> {
    let Some(entries) = get_array(raw, "competences") else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|entry| match requirement {
            Some(wanted) => get_str(entry, "exigence").as_deref() == Some(wanted),
            None => true,
        })
        .map(|entry| Skill {
            code: get_str(entry, "code"),
            label: get_str(entry, "libelle"),
            level: get_str(entry, "exigence"),
        })
        .collect()
}

fn extract_languages(raw: &Value) -> Vec<Skill> {
    let Some(entries) = get_array(raw, "langues") else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| Skill {
            code: None,
            label: get_str(entry, "libelle"),
            level: get_str(entry, "exigence"),
        })
        .collect()
}

fn extract_education(raw: &Value) -> Vec<EducationRequirement> {
    let Some(entries) = get_array(raw, "formations") else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| EducationRequirement {
            domain: get_str(entry, "domaineLibelle"),
            level: get_str(entry, "niveauLibelle"),
            requirement: get_str(entry, "exigence"),
        })
        .collect()
}

/// Pull the `libelle` of every entry in a list field, skipping entries
/// without one.
fn extract_labels(raw: &Value, path: &str) -> Vec<String> {
    let Some(entries) = get_array(raw, path) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| get_str(entry, "libelle"))
        .collect()
}

/// Flatten benefit sub-objects to their labels. Plain-string entries are
/// accepted as-is. Absent or empty lists stay `None` so "offers with
/// benefits" counts stay meaningful.
fn extract_benefits(raw: &Value) -> Option<Vec<String>> {
    let entries = get_array(raw, "salaire.avantages")?;
    let labels: Vec<String> = entries
        .iter()
        .filter_map(|entry| {
            get_str(entry, "libelle").or_else(|| entry.as_str().map(String::from))
        })
        .collect();
    non_empty(labels)
}

/// Schedule tags and working conditions, merged into one tag list.
fn extract_work_context(raw: &Value) -> Vec<String> {
    let mut tags = Vec::new();
    for path in ["contexteTravail.horaires", "contexteTravail.conditionsExercice"] {
        if let Some(entries) = get_array(raw, path) {
            tags.extend(entries.iter().filter_map(|v| v.as_str().map(String::from)));
        }
    }
    tags
}

const REMOTE_KEYWORDS: &[&str] = &[
    "télétravail",
    "teletravail",
    "travail à distance",
    "travail a distance",
    "remote",
    "home office",
    "home-office",
    "distanciel",
    "hybride",
    "hybrid",
];

const FULL_REMOTE_PATTERNS: &[&str] = &[
    "100% télétravail",
    "100 % télétravail",
    "télétravail 100",
    "full remote",
    "full-remote",
    "100% remote",
    "100 % remote",
    "télétravail total",
    "télétravail complet",
    "totalement en télétravail",
    "intégralement en télétravail",
];

const HYBRID_PATTERNS: &[&str] = &[
    "hybride",
    "hybrid",
    "télétravail partiel",
    "jours de télétravail",
    "jour de télétravail",
    "jours en télétravail",
    "jours de teletravail",
];

/// "N jours (de) télétravail" / "télétravail N jours" hybrid phrasing.
static HYBRID_DAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\d\s*(?:à\s*\d\s*)?j(?:ours?)?\s*(?:de\s+|en\s+)?t[ée]l[ée]travail)|(?:t[ée]l[ée]travail\s*(?::\s*)?\d\s*j(?:ours?)?)").unwrap()
});

/// Scan a description for remote-work signals.
///
/// Returns `(None, None)` when there is no description at all, and
/// `(Some(false), None)` when a description mentions nothing remote. When a
/// signal exists, the sub-type is classified first-match-wins in a fixed
/// priority order: full_remote, then hybrid, then occasional. A bare
/// mention with no specific phrasing reads as "possible" and lands on
/// occasional.
fn detect_remote(description: Option<&str>) -> (Option<bool>, Option<RemoteType>) {
    let Some(description) = description else {
        return (None, None);
    };
    let lower = description.to_lowercase();

    let is_remote = REMOTE_KEYWORDS.iter().any(|kw| lower.contains(kw));
    if !is_remote {
        return (Some(false), None);
    }

    let remote_type = if FULL_REMOTE_PATTERNS.iter().any(|p| lower.contains(p)) {
        RemoteType::FullRemote
    } else if HYBRID_PATTERNS.iter().any(|p| lower.contains(p)) || HYBRID_DAYS_RE.is_match(&lower)
    {
        RemoteType::Hybrid
    } else {
        RemoteType::Occasional
    };

    (Some(true), Some(remote_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn collected_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    fn sample_raw() -> Value {
        json!({
            "id": "193XKWB",
            "intitule": "Data Engineer (H/F)",
            "description": "Conception de pipelines de données. Télétravail partiel possible, 2 jours de télétravail par semaine.",
            "dateCreation": "2026-02-10T08:15:00.000Z",
            "dateActualisation": "2026-02-12T10:00:00.000Z",
            "romeCode": "M1811",
            "romeLibelle": "Data engineer",
            "appellationlibelle": "Ingénieur / Ingénieure data",
            "codeNAF": "62.02A",
            "secteurActivite": "62",
            "secteurActiviteLibelle": "Conseil en systèmes et logiciels informatiques",
            "entreprise": {
                "nom": "DATAWORKS",
                "entrepriseAdaptee": false,
                "trancheEffectifEtab": "50 à 99 salariés"
            },
            "lieuTravail": {
                "libelle": "75 - PARIS 11",
                "codePostal": "75011",
                "commune": "75111",
                "latitude": 48.8632,
                "longitude": 2.3708
            },
            "typeContrat": "CDI",
            "typeContratLibelle": "Contrat à durée indéterminée",
            "natureContrat": "Contrat travail",
            "dureeTravailLibelle": "35H/semaine Travail en journée",
            "dureeTravailLibelleConverti": "Temps plein",
            "alternance": false,
            "salaire": {
                "libelle": "Mensuel de 2500.0 Euros à 3000.0 Euros",
                "commentaire": "Selon expérience",
                "avantages": [{"libelle": "Tickets restaurant"}, {"libelle": "Mutuelle"}]
            },
            "experienceExige": "E",
            "experienceLibelle": "3 ans d'expérience sur un poste similaire",
            "competences": [
                {"code": "300286", "libelle": "Python", "exigence": "E"},
                {"code": "300287", "libelle": "SQL", "exigence": "E"},
                {"code": "300288", "libelle": "Apache Spark", "exigence": "S"}
            ],
            "qualitesProfessionnelles": [
                {"libelle": "Rigueur", "description": "..."}
            ],
            "langues": [{"libelle": "Anglais", "exigence": "S"}],
            "formations": [
                {"domaineLibelle": "Informatique", "niveauLibelle": "Bac+5 et plus ou équivalents", "exigence": "E"}
            ],
            "permis": [{"libelle": "B - Véhicule léger", "exigence": "S"}],
            "contexteTravail": {
                "horaires": ["Du lundi au vendredi"],
                "conditionsExercice": ["Open space"]
            },
            "deplacementLibelle": "Ponctuels Zone départementale",
            "accessibleTH": true,
            "nombrePostes": 2,
            "qualificationCode": "9",
            "qualificationLibelle": "Cadre",
            "origineOffre": {
                "origine": "1",
                "urlOrigine": "https://candidat.francetravail.fr/offres/recherche/detail/193XKWB"
            }
        })
    }

    #[test]
    fn maps_a_full_record() {
        let offer = map_offer(&sample_raw(), collected_at(), false);

        assert_eq!(offer.id, "francetravail:193XKWB");
        assert_eq!(offer.source, "francetravail");
        assert_eq!(offer.title.as_deref(), Some("Data Engineer (H/F)"));
        assert_eq!(offer.company_name.as_deref(), Some("DATAWORKS"));
        assert_eq!(offer.rome_code.as_deref(), Some("M1811"));
        assert_eq!(offer.location_city.as_deref(), Some("75 - Paris 11"));
        assert_eq!(offer.location_department.as_deref(), Some("75"));
        assert_eq!(offer.location_region.as_deref(), Some("Île-de-France"));
        assert_eq!(offer.location_latitude, Some(48.8632));
        assert_eq!(offer.contract_type.as_deref(), Some("Contrat à durée indéterminée"));
        assert_eq!(offer.work_schedule.as_deref(), Some("Temps plein"));
        assert_eq!(offer.weekly_hours, Some(35.0));
        assert_eq!(offer.is_alternance, Some(false));
        assert_eq!(offer.salary_unit, Some(SalaryUnit::Monthly));
        assert_eq!(offer.salary_min, Some(2500.0));
        assert_eq!(offer.salary_max, Some(3000.0));
        assert_eq!(
            offer.salary_benefits,
            Some(vec!["Tickets restaurant".to_string(), "Mutuelle".to_string()])
        );
        assert_eq!(
            offer.skills,
            Some(vec![
                "Python".to_string(),
                "SQL".to_string(),
                "Apache Spark".to_string()
            ])
        );
        let required = offer.skills_required.as_ref().unwrap();
        assert_eq!(required.len(), 2);
        assert_eq!(required[0].label.as_deref(), Some("Python"));
        assert_eq!(required[0].level.as_deref(), Some("E"));
        let desired = offer.skills_desired.as_ref().unwrap();
        assert_eq!(desired.len(), 1);
        assert_eq!(desired[0].label.as_deref(), Some("Apache Spark"));
        assert_eq!(offer.soft_skills, Some(vec!["Rigueur".to_string()]));
        assert_eq!(
            offer.education_level.as_deref(),
            Some("Bac+5 et plus ou équivalents")
        );
        assert_eq!(offer.experience_level.as_deref(), Some("confirmé"));
        assert_eq!(offer.experience_code.as_deref(), Some("E"));
        assert_eq!(offer.company_size.as_deref(), Some("50 à 99 salariés"));
        assert_eq!(
            offer.work_context,
            Some(vec!["Du lundi au vendredi".to_string(), "Open space".to_string()])
        );
        assert_eq!(offer.permits_required, Some(vec!["B - Véhicule léger".to_string()]));
        assert_eq!(offer.accessible_handicap, Some(true));
        assert_eq!(offer.is_remote, Some(true));
        assert_eq!(offer.remote_type, Some(RemoteType::Hybrid));
        assert_eq!(offer.positions_count, Some(2));
        assert_eq!(offer.collected_at.as_deref(), Some("2026-03-14T09:30:00+00:00"));
        assert!(offer.raw.is_none());
    }

    #[test]
    fn mapping_is_idempotent() {
        let raw = sample_raw();
        let first = map_offer(&raw, collected_at(), true);
        let second = map_offer(&raw, collected_at(), true);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn include_raw_embeds_the_payload() {
        let raw = sample_raw();
        let offer = map_offer(&raw, collected_at(), true);
        assert_eq!(offer.raw.as_ref(), Some(&raw));
    }

    #[test]
    fn empty_record_degrades_to_none_everywhere() {
        let offer = map_offer(&json!({}), collected_at(), false);
        assert_eq!(offer.id, "francetravail:unknown");
        assert!(offer.title.is_none());
        assert!(offer.description.is_none());
        assert!(offer.company_name.is_none());
        assert!(offer.location_city.is_none());
        assert!(offer.salary_min.is_none());
        assert!(offer.salary_benefits.is_none());
        assert!(offer.skills.is_none());
        assert!(offer.is_remote.is_none());
        assert!(offer.remote_type.is_none());
    }

    #[test]
    fn intermediate_non_object_short_circuits() {
        let raw = json!({"entreprise": "DATAWORKS", "lieuTravail": 42});
        let offer = map_offer(&raw, collected_at(), false);
        assert!(offer.company_name.is_none());
        assert!(offer.location_city.is_none());
        assert!(offer.location_department.is_none());
    }

    #[test]
    fn salary_monthly_range() {
        let (unit, min, max) = parse_salary_label("Mensuel de 2500.0 Euros à 3000.0 Euros");
        assert_eq!(unit, Some(SalaryUnit::Monthly));
        assert_eq!(min, Some(2500.0));
        assert_eq!(max, Some(3000.0));
    }

    #[test]
    fn salary_yearly_single_bound() {
        let (unit, min, max) = parse_salary_label("Annuel de 45000.0 Euros");
        assert_eq!(unit, Some(SalaryUnit::Yearly));
        assert_eq!(min, Some(45000.0));
        assert_eq!(max, None);
    }

    #[test]
    fn salary_hourly_with_decimal_comma() {
        let (unit, min, max) = parse_salary_label("Horaire de 11,88 Euros");
        assert_eq!(unit, Some(SalaryUnit::Hourly));
        assert_eq!(min, Some(11.88));
        assert_eq!(max, None);
    }

    #[test]
    fn salary_month_count_clause_is_not_a_bound() {
        let (unit, min, max) =
            parse_salary_label("Annuel de 45000,00 Euros à 55000,00 Euros sur 12,00 mois");
        assert_eq!(unit, Some(SalaryUnit::Yearly));
        assert_eq!(min, Some(45000.0));
        assert_eq!(max, Some(55000.0));

        let (_, min, max) = parse_salary_label("Mensuel de 1801,80 Euros sur 12,00 mois");
        assert_eq!(min, Some(1801.8));
        assert_eq!(max, None);
    }

    #[test]
    fn salary_without_numbers_keeps_unit_only() {
        let (unit, min, max) = parse_salary_label("Annuel selon profil");
        assert_eq!(unit, Some(SalaryUnit::Yearly));
        assert_eq!(min, None);
        assert_eq!(max, None);

        let (unit, min, max) = parse_salary_label("Selon profil");
        assert_eq!(unit, None);
        assert_eq!(min, None);
        assert_eq!(max, None);
    }

    #[test]
    fn city_normalization_cases() {
        assert_eq!(normalize_city("75 - PARIS"), "75 - Paris");
        assert_eq!(normalize_city("75 - paris 11"), "75 - Paris 11");
        assert_eq!(normalize_city("13 - AIX-EN-PROVENCE"), "13 - Aix-En-Provence");
        assert_eq!(normalize_city("LYON"), "Lyon");
    }

    #[test]
    fn weekly_hours_parsing() {
        assert_eq!(parse_weekly_hours("35H/semaine"), Some(35.0));
        assert_eq!(parse_weekly_hours("37H30 Travail en journée"), Some(37.0));
        assert_eq!(parse_weekly_hours("Temps partiel"), None);
    }

    #[test]
    fn remote_detection_and_priority() {
        assert_eq!(detect_remote(None), (None, None));
        assert_eq!(detect_remote(Some("Poste sur site uniquement.")), (Some(false), None));

        let (is_remote, kind) = detect_remote(Some("Poste en full remote, équipe distribuée."));
        assert_eq!(is_remote, Some(true));
        assert_eq!(kind, Some(RemoteType::FullRemote));

        // Full-remote phrasing wins over hybrid phrasing in the same text.
        let (_, kind) =
            detect_remote(Some("100% télétravail possible, organisation hybride à discuter."));
        assert_eq!(kind, Some(RemoteType::FullRemote));

        let (_, kind) = detect_remote(Some("2 jours de télétravail par semaine."));
        assert_eq!(kind, Some(RemoteType::Hybrid));

        let (_, kind) = detect_remote(Some("Possibilité de télétravail."));
        assert_eq!(kind, Some(RemoteType::Occasional));
    }

    #[test]
    fn benefits_empty_vs_absent() {
        let absent = json!({"salaire": {"libelle": "Mensuel de 2000 Euros"}});
        assert_eq!(extract_benefits(&absent), None);

        let empty = json!({"salaire": {"avantages": []}});
        assert_eq!(extract_benefits(&empty), None);

        let plain_strings = json!({"salaire": {"avantages": ["Prime annuelle"]}});
        assert_eq!(
            extract_benefits(&plain_strings),
            Some(vec!["Prime annuelle".to_string()])
        );
    }
}
