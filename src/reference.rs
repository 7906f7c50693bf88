//! Static reference data and pure classification helpers.
//!
//! Every lookup table that more than one call site needs lives here once:
//! ROME codes and title keywords for data jobs, the technical-skill
//! taxonomy, experience/education level patterns, and the department-code
//! rules (overseas prefixes, the Corsica postal-code split, department and
//! region names).

use std::collections::BTreeMap;

use crate::models::offer::Skill;

/// ROME codes identifying data jobs, with their labels.
///
/// The three specific codes cover the bulk of the market; the generic codes
/// catch mixed populations (chargés d'études, développeurs) and need the
/// title keywords below to separate data roles from false positives.
pub const DATA_ROME_CODES: &[(&str, &str)] = &[
    ("M1419", "Data analyst"),
    ("M1811", "Data engineer"),
    ("M1405", "Data scientist"),
    ("M1403", "Études et prospective socio-économique"),
    ("M1805", "Études et développement informatique"),
    ("M1806", "Conseil et maîtrise d'ouvrage en SI"),
];

/// Title keywords marking data jobs, grouped by role family.
pub const DATA_JOB_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "analyst",
        &[
            "data analyst",
            "analyste de données",
            "analyste données",
            "business analyst",
            "bi analyst",
            "analyste décisionnel",
        ],
    ),
    (
        "scientist",
        &[
            "data scientist",
            "scientifique des données",
            "machine learning engineer",
            "ml engineer",
            "ai engineer",
            "nlp engineer",
        ],
    ),
    (
        "engineer",
        &[
            "data engineer",
            "ingénieur données",
            "ingénieur data",
            "big data engineer",
            "etl developer",
            "pipeline engineer",
        ],
    ),
    (
        "architecture",
        &[
            "data architect",
            "architecte données",
            "architecte data",
            "chief data officer",
            "cdo",
            "data manager",
            "responsable data",
        ],
    ),
    (
        "visualization",
        &[
            "data visualization",
            "développeur bi",
            "power bi",
            "tableau developer",
            "qlik developer",
        ],
    ),
    (
        "database",
        &[
            "dba",
            "database administrator",
            "administrateur base de données",
            "administrateur bdd",
        ],
    ),
];

/// Technical skills to extract from offer competencies, by category.
pub const TECHNICAL_SKILLS: &[(&str, &[&str])] = &[
    (
        "languages",
        &["python", "sql", "scala", "java", "javascript", "julia"],
    ),
    (
        "databases",
        &[
            "postgresql",
            "mysql",
            "mongodb",
            "elasticsearch",
            "cassandra",
            "redis",
            "oracle",
            "sql server",
        ],
    ),
    (
        "bigdata_cloud",
        &[
            "spark",
            "hadoop",
            "kafka",
            "airflow",
            "aws",
            "azure",
            "gcp",
            "databricks",
            "snowflake",
        ],
    ),
    (
        "ml_frameworks",
        &[
            "tensorflow",
            "pytorch",
            "scikit-learn",
            "keras",
            "xgboost",
            "lightgbm",
        ],
    ),
    (
        "bi_tools",
        &["power bi", "tableau", "qlik", "looker", "metabase", "superset"],
    ),
    (
        "etl_tools",
        &[
            "talend",
            "informatica",
            "ssis",
            "pentaho",
            "airflow",
            "prefect",
            "dagster",
        ],
    ),
];

/// Experience-level patterns, checked in order; the first level with a
/// matching pattern wins ("5 ans" therefore classifies as confirmé, not
/// senior).
pub const EXPERIENCE_LEVEL_PATTERNS: &[(&str, &[&str])] = &[
    (
        "junior",
        &["débutant", "0 an", "1 an", "2 ans", "moins de 3 ans"],
    ),
    ("confirmé", &["3 ans", "4 ans", "5 ans"]),
    (
        "senior",
        &["5 ans", "7 ans", "10 ans", "plus de 5 ans", "plus de 7 ans"],
    ),
    ("expert", &["10 ans", "15 ans", "plus de 10 ans"]),
];

/// Fallback when no experience pattern matches. Deliberately the mid-level
/// bucket rather than an "unspecified" one, so downstream aggregations do
/// not grow a sparse tail; callers that disagree pass their own default to
/// [`classify_experience_level_with_default`].
pub const DEFAULT_EXPERIENCE_LEVEL: &str = "confirmé";

/// Postal codes in the `20xxx` range belonging to Corse-du-Sud (2A).
/// Any other `20xxx` code resolves to Haute-Corse (2B).
const CORSICA_2A_POSTAL_CODES: &[&str] = &[
    "20000", "20090", "20100", "20110", "20113", "20114", "20115", "20116",
    "20117", "20118", "20119", "20121", "20122", "20123", "20124", "20125",
    "20126", "20127", "20128", "20129", "20130", "20131", "20132", "20133",
    "20134", "20135", "20136", "20137", "20138", "20139", "20140", "20141",
    "20142", "20143", "20144", "20145", "20146", "20147", "20148", "20150",
    "20151", "20152", "20153", "20157", "20160", "20163", "20164", "20165",
    "20166", "20167", "20168", "20169", "20170", "20171", "20172", "20173",
];

/// Extract the department code from a 5-digit postal code.
///
/// Overseas codes (97x/98x) keep three characters, Corsica splits on the
/// 2A allowlist above, everything else keeps the first two characters.
/// Anything that is not five ASCII digits yields `None`.
pub fn department_from_postal_code(postal_code: &str) -> Option<String> {
    let code = postal_code.trim();
    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if code.starts_with("97") || code.starts_with("98") {
        return Some(code[..3].to_string());
    }
    if code.starts_with("20") {
        if CORSICA_2A_POSTAL_CODES.contains(&code) {
            return Some("2A".to_string());
        }
        return Some("2B".to_string());
    }
    Some(code[..2].to_string())
}

/// French departments, code to name.
pub const DEPARTMENT_NAMES: &[(&str, &str)] = &[
    ("01", "Ain"),
    ("02", "Aisne"),
    ("03", "Allier"),
    ("04", "Alpes-de-Haute-Provence"),
    ("05", "Hautes-Alpes"),
    ("06", "Alpes-Maritimes"),
    ("07", "Ardèche"),
    ("08", "Ardennes"),
    ("09", "Ariège"),
    ("10", "Aube"),
    ("11", "Aude"),
    ("12", "Aveyron"),
    ("13", "Bouches-du-Rhône"),
    ("14", "Calvados"),
    ("15", "Cantal"),
    ("16", "Charente"),
    ("17", "Charente-Maritime"),
    ("18", "Cher"),
    ("19", "Corrèze"),
    ("2A", "Corse-du-Sud"),
    ("2B", "Haute-Corse"),
    ("21", "Côte-d'Or"),
    ("22", "Côtes-d'Armor"),
    ("23", "Creuse"),
    ("24", "Dordogne"),
    ("25", "Doubs"),
    ("26", "Drôme"),
    ("27", "Eure"),
    ("28", "Eure-et-Loir"),
    ("29", "Finistère"),
    ("30", "Gard"),
    ("31", "Haute-Garonne"),
    ("32", "Gers"),
    ("33", "Gironde"),
    ("34", "Hérault"),
    ("35", "Ille-et-Vilaine"),
    ("36", "Indre"),
    ("37", "Indre-et-Loire"),
    ("38", "Isère"),
    ("39", "Jura"),
    ("40", "Landes"),
    ("41", "Loir-et-Cher"),
    ("42", "Loire"),
    ("43", "Haute-Loire"),
    ("44", "Loire-Atlantique"),
    ("45", "Loiret"),
    ("46", "Lot"),
    ("47", "Lot-et-Garonne"),
    ("48", "Lozère"),
    ("49", "Maine-et-Loire"),
    ("50", "Manche"),
    ("51", "Marne"),
    ("52", "Haute-Marne"),
    ("53", "Mayenne"),
    ("54", "Meurthe-et-Moselle"),
    ("55", "Meuse"),
    ("56", "Morbihan"),
    ("57", "Moselle"),
    ("58", "Nièvre"),
    ("59", "Nord"),
    ("60", "Oise"),
    ("61", "Orne"),
    ("62", "Pas-de-Calais"),
    ("63", "Puy-de-Dôme"),
    ("64", "Pyrénées-Atlantiques"),
    ("65", "Hautes-Pyrénées"),
    ("66", "Pyrénées-Orientales"),
    ("67", "Bas-Rhin"),
    ("68", "Haut-Rhin"),
    ("69", "Rhône"),
    ("70", "Haute-Saône"),
    ("71", "Saône-et-Loire"),
    ("72", "Sarthe"),
    ("73", "Savoie"),
    ("74", "Haute-Savoie"),
    ("75", "Paris"),
    ("76", "Seine-Maritime"),
    ("77", "Seine-et-Marne"),
    ("78", "Yvelines"),
    ("79", "Deux-Sèvres"),
    ("80", "Somme"),
    ("81", "Tarn"),
    ("82", "Tarn-et-Garonne"),
    ("83", "Var"),
    ("84", "Vaucluse"),
    ("85", "Vendée"),
    ("86", "Vienne"),
    ("87", "Haute-Vienne"),
    ("88", "Vosges"),
    ("89", "Yonne"),
    ("90", "Territoire de Belfort"),
    ("91", "Essonne"),
    ("92", "Hauts-de-Seine"),
    ("93", "Seine-Saint-Denis"),
    ("94", "Val-de-Marne"),
    ("95", "Val-d'Oise"),
    ("971", "Guadeloupe"),
    ("972", "Martinique"),
    ("973", "Guyane"),
    ("974", "La Réunion"),
    ("976", "Mayotte"),
];

/// Regions and the department codes they contain.
pub const REGION_DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "Auvergne-Rhône-Alpes",
        &["01", "03", "07", "15", "26", "38", "42", "43", "63", "69", "73", "74"],
    ),
    (
        "Bourgogne-Franche-Comté",
        &["21", "25", "39", "58", "70", "71", "89", "90"],
    ),
    ("Bretagne", &["22", "29", "35", "56"]),
    ("Centre-Val de Loire", &["18", "28", "36", "37", "41", "45"]),
    ("Corse", &["2A", "2B"]),
    (
        "Grand Est",
        &["08", "10", "51", "52", "54", "55", "57", "67", "68", "88"],
    ),
    ("Hauts-de-France", &["02", "59", "60", "62", "80"]),
    (
        "Île-de-France",
        &["75", "77", "78", "91", "92", "93", "94", "95"],
    ),
    ("Normandie", &["14", "27", "50", "61", "76"]),
    (
        "Nouvelle-Aquitaine",
        &["16", "17", "19", "23", "24", "33", "40", "47", "64", "79", "86", "87"],
    ),
    (
        "Occitanie",
        &["09", "11", "12", "30", "31", "32", "34", "46", "48", "65", "66", "81", "82"],
    ),
    ("Pays de la Loire", &["44", "49", "53", "72", "85"]),
    (
        "Provence-Alpes-Côte d'Azur",
        &["04", "05", "06", "13", "83", "84"],
    ),
    ("Guadeloupe", &["971"]),
    ("Martinique", &["972"]),
    ("Guyane", &["973"]),
    ("La Réunion", &["974"]),
    ("Mayotte", &["976"]),
];

/// Human name for a department code, when known.
pub fn department_name(code: &str) -> Option<&'static str> {
    DEPARTMENT_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Region containing a department code, when known.
pub fn region_for_department(code: &str) -> Option<&'static str> {
    REGION_DEPARTMENTS
        .iter()
        .find(|(_, departments)| departments.contains(&code))
        .map(|(region, _)| *region)
}

/// True when the offer is a data job: its ROME code is in the allow-list,
/// or its lowercased title contains any of the data-job keywords.
pub fn is_data_job(rome_code: Option<&str>, title: Option<&str>) -> bool {
    if let Some(code) = rome_code
        && DATA_ROME_CODES.iter().any(|(c, _)| *c == code)
    {
        return true;
    }
    if let Some(title) = title {
        let title_lower = title.to_lowercase();
        return DATA_JOB_KEYWORDS
            .iter()
            .flat_map(|(_, keywords)| keywords.iter())
            .any(|keyword| title_lower.contains(keyword));
    }
    false
}

/// Match skill labels against the technical-skill taxonomy.
///
/// Returns category -> matched technologies; categories with no match are
/// omitted, matches within a category are deduplicated and ordered as in
/// the taxonomy.
pub fn extract_technical_skills(skills: &[Skill]) -> BTreeMap<&'static str, Vec<&'static str>> {
    let labels: Vec<String> = skills
        .iter()
        .filter_map(|s| s.label.as_deref())
        .map(str::to_lowercase)
        .collect();

    let mut found = BTreeMap::new();
    for (category, techs) in TECHNICAL_SKILLS {
        let matched: Vec<&'static str> = techs
            .iter()
            .filter(|tech| labels.iter().any(|label| label.contains(**tech)))
            .copied()
            .collect();
        if !matched.is_empty() {
            found.insert(*category, matched);
        }
    }
    found
}

/// Classify a free-text experience requirement into a normalized level,
/// falling back to [`DEFAULT_EXPERIENCE_LEVEL`].
pub fn classify_experience_level(text: &str) -> &'static str {
    classify_experience_level_with_default(text, DEFAULT_EXPERIENCE_LEVEL)
}

/// Classify with a caller-chosen fallback level.
pub fn classify_experience_level_with_default(
    text: &str,
    default: &'static str,
) -> &'static str {
    let text_lower = text.to_lowercase();
    for (level, patterns) in EXPERIENCE_LEVEL_PATTERNS {
        if patterns.iter().any(|pattern| text_lower.contains(pattern)) {
            return level;
        }
    }
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(label: &str) -> Skill {
        Skill {
            code: None,
            label: Some(label.to_string()),
            level: None,
        }
    }

    #[test]
    fn department_code_overseas_keeps_three_digits() {
        assert_eq!(department_from_postal_code("97400").as_deref(), Some("974"));
        assert_eq!(department_from_postal_code("98800").as_deref(), Some("988"));
    }

    #[test]
    fn department_code_corsica_splits_on_allowlist() {
        assert_eq!(department_from_postal_code("20000").as_deref(), Some("2A"));
        assert_eq!(department_from_postal_code("20300").as_deref(), Some("2B"));
    }

    #[test]
    fn department_code_mainland_keeps_two_digits() {
        assert_eq!(department_from_postal_code("75001").as_deref(), Some("75"));
        assert_eq!(department_from_postal_code("13008").as_deref(), Some("13"));
    }

    #[test]
    fn department_code_rejects_malformed_input() {
        assert_eq!(department_from_postal_code("7500"), None);
        assert_eq!(department_from_postal_code("ABCDE"), None);
        assert_eq!(department_from_postal_code(""), None);
    }

    #[test]
    fn department_and_region_lookups() {
        assert_eq!(department_name("75"), Some("Paris"));
        assert_eq!(department_name("2A"), Some("Corse-du-Sud"));
        assert_eq!(department_name("974"), Some("La Réunion"));
        assert_eq!(department_name("00"), None);
        assert_eq!(region_for_department("35"), Some("Bretagne"));
        assert_eq!(region_for_department("974"), Some("La Réunion"));
        assert_eq!(region_for_department("00"), None);
    }

    #[test]
    fn data_job_by_rome_code() {
        assert!(is_data_job(Some("M1419"), None));
        assert!(!is_data_job(Some("K2204"), None));
    }

    #[test]
    fn data_job_by_title_keyword() {
        assert!(is_data_job(None, Some("Senior Data Engineer H/F")));
        assert!(is_data_job(None, Some("Analyste de données junior")));
        assert!(!is_data_job(None, Some("Chauffeur livreur")));
        assert!(!is_data_job(None, None));
    }

    #[test]
    fn technical_skills_grouped_and_deduplicated() {
        let skills = vec![
            skill("Programmation Python"),
            skill("Python avancé"),
            skill("Power BI"),
            skill("Conduite de chariot"),
        ];
        let found = extract_technical_skills(&skills);
        assert_eq!(found.get("languages"), Some(&vec!["python"]));
        assert_eq!(found.get("bi_tools"), Some(&vec!["power bi"]));
        assert!(!found.contains_key("databases"));
    }

    #[test]
    fn experience_classification_first_match_wins() {
        assert_eq!(classify_experience_level("Débutant accepté"), "junior");
        assert_eq!(classify_experience_level("3 ans d'expérience"), "confirmé");
        // "5 ans" appears in two levels; the earlier one wins.
        assert_eq!(classify_experience_level("5 ans minimum"), "confirmé");
        assert_eq!(classify_experience_level("plus de 7 ans"), "senior");
        assert_eq!(classify_experience_level("15 ans"), "expert");
    }

    #[test]
    fn experience_classification_default_is_configurable() {
        assert_eq!(classify_experience_level("expérience souhaitée"), "confirmé");
        assert_eq!(
            classify_experience_level_with_default("expérience souhaitée", "junior"),
            "junior"
        );
    }
}
