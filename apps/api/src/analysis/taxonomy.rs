//! Skill taxonomy: versioned reference data passed into the engine at construction.
//!
//! Holds skill names, categories, aliases and demand levels, the baseline
//! reference set used when no job description is supplied, and the per-category
//! reasons attached to missing skills. A taxonomy that fails to load or
//! validate is `TaxonomyUnavailable`, which stops the service at startup.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::error::AnalysisError;
use crate::analysis::keywords::{is_countable, stem, tokenize};
use crate::analysis::models::Demand;

const BUNDLED_TAXONOMY: &str = include_str!("../../data/taxonomy.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub demand: Demand,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// On-disk shape of the taxonomy file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyData {
    pub version: String,
    pub skills: Vec<SkillDefinition>,
    #[serde(default)]
    pub baseline: Vec<String>,
    #[serde(default)]
    pub category_reasons: BTreeMap<String, String>,
    pub default_reason: String,
}

/// Validated taxonomy with its phrase index.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    version: String,
    skills: Vec<SkillDefinition>,
    baseline: Vec<usize>,
    category_reasons: BTreeMap<String, String>,
    default_reason: String,
    /// Stemmed, space-joined phrase tokens → skill index.
    phrases: HashMap<String, usize>,
    max_phrase_len: usize,
}

impl Taxonomy {
    /// The taxonomy compiled into the binary.
    pub fn bundled() -> Result<Self, AnalysisError> {
        Self::from_json(BUNDLED_TAXONOMY)
    }

    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::TaxonomyUnavailable(format!("cannot read {}: {e}", path.display()))
        })?;
        let taxonomy = Self::from_json(&raw)?;
        info!(
            "Loaded skill taxonomy v{} from {} ({} skills)",
            taxonomy.version,
            path.display(),
            taxonomy.skills.len()
        );
        Ok(taxonomy)
    }

    pub fn from_json(raw: &str) -> Result<Self, AnalysisError> {
        let data: TaxonomyData = serde_json::from_str(raw)
            .map_err(|e| AnalysisError::TaxonomyUnavailable(format!("invalid taxonomy JSON: {e}")))?;
        Self::from_data(data)
    }

    pub fn from_data(data: TaxonomyData) -> Result<Self, AnalysisError> {
        let unavailable = |msg: String| AnalysisError::TaxonomyUnavailable(msg);

        if data.version.trim().is_empty() {
            return Err(unavailable("taxonomy version is empty".to_string()));
        }

        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut phrases: HashMap<String, usize> = HashMap::new();
        let mut max_phrase_len = 0;

        for (idx, skill) in data.skills.iter().enumerate() {
            if skill.name.trim().is_empty() || skill.category.trim().is_empty() {
                return Err(unavailable(format!("skill #{idx} has an empty name or category")));
            }
            if by_name.insert(skill.name.to_lowercase(), idx).is_some() {
                return Err(unavailable(format!("duplicate skill '{}'", skill.name)));
            }

            for phrase in std::iter::once(&skill.name).chain(&skill.aliases) {
                let tokens = tokenize(phrase);
                if !tokens.iter().any(|t| is_countable(t)) {
                    return Err(unavailable(format!(
                        "phrase '{phrase}' of skill '{}' has no countable token",
                        skill.name
                    )));
                }
                let key = phrase_key(&tokens);
                if let Some(&other) = phrases.get(&key) {
                    if other != idx {
                        return Err(unavailable(format!(
                            "phrase '{phrase}' is shared by '{}' and '{}'",
                            data.skills[other].name, skill.name
                        )));
                    }
                }
                max_phrase_len = max_phrase_len.max(tokens.len());
                phrases.insert(key, idx);
            }
        }

        let mut baseline = Vec::with_capacity(data.baseline.len());
        for name in &data.baseline {
            let idx = by_name
                .get(&name.to_lowercase())
                .copied()
                .ok_or_else(|| unavailable(format!("baseline skill '{name}' is not defined")))?;
            if !baseline.contains(&idx) {
                baseline.push(idx);
            }
        }

        Ok(Taxonomy {
            version: data.version,
            skills: data.skills,
            baseline,
            category_reasons: data.category_reasons,
            default_reason: data.default_reason,
            phrases,
            max_phrase_len,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of defined skills.
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    pub fn skill(&self, idx: usize) -> &SkillDefinition {
        &self.skills[idx]
    }

    /// Skill indices of the baseline reference set, in declared order.
    pub fn baseline(&self) -> &[usize] {
        &self.baseline
    }

    /// Justification attached to a missing skill of `category`.
    pub fn reason_for(&self, category: &str) -> &str {
        self.category_reasons
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default_reason)
    }

    /// Longest phrase matching a prefix of `stems`: (skill index, token count).
    pub fn match_at(&self, stems: &[&str]) -> Option<(usize, usize)> {
        let longest = self.max_phrase_len.min(stems.len());
        (1..=longest)
            .rev()
            .find_map(|len| self.phrases.get(&stems[..len].join(" ")).map(|&idx| (idx, len)))
    }
}

fn phrase_key(tokens: &[String]) -> String {
    tokens.iter().map(|t| stem(t)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::analysis::fixtures::{skill, test_taxonomy_data};

    #[test]
    fn test_bundled_taxonomy_is_valid() {
        let taxonomy = Taxonomy::bundled().unwrap();
        assert!(!taxonomy.version().is_empty());
        assert!(taxonomy.skill_count() > 40);
        assert!(!taxonomy.baseline().is_empty());
        assert_eq!(taxonomy.reason_for("DevOps"), "Required for scaling");
    }

    #[test]
    fn test_baseline_names_resolve_case_insensitively() {
        let mut data = test_taxonomy_data();
        data.baseline = vec!["javascript".into(), "SQL".into(), "JavaScript".into()];
        let taxonomy = Taxonomy::from_data(data).unwrap();
        let names: Vec<&str> = taxonomy
            .baseline()
            .iter()
            .map(|&i| taxonomy.skill(i).name.as_str())
            .collect();
        assert_eq!(names, vec!["JavaScript", "SQL"]);
    }

    #[test]
    fn test_rejects_duplicate_skill_names() {
        let mut data = test_taxonomy_data();
        data.skills.push(skill("sql", "Database", Demand::Low, &["structured query language"]));
        assert!(Taxonomy::from_data(data).is_err());
    }

    #[test]
    fn test_unknown_category_uses_default_reason() {
        let taxonomy = Taxonomy::from_data(test_taxonomy_data()).unwrap();
        assert_eq!(taxonomy.reason_for("Basket Weaving"), "Requested for this role");
    }

    #[test]
    fn test_omitted_demand_defaults_to_medium() {
        let json = r#"{
            "version": "t1",
            "skills": [{"name": "Haskell", "category": "Programming"}],
            "default_reason": "r"
        }"#;
        let taxonomy = Taxonomy::from_json(json).unwrap();
        assert_eq!(taxonomy.skill(0).demand, Demand::Medium);
    }

    #[test]
    fn test_rejects_undefined_baseline_skill() {
        let mut data = test_taxonomy_data();
        data.baseline.push("Fortran".to_string());
        let err = Taxonomy::from_data(data).unwrap_err();
        assert!(matches!(err, AnalysisError::TaxonomyUnavailable(_)));
    }

    #[test]
    fn test_rejects_phrase_shared_between_skills() {
        let mut data = test_taxonomy_data();
        // "rest apis" reduces to the same phrase key as "REST APIs"
        data.skills
            .push(skill("Web APIs", "Backend", Demand::Low, &["rest apis"]));
        assert!(Taxonomy::from_data(data).is_err());
    }

    #[test]
    fn test_rejects_stopword_only_phrase() {
        let mut data = test_taxonomy_data();
        data.skills.push(skill("The", "Misc", Demand::Low, &[]));
        assert!(Taxonomy::from_data(data).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Taxonomy::from_json("{ not json").unwrap_err();
        assert_eq!(err.code(), "TAXONOMY_UNAVAILABLE");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&test_taxonomy_data()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let taxonomy = Taxonomy::load(file.path()).unwrap();
        assert_eq!(taxonomy.version(), "test-1");
    }

    #[test]
    fn test_load_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Taxonomy::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::TaxonomyUnavailable(_)));
    }

    #[test]
    fn test_match_at_prefers_longest_phrase() {
        let taxonomy = Taxonomy::from_data(test_taxonomy_data()).unwrap();
        let (idx, len) = taxonomy.match_at(&["react", "native", "app"]).unwrap();
        assert_eq!(taxonomy.skill(idx).name, "React Native");
        assert_eq!(len, 2);
        assert!(taxonomy.match_at(&["cobol"]).is_none());
    }
}
