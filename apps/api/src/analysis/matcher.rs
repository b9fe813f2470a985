//! Skill Matcher: partitions a reference skill set against the candidate's skills.
//!
//! The reference set is whatever the job description mentions, or the
//! taxonomy's baseline when no job description was given.

use tracing::debug;

use crate::analysis::keywords::skills_in;
use crate::analysis::models::{MissingSkill, ReferenceSource, SkillMatchResult, SkillRecord};
use crate::analysis::taxonomy::Taxonomy;

/// Reference skill indices and where they came from.
pub fn reference_skills(taxonomy: &Taxonomy, job_description: &str) -> (ReferenceSource, Vec<usize>) {
    if job_description.trim().is_empty() {
        (ReferenceSource::Baseline, taxonomy.baseline().to_vec())
    } else {
        (
            ReferenceSource::JobDescription,
            skills_in(job_description, taxonomy),
        )
    }
}

/// Splits the reference set into matched and missing skills, keeping reference order.
///
/// Matched records carry the candidate's detected proficiency; missing ones
/// carry a priority from the skill's demand and the taxonomy's reason for its category.
pub fn match_skills(
    candidates: &[SkillRecord],
    taxonomy: &Taxonomy,
    job_description: &str,
) -> (ReferenceSource, SkillMatchResult) {
    let (source, reference) = reference_skills(taxonomy, job_description);
    let mut result = SkillMatchResult::default();

    for idx in reference {
        let def = taxonomy.skill(idx);
        let candidate = candidates
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(&def.name));

        match candidate {
            Some(found) => result.matched.push(found.clone()),
            None => result.missing.push(MissingSkill {
                name: def.name.clone(),
                category: def.category.clone(),
                demand: def.demand,
                priority: def.demand.into(),
                reason: taxonomy.reason_for(&def.category).to_string(),
            }),
        }
    }

    debug!(
        "Skill match against {:?}: {} matched, {} missing",
        source,
        result.matched.len(),
        result.missing.len()
    );
    (source, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::test_taxonomy;
    use crate::analysis::keywords::extract_keywords;
    use crate::analysis::models::{Demand, Priority, Proficiency};

    fn candidates(text: &str) -> Vec<SkillRecord> {
        extract_keywords(text, &test_taxonomy()).candidate_skills
    }

    fn names<T>(items: &[T], name: impl Fn(&T) -> &str) -> Vec<String> {
        items.iter().map(|i| name(i).to_string()).collect()
    }

    #[test]
    fn test_empty_job_description_uses_baseline() {
        let taxonomy = test_taxonomy();
        let (source, result) = match_skills(&candidates("JavaScript and React"), &taxonomy, "  \n");

        assert_eq!(source, ReferenceSource::Baseline);
        assert_eq!(names(&result.matched, |s| s.name.as_str()), vec!["JavaScript", "React"]);
        assert_eq!(names(&result.missing, |s| s.name.as_str()), vec!["SQL"]);
        assert_eq!(result.match_percentage().round() as u32, 67);
    }

    #[test]
    fn test_missing_skill_priority_and_reason() {
        let taxonomy = test_taxonomy();
        let (_, result) = match_skills(&[], &taxonomy, "We run Kubernetes, Redis and Terraform");

        let missing: Vec<(&str, Priority, &str)> = result
            .missing
            .iter()
            .map(|m| (m.name.as_str(), m.priority, m.reason.as_str()))
            .collect();
        assert_eq!(
            missing,
            vec![
                ("Kubernetes", Priority::High, "Required for scaling"),
                ("Redis", Priority::Medium, "Caching optimization"),
                ("Terraform", Priority::Low, "Requested for this role"),
            ]
        );
        assert_eq!(result.missing[1].demand, Demand::Medium);
    }

    #[test]
    fn test_no_overlap_with_job_description() {
        let taxonomy = test_taxonomy();
        let (source, result) =
            match_skills(&candidates("Python and SQL"), &taxonomy, "Docker, k8s, Redis");

        assert_eq!(source, ReferenceSource::JobDescription);
        assert!(result.matched.is_empty());
        assert_eq!(
            names(&result.missing, |s| s.name.as_str()),
            vec!["Docker", "Kubernetes", "Redis"]
        );
        assert_eq!(result.match_percentage(), 0.0);
    }

    #[test]
    fn test_job_description_without_known_skills_is_neutral() {
        let taxonomy = test_taxonomy();
        let (source, result) =
            match_skills(&candidates("SQL"), &taxonomy, "Friendly team player wanted");

        assert_eq!(source, ReferenceSource::JobDescription);
        assert_eq!(result, SkillMatchResult::default());
        assert_eq!(result.match_percentage(), 50.0);
    }

    #[test]
    fn test_partition_covers_reference_set_exactly() {
        let taxonomy = test_taxonomy();
        let jd = "React, SQL, Docker, Python, Redis, React, Docker";
        let (_, reference) = reference_skills(&taxonomy, jd);
        let (_, result) = match_skills(&candidates("Expert React and Python"), &taxonomy, jd);

        let mut partition: Vec<String> = names(&result.matched, |s| s.name.as_str());
        partition.extend(names(&result.missing, |s| s.name.as_str()));
        partition.sort();
        let mut expected: Vec<String> = reference
            .iter()
            .map(|&i| taxonomy.skill(i).name.clone())
            .collect();
        expected.sort();

        assert_eq!(partition, expected);
        assert_eq!(result.matched[0].proficiency, Proficiency::Advanced);
    }
}
