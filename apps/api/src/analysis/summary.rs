//! Narrative summary of an analysis.
//!
//! `AnalysisEngine` holds an `Arc<dyn SummaryGenerator>`; `TemplateSummary`
//! is the default and is fully deterministic.

use crate::analysis::models::{
    Priority, ReferenceSource, ScoreBand, SectionScore, SkillMatchResult,
};

const MAX_LISTED_GAPS: usize = 3;

/// Everything a summary may draw on, computed by earlier stages.
pub struct SummaryContext<'a> {
    pub overall_score: u32,
    pub band: ScoreBand,
    pub sections: &'a [SectionScore],
    pub skill_match: &'a SkillMatchResult,
    pub reference_source: ReferenceSource,
}

pub trait SummaryGenerator: Send + Sync {
    fn summarize(&self, ctx: &SummaryContext<'_>) -> String;
}

/// Sentence templates filled from the scores.
pub struct TemplateSummary;

impl SummaryGenerator for TemplateSummary {
    fn summarize(&self, ctx: &SummaryContext<'_>) -> String {
        let mut sentences = vec![format!(
            "{} résumé with an overall score of {}/100.",
            ctx.band.label(),
            ctx.overall_score
        )];

        let mut present: Vec<&SectionScore> = ctx.sections.iter().filter(|s| s.score > 0).collect();
        present.sort_by_key(|s| (std::cmp::Reverse(s.score), s.section));
        match present.as_slice() {
            [] => sentences.push("No standard résumé sections were recognized.".to_string()),
            [only] => sentences.push(format!(
                "Strongest section: {} ({}).",
                only.section.name(),
                only.score
            )),
            [first, second, ..] => sentences.push(format!(
                "Strongest sections: {} ({}) and {} ({}).",
                first.section.name(),
                first.score,
                second.section.name(),
                second.score
            )),
        }

        let counts = ctx.skill_match.counts();
        let total = counts.matched + counts.missing;
        let reference = match ctx.reference_source {
            ReferenceSource::JobDescription => "the job description",
            ReferenceSource::Baseline => "the baseline skill set",
        };
        if total == 0 {
            sentences.push(format!("No skills from {reference} were available to compare."));
        } else {
            sentences.push(format!(
                "Matches {} of {} skills from {}.",
                counts.matched, total, reference
            ));
        }

        let gaps: Vec<&str> = ctx
            .skill_match
            .missing
            .iter()
            .filter(|m| m.priority == Priority::High)
            .take(MAX_LISTED_GAPS)
            .map(|m| m.name.as_str())
            .collect();
        if !gaps.is_empty() {
            sentences.push(format!("Priority skill gaps: {}.", gaps.join(", ")));
        }

        let absent: Vec<&str> = ctx
            .sections
            .iter()
            .filter(|s| s.score == 0)
            .map(|s| s.section.name())
            .collect();
        if !absent.is_empty() {
            sentences.push(format!("Missing sections: {}.", absent.join(", ")));
        }

        sentences.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{Demand, MissingSkill, Section};

    fn gap(name: &str, priority: Priority) -> MissingSkill {
        MissingSkill {
            name: name.to_string(),
            category: "Database".to_string(),
            demand: Demand::High,
            priority,
            reason: "Caching optimization".to_string(),
        }
    }

    #[test]
    fn test_full_summary() {
        let sections: Vec<SectionScore> = Section::ALL
            .iter()
            .zip([100, 93, 100, 93, 100, 95, 0, 0])
            .map(|(&s, score)| SectionScore::new(s, score))
            .collect();
        let skill_match = SkillMatchResult {
            matched: vec![],
            missing: vec![gap("SQL", Priority::High), gap("Redis", Priority::Medium)],
        };
        let ctx = SummaryContext {
            overall_score: 56,
            band: ScoreBand::Fair,
            sections: &sections,
            skill_match: &skill_match,
            reference_source: ReferenceSource::JobDescription,
        };

        assert_eq!(
            TemplateSummary.summarize(&ctx),
            "Fair résumé with an overall score of 56/100. \
             Strongest sections: Contact Information (100) and Work Experience (100). \
             Matches 0 of 2 skills from the job description. \
             Priority skill gaps: SQL. \
             Missing sections: Certifications, Awards."
        );
    }

    #[test]
    fn test_summary_for_unrecognized_document() {
        let sections: Vec<SectionScore> = Section::ALL
            .iter()
            .map(|&s| SectionScore::new(s, 0))
            .collect();
        let ctx = SummaryContext {
            overall_score: 20,
            band: ScoreBand::Poor,
            sections: &sections,
            skill_match: &SkillMatchResult::default(),
            reference_source: ReferenceSource::Baseline,
        };
        let summary = TemplateSummary.summarize(&ctx);
        assert!(summary.starts_with("Poor résumé with an overall score of 20/100."));
        assert!(summary.contains("No standard résumé sections were recognized."));
        assert!(summary.contains("No skills from the baseline skill set"));
    }
}
