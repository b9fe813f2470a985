//! Recommendation Generator: ordered, capped improvement advice.
//!
//! Tiers, in order: section deficits by impact, high-priority missing skills,
//! a job-description prompt when none was given, then a closing item about
//! quantified achievements while Work Experience is below 90.
//!
//! When the deficit tier alone would overflow the cap, the absent sections
//! that do not fit share the last slot, so every missing section is named.

use crate::analysis::models::{
    Priority, Section, SectionScore, SectionStatus, SkillMatchResult,
};

/// Section weights (percent) used to rank deficits by impact.
const SECTION_WEIGHTS: &[(Section, u32)] = &[
    (Section::WorkExperience, 25),
    (Section::Skills, 15),
    (Section::Education, 12),
    (Section::ProfessionalSummary, 12),
    (Section::ContactInformation, 12),
    (Section::Projects, 12),
    (Section::Certifications, 6),
    (Section::Awards, 6),
];

const QUANTIFY_THRESHOLD: u32 = 90;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationKind {
    SectionDeficit(Section),
    /// Several absent sections folded into one item.
    MissingSections(Vec<Section>),
    MissingSkill,
    JobDescription,
    QuantifyAchievements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub text: String,
}

pub struct RecommendationInput<'a> {
    pub sections: &'a [SectionScore],
    pub skill_match: &'a SkillMatchResult,
    pub job_description_provided: bool,
}

pub fn generate_recommendations(input: &RecommendationInput<'_>, max: usize) -> Vec<Recommendation> {
    let mut recommendations = section_deficits(input.sections, max);

    for skill in &input.skill_match.missing {
        if skill.priority == Priority::High {
            recommendations.push(Recommendation {
                kind: RecommendationKind::MissingSkill,
                text: format!(
                    "Highlight or develop {} skills ({}): {}",
                    skill.name,
                    skill.category,
                    skill.reason.trim_end_matches('.')
                ),
            });
        }
    }

    if !input.job_description_provided {
        recommendations.push(Recommendation {
            kind: RecommendationKind::JobDescription,
            text: "Provide a job description to compare your résumé against a specific role"
                .to_string(),
        });
    }

    let experience_score = input
        .sections
        .iter()
        .find(|s| s.section == Section::WorkExperience)
        .map(|s| s.score)
        .unwrap_or(0);
    if experience_score < QUANTIFY_THRESHOLD {
        recommendations.push(Recommendation {
            kind: RecommendationKind::QuantifyAchievements,
            text: "Include quantifiable achievements and metrics to demonstrate impact".to_string(),
        });
    }

    recommendations.truncate(max);
    recommendations
}

fn weight_of(section: Section) -> u32 {
    SECTION_WEIGHTS
        .iter()
        .find(|(s, _)| *s == section)
        .map(|(_, w)| *w)
        .unwrap_or(0)
}

/// One item per NeedsImprovement/Missing section, highest impact first,
/// ties in canonical order. Absent sections past the cap are folded into the
/// final slot.
fn section_deficits(sections: &[SectionScore], max: usize) -> Vec<Recommendation> {
    let mut deficits: Vec<&SectionScore> = sections
        .iter()
        .filter(|s| matches!(s.status, SectionStatus::NeedsImprovement | SectionStatus::Missing))
        .collect();
    deficits.sort_by_key(|s| {
        let impact = weight_of(s.section) * (100 - s.score.min(100));
        (std::cmp::Reverse(impact), s.section)
    });

    if max == 0 || deficits.len() <= max {
        return deficits.into_iter().map(deficit_item).collect();
    }

    let overflow: Vec<&SectionScore> = deficits[max - 1..]
        .iter()
        .copied()
        .filter(|s| s.status == SectionStatus::Missing)
        .collect();
    let keep = if overflow.len() > 1 { max - 1 } else { max };
    let mut items: Vec<Recommendation> =
        deficits[..keep].iter().copied().map(deficit_item).collect();
    if overflow.len() > 1 {
        items.push(folded_missing_item(&overflow));
    }
    items
}

fn deficit_item(score: &SectionScore) -> Recommendation {
    Recommendation {
        kind: RecommendationKind::SectionDeficit(score.section),
        text: deficit_text(score.section, score.status).to_string(),
    }
}

fn folded_missing_item(absent: &[&SectionScore]) -> Recommendation {
    let names: Vec<&str> = absent.iter().map(|s| s.section.name()).collect();
    let listed = match names.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} and {last}", rest.join(", ")),
        _ => names.join(""),
    };
    Recommendation {
        kind: RecommendationKind::MissingSections(absent.iter().map(|s| s.section).collect()),
        text: format!("Add {listed} sections to round out your résumé"),
    }
}

fn deficit_text(section: Section, status: SectionStatus) -> &'static str {
    let missing = status == SectionStatus::Missing;
    match (section, missing) {
        (Section::ContactInformation, true) => {
            "Add a contact section with your email, phone number and LinkedIn or portfolio link"
        }
        (Section::ContactInformation, false) => {
            "Strengthen your contact details with a LinkedIn profile or portfolio URL"
        }
        (Section::ProfessionalSummary, true) => {
            "Add a professional summary that highlights your key achievements and target role"
        }
        (Section::ProfessionalSummary, false) => {
            "Strengthen your professional summary with key achievements and concrete numbers"
        }
        (Section::WorkExperience, true) => {
            "Add a work experience section listing your roles, dates and measurable results"
        }
        (Section::WorkExperience, false) => {
            "Strengthen your work experience with action verbs and measurable results"
        }
        (Section::Education, true) => {
            "Add an education section with your degree, institution and graduation dates"
        }
        (Section::Education, false) => {
            "Strengthen your education section with dates and relevant academic achievements"
        }
        (Section::Skills, true) => {
            "Add a skills section listing the tools and technologies you work with"
        }
        (Section::Skills, false) => {
            "Strengthen your skills section by listing more technologies, organized by category"
        }
        (Section::Projects, true) => {
            "Add a projects section to showcase practical application of your skills"
        }
        (Section::Projects, false) => {
            "Strengthen your projects with the tech stack used and measurable outcomes"
        }
        (Section::Certifications, true) => {
            "Add relevant industry certifications with their completion dates"
        }
        (Section::Certifications, false) => {
            "Strengthen your certifications with issuers, credential IDs and completion dates"
        }
        (Section::Awards, true) => {
            "Add professional awards or recognition with the dates you received them"
        }
        (Section::Awards, false) => {
            "Strengthen your awards with short descriptions and the dates you received them"
        }
    }
}
