use serde::{Deserialize, Serialize};

use crate::analysis::models::{ScoreBand, SectionScore, SkillMatchResult};

/// Blend of section quality and skill match in the overall score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub sections: f64,
    pub skill_match: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            sections: 0.6,
            skill_match: 0.4,
        }
    }
}

/// Overall score: 0.6 × mean section score + 0.4 × match percentage, rounded.
pub fn compute_overall_score(
    sections: &[SectionScore],
    skill_match: &SkillMatchResult,
    weights: &ScoreWeights,
) -> u32 {
    let section_mean = if sections.is_empty() {
        0.0
    } else {
        sections.iter().map(|s| s.score as f64).sum::<f64>() / sections.len() as f64
    };
    let combined = weights.sections * section_mean + weights.skill_match * skill_match.match_percentage();
    combined.round().clamp(0.0, 100.0) as u32
}

pub fn score_band(overall_score: u32) -> ScoreBand {
    ScoreBand::from_score(overall_score)
}
