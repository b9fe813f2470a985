use std::collections::BTreeMap;
use std::ops::Range;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Input
// ────────────────────────────────────────────────────────────────────────────

/// An uploaded résumé exactly as the caller received it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub bytes: Bytes,
    pub mime_type: String,
    pub filename: String,
    pub size: usize,
}

impl RawDocument {
    pub fn new(
        bytes: impl Into<Bytes>,
        mime_type: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        let bytes = bytes.into();
        let size = bytes.len();
        Self {
            bytes,
            mime_type: mime_type.into(),
            filename: filename.into(),
            size,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Canonical résumé sections, declared in the order they are always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "Contact Information")]
    ContactInformation,
    #[serde(rename = "Professional Summary")]
    ProfessionalSummary,
    #[serde(rename = "Work Experience")]
    WorkExperience,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Skills")]
    Skills,
    #[serde(rename = "Projects")]
    Projects,
    #[serde(rename = "Certifications")]
    Certifications,
    #[serde(rename = "Awards")]
    Awards,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::ContactInformation,
        Section::ProfessionalSummary,
        Section::WorkExperience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Certifications,
        Section::Awards,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::ContactInformation => "Contact Information",
            Section::ProfessionalSummary => "Professional Summary",
            Section::WorkExperience => "Work Experience",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Certifications => "Certifications",
            Section::Awards => "Awards",
        }
    }
}

/// Label attached to a span of extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    Canonical(Section),
    /// Recognized heading outside the canonical taxonomy (Interests, References, ...).
    /// Never scored.
    Unclassified,
}

/// A contiguous byte range of `ExtractedText::text`.
/// `body_start` marks where content begins after the heading line (or inline `Heading:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub label: SectionLabel,
    pub range: Range<usize>,
    pub body_start: usize,
}

/// Normalized document text plus ordered section spans.
///
/// Spans never overlap and together cover `text` from the first byte to the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub spans: Vec<SectionSpan>,
}

impl ExtractedText {
    pub fn body_text(&self, span: &SectionSpan) -> &str {
        &self.text[span.body_start..span.range.end]
    }

    /// Bodies of every span labelled with `section`, in document order.
    pub fn bodies_of(&self, section: Section) -> Vec<&str> {
        self.spans
            .iter()
            .filter(|s| s.label == SectionLabel::Canonical(section))
            .map(|s| self.body_text(s))
            .collect()
    }

    /// True when spans are contiguous, non-overlapping and cover the whole text.
    pub fn spans_cover_text(&self) -> bool {
        let mut cursor = 0;
        for span in &self.spans {
            if span.range.start != cursor
                || span.range.end < span.range.start
                || span.body_start < span.range.start
                || span.body_start > span.range.end
            {
                return false;
            }
            cursor = span.range.end;
        }
        cursor == self.text.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Missing,
}

impl SectionStatus {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => SectionStatus::Excellent,
            s if s >= 70 => SectionStatus::Good,
            s if s >= 40 => SectionStatus::NeedsImprovement,
            _ => SectionStatus::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    #[serde(rename = "name")]
    pub section: Section,
    pub score: u32,
    pub status: SectionStatus,
}

impl SectionScore {
    /// Builds a score with its status derived; the only way status is set.
    pub fn new(section: Section, score: u32) -> Self {
        let score = score.min(100);
        Self {
            section,
            score,
            status: SectionStatus::from_score(score),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Proficiency {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Demand {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl From<Demand> for Priority {
    fn from(demand: Demand) -> Self {
        match demand {
            Demand::High => Priority::High,
            Demand::Medium => Priority::Medium,
            Demand::Low => Priority::Low,
        }
    }
}

/// A skill found in the résumé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub name: String,
    pub category: String,
    pub proficiency: Proficiency,
    pub demand: Demand,
}

/// A reference skill the résumé does not mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingSkill {
    pub name: String,
    pub category: String,
    pub demand: Demand,
    pub priority: Priority,
    pub reason: String,
}

/// Partition of the reference skill set. Both lists keep reference order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatchResult {
    pub matched: Vec<SkillRecord>,
    pub missing: Vec<MissingSkill>,
}

impl SkillMatchResult {
    pub fn counts(&self) -> SkillMatchCounts {
        SkillMatchCounts {
            matched: self.matched.len(),
            missing: self.missing.len(),
        }
    }

    /// Share of the reference set present in the résumé, 0–100.
    /// An empty reference set is neutral (50) rather than undefined.
    pub fn match_percentage(&self) -> f64 {
        let total = self.matched.len() + self.missing.len();
        if total == 0 {
            return 50.0;
        }
        100.0 * self.matched.len() as f64 / total as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatchCounts {
    pub matched: usize,
    pub missing: usize,
}

/// Lowercase keyword → occurrence count. Ordered so serialization is stable.
pub type KeywordFrequency = BTreeMap<String, u32>;

/// The `n` most frequent keywords, ties broken alphabetically.
pub fn top_keywords(keywords: &KeywordFrequency, n: usize) -> Vec<(&str, u32)> {
    let mut ranked: Vec<(&str, u32)> = keywords.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(n);
    ranked
}

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    /// Poor [0,40), Fair [40,70), Good [70,85), Excellent [85,100].
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 85 => ScoreBand::Excellent,
            s if s >= 70 => ScoreBand::Good,
            s if s >= 40 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Poor => "Poor",
            ScoreBand::Fair => "Fair",
            ScoreBand::Good => "Good",
            ScoreBand::Excellent => "Excellent",
        }
    }
}

/// Where the reference skill set of an analysis came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    JobDescription,
    Baseline,
}

/// The artifact handed to the presentation layer. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u32,
    pub skill_match: SkillMatchCounts,
    pub sections: Vec<SectionScore>,
    pub keywords: KeywordFrequency,
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// The artifact plus the intermediate products the job-match and summary views render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub result: AnalysisResult,
    pub band: ScoreBand,
    pub match_percentage: u32,
    pub reference_source: ReferenceSource,
    pub candidate_skills: Vec<SkillRecord>,
    pub skill_match: SkillMatchResult,
}
