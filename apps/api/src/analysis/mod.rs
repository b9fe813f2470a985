// Résumé analysis pipeline.
// extractor → (sections ∥ keywords) → matcher → scoring → recommendations → summary
// Stateless per call; the engine only holds read-only reference data.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod keywords;
pub mod matcher;
pub mod models;
pub mod recommendations;
pub mod scoring;
pub mod sections;
pub mod signals;
pub mod summary;
pub mod taxonomy;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use error::AnalysisError;
use keywords::{extract_keywords, KeywordExtraction};
use models::{
    top_keywords, AnalysisResult, DetailedAnalysis, ExtractedText, RawDocument, SectionScore,
};
use recommendations::{generate_recommendations, RecommendationInput};
use scoring::{compute_overall_score, score_band, ScoreWeights};
use sections::classify_sections;
use summary::{SummaryContext, SummaryGenerator, TemplateSummary};
use taxonomy::Taxonomy;

/// Engine-facing configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_upload_size_bytes: usize,
    pub max_recommendations: usize,
    pub enable_summary_generation: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: 10 * 1024 * 1024,
            max_recommendations: 5,
            enable_summary_generation: true,
        }
    }
}

/// Runs the full pipeline against a taxonomy supplied at construction.
#[derive(Clone)]
pub struct AnalysisEngine {
    taxonomy: Arc<Taxonomy>,
    config: EngineConfig,
    weights: ScoreWeights,
    summarizer: Arc<dyn SummaryGenerator>,
}

impl AnalysisEngine {
    pub fn new(taxonomy: Arc<Taxonomy>, config: EngineConfig) -> Self {
        Self {
            taxonomy,
            config,
            weights: ScoreWeights::default(),
            summarizer: Arc::new(TemplateSummary),
        }
    }

    pub fn with_summary_generator(mut self, summarizer: Arc<dyn SummaryGenerator>) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Analyzes one document. `job_description` may be empty.
    pub fn analyze(
        &self,
        document: &RawDocument,
        job_description: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        Ok(self.analyze_detailed(document, job_description)?.result)
    }

    /// Like `analyze`, also returning the skill detail behind the counts.
    pub fn analyze_detailed(
        &self,
        document: &RawDocument,
        job_description: &str,
    ) -> Result<DetailedAnalysis, AnalysisError> {
        let extracted = self.extract(document)?;
        let sections = classify_sections(&extracted);
        let extraction = extract_keywords(&extracted.text, &self.taxonomy);
        Ok(self.assemble(document, job_description, sections, extraction))
    }

    /// Size check, then decoding. Oversized input is never decoded.
    fn extract(&self, document: &RawDocument) -> Result<ExtractedText, AnalysisError> {
        extractor::ensure_within_limit(document, self.config.max_upload_size_bytes)
            .and_then(|_| extractor::extract(document))
            .inspect_err(|e| {
                warn!(
                    filename = %document.filename,
                    mime_type = %document.mime_type,
                    size = document.size,
                    code = e.code(),
                    "Rejected document: {e}"
                )
            })
    }

    fn assemble(
        &self,
        document: &RawDocument,
        job_description: &str,
        sections: Vec<SectionScore>,
        extraction: KeywordExtraction,
    ) -> DetailedAnalysis {
        let KeywordExtraction {
            keywords,
            candidate_skills,
        } = extraction;
        debug!(
            distinct_keywords = keywords.len(),
            candidate_skills = candidate_skills.len(),
            "Top keywords: {:?}",
            top_keywords(&keywords, 5)
        );

        let (reference_source, skill_match) =
            matcher::match_skills(&candidate_skills, &self.taxonomy, job_description);
        let overall_score = compute_overall_score(&sections, &skill_match, &self.weights);
        let band = score_band(overall_score);

        let recommendations = generate_recommendations(
            &RecommendationInput {
                sections: &sections,
                skill_match: &skill_match,
                job_description_provided: !job_description.trim().is_empty(),
            },
            self.config.max_recommendations,
        )
        .into_iter()
        .map(|r| r.text)
        .collect();

        let summary = if self.config.enable_summary_generation {
            self.summarizer.summarize(&SummaryContext {
                overall_score,
                band,
                sections: &sections,
                skill_match: &skill_match,
                reference_source,
            })
        } else {
            String::new()
        };

        info!(
            filename = %document.filename,
            overall_score,
            band = band.label(),
            matched = skill_match.matched.len(),
            missing = skill_match.missing.len(),
            "Analysis complete"
        );

        DetailedAnalysis {
            match_percentage: skill_match.match_percentage().round() as u32,
            result: AnalysisResult {
                overall_score,
                skill_match: skill_match.counts(),
                sections,
                keywords,
                summary,
                recommendations,
            },
            band,
            reference_source,
            candidate_skills,
            skill_match,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Async seam used by the HTTP layer
// ────────────────────────────────────────────────────────────────────────────

/// Carried in `AppState` as `Arc<dyn ResumeAnalyzer>`.
#[async_trait]
pub trait ResumeAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        document: RawDocument,
        job_description: String,
    ) -> Result<DetailedAnalysis, AppError>;

    fn taxonomy_version(&self) -> &str;
}

fn join_failure(e: tokio::task::JoinError) -> AppError {
    AppError::Internal(anyhow::Error::new(e).context("analysis task failed"))
}

/// Decoding runs on the blocking pool; section scoring and keyword
/// extraction then run as two concurrent blocking tasks.
#[async_trait]
impl ResumeAnalyzer for AnalysisEngine {
    async fn analyze(
        &self,
        document: RawDocument,
        job_description: String,
    ) -> Result<DetailedAnalysis, AppError> {
        let engine = self.clone();
        let raw = document.clone();
        let extracted = tokio::task::spawn_blocking(move || engine.extract(&raw))
            .await
            .map_err(join_failure)??;

        let extracted = Arc::new(extracted);
        let for_sections = Arc::clone(&extracted);
        let taxonomy = Arc::clone(&self.taxonomy);
        let (sections, extraction) = tokio::try_join!(
            tokio::task::spawn_blocking(move || classify_sections(&for_sections)),
            tokio::task::spawn_blocking(move || extract_keywords(&extracted.text, &taxonomy)),
        )
        .map_err(join_failure)?;

        Ok(self.assemble(&document, &job_description, sections, extraction))
    }

    fn taxonomy_version(&self) -> &str {
        self.taxonomy.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{docx_document, test_taxonomy, SAMPLE_RESUME};
    use crate::analysis::models::{ReferenceSource, Section, SectionStatus};

    fn engine(config: EngineConfig) -> AnalysisEngine {
        AnalysisEngine::new(Arc::new(test_taxonomy()), config)
    }

    fn score_of(result: &AnalysisResult, section: Section) -> &SectionScore {
        result.sections.iter().find(|s| s.section == section).unwrap()
    }

    #[test]
    fn test_sample_resume_scenario() {
        let result = engine(EngineConfig::default())
            .analyze(&docx_document(SAMPLE_RESUME), "")
            .unwrap();

        assert!(score_of(&result, Section::WorkExperience).score >= 80);
        for absent in [Section::Certifications, Section::Awards] {
            let s = score_of(&result, absent);
            assert_eq!((s.score, s.status), (0, SectionStatus::Missing));
        }
        let recs = result.recommendations.join("\n").to_lowercase();
        assert!(recs.contains("certifications"));
        assert!(recs.contains("awards"));
        assert!(recs.contains("provide a job description"));
        assert!(result.overall_score <= 100);
        assert!(!result.summary.is_empty());
    }

    #[test]
    fn test_minimal_resume_names_every_absent_section() {
        let text = "Jane Doe\njane@example.com | +1 555 123 4567\nPortfolio: https://janedoe.dev\n\
                    Experience\nPlatform Engineer, Acme Corp, Jan 2019 - Present\n\
                    - Cut cloud spend by 30% by rightsizing the compute fleet\n\
                    - Grew checkout conversion 12% with a faster payment flow\n\
                    - Automated 14 release steps and saved 6 hours per week";
        let result = engine(EngineConfig::default())
            .analyze(&docx_document(text), "")
            .unwrap();

        assert!(score_of(&result, Section::WorkExperience).score >= 80);
        assert_eq!(score_of(&result, Section::Projects).score, 0);
        assert!(score_of(&result, Section::ContactInformation).score >= 90);
        for absent in [Section::Certifications, Section::Awards] {
            let s = score_of(&result, absent);
            assert_eq!((s.score, s.status), (0, SectionStatus::Missing));
        }
        assert_eq!(result.recommendations.len(), 5);
        let recs = result.recommendations.join("\n").to_lowercase();
        assert!(recs.contains("certifications"));
        assert!(recs.contains("awards"));
    }

    #[test]
    fn test_sections_always_canonical() {
        let result = engine(EngineConfig::default())
            .analyze(&docx_document("Jane Doe\nSQL"), "")
            .unwrap();
        let order: Vec<Section> = result.sections.iter().map(|s| s.section).collect();
        assert_eq!(order, Section::ALL.to_vec());
    }

    #[test]
    fn test_repeated_analysis_is_byte_identical() {
        let engine = engine(EngineConfig::default());
        let doc = docx_document(SAMPLE_RESUME);
        let jd = "Looking for React, SQL and Kubernetes experience";
        let first = serde_json::to_string(&engine.analyze(&doc, jd).unwrap()).unwrap();
        let second = serde_json::to_string(&engine.analyze(&doc, jd).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_oversized_rejected_before_decoding() {
        let engine = engine(EngineConfig {
            max_upload_size_bytes: 16,
            ..EngineConfig::default()
        });
        let doc = RawDocument::new(vec![0xAB; 17], "text/plain", "junk.bin");
        let err = engine.analyze(&doc, "").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::OversizedDocument { size: 17, max: 16 }
        ));
    }

    #[test]
    fn test_baseline_match_scenario() {
        let detailed = engine(EngineConfig::default())
            .analyze_detailed(&docx_document("Skills\nJavaScript, React"), "")
            .unwrap();

        assert_eq!(detailed.reference_source, ReferenceSource::Baseline);
        assert_eq!(detailed.result.skill_match.matched, 2);
        assert_eq!(detailed.result.skill_match.missing, 1);
        assert_eq!(detailed.skill_match.missing[0].name, "SQL");
        assert_eq!(detailed.match_percentage, 67);
    }

    #[test]
    fn test_job_description_without_overlap() {
        let detailed = engine(EngineConfig {
            max_recommendations: 20,
            ..EngineConfig::default()
        })
        .analyze_detailed(&docx_document(SAMPLE_RESUME), "Kubernetes and Terraform")
        .unwrap();

        assert_eq!(detailed.result.skill_match.matched, 0);
        let missing: Vec<&str> = detailed
            .skill_match
            .missing
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(missing, vec!["Kubernetes", "Terraform"]);
        assert!(!detailed
            .result
            .recommendations
            .iter()
            .any(|r| r.contains("Provide a job description")));
    }

    #[test]
    fn test_recommendations_capped() {
        let result = engine(EngineConfig {
            max_recommendations: 2,
            ..EngineConfig::default()
        })
        .analyze(&docx_document("Jane Doe"), "")
        .unwrap();
        assert_eq!(result.recommendations.len(), 2);
    }

    #[test]
    fn test_summary_disabled_leaves_everything_else_unchanged() {
        let doc = docx_document(SAMPLE_RESUME);
        let with = engine(EngineConfig::default()).analyze(&doc, "").unwrap();
        let without = engine(EngineConfig {
            enable_summary_generation: false,
            ..EngineConfig::default()
        })
        .analyze(&doc, "")
        .unwrap();

        assert_eq!(without.summary, "");
        assert_eq!(
            AnalysisResult {
                summary: String::new(),
                ..with
            },
            without
        );
    }

    struct FixedSummary;

    impl SummaryGenerator for FixedSummary {
        fn summarize(&self, ctx: &SummaryContext<'_>) -> String {
            format!("score={}", ctx.overall_score)
        }
    }

    #[test]
    fn test_custom_summary_generator() {
        let engine =
            engine(EngineConfig::default()).with_summary_generator(Arc::new(FixedSummary));
        let result = engine.analyze(&docx_document(SAMPLE_RESUME), "").unwrap();
        assert_eq!(result.summary, format!("score={}", result.overall_score));
    }

    #[tokio::test]
    async fn test_async_path_matches_sync_path() {
        let engine = engine(EngineConfig::default());
        let doc = docx_document(SAMPLE_RESUME);
        let jd = "React and Kubernetes";

        let sync = engine.analyze_detailed(&doc, jd).unwrap();
        let analyzer: Arc<dyn ResumeAnalyzer> = Arc::new(engine.clone());
        let async_result = analyzer.analyze(doc, jd.to_string()).await.unwrap();

        assert_eq!(sync, async_result);
        assert_eq!(analyzer.taxonomy_version(), "test-1");
    }

    #[tokio::test]
    async fn test_async_path_surfaces_analysis_errors() {
        let analyzer: Arc<dyn ResumeAnalyzer> = Arc::new(engine(EngineConfig::default()));
        let doc = RawDocument::new(b"hello".to_vec(), "text/plain", "notes.txt");
        let err = analyzer.analyze(doc, String::new()).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Analysis(AnalysisError::UnsupportedFormat(_))
        ));
    }
}
