use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::models::{
    AnalysisResult, DetailedAnalysis, MissingSkill, RawDocument, ReferenceSource, ScoreBand,
    SkillRecord,
};
use crate::errors::AppError;
use crate::state::AppState;

/// The multipart form shared by all analysis endpoints.
pub struct AnalysisUpload {
    pub document: RawDocument,
    pub job_description: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatchResponse {
    pub match_percentage: u32,
    pub reference_source: ReferenceSource,
    pub candidate_skills: Vec<SkillRecord>,
    pub matched: Vec<SkillRecord>,
    pub missing: Vec<MissingSkill>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub overall_score: u32,
    pub band: ScoreBand,
    pub summary: String,
}

/// Reads the `file` part and the optional `job_description` part.
pub async fn read_upload(mut multipart: Multipart) -> Result<AnalysisUpload, AppError> {
    let mut document = None;
    let mut job_description = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                document = Some(RawDocument::new(bytes, mime_type, filename));
            }
            "job_description" | "jobDescription" => job_description = field.text().await?,
            _ => {}
        }
    }

    let document = document
        .ok_or_else(|| AppError::Validation("Multipart field 'file' is required".to_string()))?;
    Ok(AnalysisUpload {
        document,
        job_description,
    })
}

/// Runs one analysis under the configured processing deadline.
async fn run_analysis(
    state: &AppState,
    upload: AnalysisUpload,
    endpoint: &str,
) -> Result<DetailedAnalysis, AppError> {
    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        endpoint,
        filename = %upload.document.filename,
        size = upload.document.size,
        with_job_description = !upload.job_description.trim().is_empty(),
        "Analysis requested"
    );

    let secs = state.config.processing_timeout_secs;
    let analysis = state
        .analyzer
        .analyze(upload.document, upload.job_description);
    match tokio::time::timeout(Duration::from_secs(secs), analysis).await {
        Ok(result) => result.inspect_err(|e| warn!(%request_id, "Analysis failed: {e}")),
        Err(_) => {
            warn!(%request_id, "Analysis timed out after {secs}s");
            Err(AppError::Timeout(secs))
        }
    }
}

/// POST /api/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let upload = read_upload(multipart).await?;
    let detailed = run_analysis(&state, upload, "analyze").await?;
    Ok(Json(detailed.result))
}

/// POST /api/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<JobMatchResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let detailed = run_analysis(&state, upload, "job-match").await?;
    Ok(Json(JobMatchResponse {
        match_percentage: detailed.match_percentage,
        reference_source: detailed.reference_source,
        candidate_skills: detailed.candidate_skills,
        matched: detailed.skill_match.matched,
        missing: detailed.skill_match.missing,
    }))
}

/// POST /api/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let detailed = run_analysis(&state, upload, "summary").await?;
    Ok(Json(SummaryResponse {
        overall_score: detailed.result.overall_score,
        band: detailed.band,
        summary: detailed.result.summary,
    }))
}
