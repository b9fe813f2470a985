use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline entry point. Default: `AnalysisEngine` over the loaded taxonomy.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
    pub config: Config,
}
