use thiserror::Error;

/// Failures surfaced by the analysis engine.
///
/// Every variant stems from the input or from reference data, so none of them
/// is retried inside the engine. Callers render `user_message()` rather than
/// the `Display` text, which may carry decoder details.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Document is {size} bytes, above the {max} byte limit")]
    OversizedDocument { size: usize, max: usize },

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    #[error("Document contains no readable text")]
    EmptyDocument,

    #[error("Skill taxonomy unavailable: {0}")]
    TaxonomyUnavailable(String),
}

impl AnalysisError {
    /// Stable machine-readable category for the presentation layer.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AnalysisError::OversizedDocument { .. } => "OVERSIZED_DOCUMENT",
            AnalysisError::CorruptDocument(_) => "CORRUPT_DOCUMENT",
            AnalysisError::EmptyDocument => "EMPTY_DOCUMENT",
            AnalysisError::TaxonomyUnavailable(_) => "TAXONOMY_UNAVAILABLE",
        }
    }

    /// Short message suitable for a retry prompt.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::UnsupportedFormat(_) => {
                "Please upload a PDF, DOC, or DOCX file".to_string()
            }
            AnalysisError::OversizedDocument { max, .. } => format!(
                "Please upload a file under {} MB",
                (*max as f64 / (1024.0 * 1024.0)).round() as u64
            ),
            AnalysisError::CorruptDocument(_) => {
                "The file could not be read. Try exporting it again".to_string()
            }
            AnalysisError::EmptyDocument => {
                "No text was found in the file. Scanned images are not supported".to_string()
            }
            AnalysisError::TaxonomyUnavailable(_) => {
                "The analysis service is temporarily unavailable".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            AnalysisError::UnsupportedFormat("text/plain".into()),
            AnalysisError::OversizedDocument { size: 2, max: 1 },
            AnalysisError::CorruptDocument("bad".into()),
            AnalysisError::EmptyDocument,
            AnalysisError::TaxonomyUnavailable("missing".into()),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_oversized_message_reports_limit_in_mb() {
        let err = AnalysisError::OversizedDocument {
            size: 11 * 1024 * 1024,
            max: 10 * 1024 * 1024,
        };
        assert!(err.user_message().contains("10 MB"));
    }

    #[test]
    fn test_user_message_hides_decoder_details() {
        let err = AnalysisError::CorruptDocument("lopdf: invalid xref offset 0x1f".into());
        assert!(!err.user_message().contains("xref"));
    }
}
