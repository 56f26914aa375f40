use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::types::{Candidate, ResultsDocument};
use crate::Viewport;

/// Schema version for output payloads.
pub const DSX_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum DsxOutput {
    Synthesize(ResultsDocument),
    Discover(DiscoverOutput),
    Error(ErrorOutput),
}

/// Ranked candidates from one discovery capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverOutput {
    pub version: String,
    pub viewport: Viewport,
    pub candidate_count: usize,
    pub candidates: Vec<Candidate>,
}

impl DiscoverOutput {
    pub fn new(viewport: Viewport, candidates: Vec<Candidate>) -> Self {
        Self {
            version: DSX_OUTPUT_VERSION.to_string(),
            viewport,
            candidate_count: candidates.len(),
            candidates,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ErrorCategory;
    use crate::evidence::EvidenceBatch;
    use crate::synthesis::build_results;

    #[test]
    fn synthesize_output_is_tagged_and_flat() {
        let doc = build_results(EvidenceBatch::default(), &Config::default());
        let output = DsxOutput::Synthesize(doc);
        let value = serde_json::to_value(&output).expect("serialize synthesize output");
        assert_eq!(value["mode"], "synthesize");
        assert_eq!(value["version"], DSX_OUTPUT_VERSION);
        assert!(value["tokens"]["primitive"].is_object());
    }

    #[test]
    fn discover_output_counts_candidates() {
        let output = DsxOutput::Discover(DiscoverOutput::new(Viewport::default(), Vec::new()));
        let json = serde_json::to_string(&output).expect("serialize discover output");
        assert!(json.contains("\"mode\":\"discover\""));
        assert!(json.contains("\"candidate_count\":0"));
        assert!(json.contains("\"width\":1440"));
    }

    #[test]
    fn error_output_round_trips() {
        let output = DsxOutput::Error(ErrorOutput {
            version: DSX_OUTPUT_VERSION.to_string(),
            message: None,
            error: ErrorPayload::new(
                ErrorCategory::Input,
                "samples.json missing".to_string(),
                "Point --input at a collector run directory.",
            ),
        });
        let json = serde_json::to_string(&output).expect("serialize error output");
        assert!(json.contains("\"mode\":\"error\""));
        assert!(!json.contains("\"message\":null"));

        let parsed: DsxOutput = serde_json::from_str(&json).expect("parse error output");
        match parsed {
            DsxOutput::Error(err) => assert_eq!(err.error.category, ErrorCategory::Input),
            other => panic!("expected error output, got {other:?}"),
        }
    }
}
