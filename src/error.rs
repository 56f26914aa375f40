use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum DsxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid evidence in {file}: {message}")]
    Input { file: String, message: String },

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl DsxError {
    pub fn input(file: impl Into<String>, message: impl Into<String>) -> Self {
        DsxError::Input {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DsxError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            DsxError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Check that evidence files are valid JSON produced by the collector; run with --verbose for details.",
            ),
            DsxError::ConfigParse(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Fix the TOML syntax in the config file or pass --config with a valid file.",
            ),
            DsxError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Input,
                e.to_string(),
                "Verify URL/format (e.g., https://example.com).",
            ),
            DsxError::Input { file, message } => {
                let lower = message.to_ascii_lowercase();
                let remediation = if lower.contains("not found") || lower.contains("missing") {
                    format!(
                        "Point --input at the collector output directory; {} must exist there (or use --candidates-only).",
                        file
                    )
                } else {
                    format!("Regenerate {} with the collector and retry.", file)
                };
                ErrorPayload::new(
                    ErrorCategory::Input,
                    format!("{}: {}", file, message),
                    remediation,
                )
            }
            DsxError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("top_n") || lower.contains("top-n") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a top-n of at least 1 (default 12).",
                    )
                } else if lower.contains("breakpoint") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use NAME=WIDTHxHEIGHT entries separated by commas (e.g., desktop=1440x900,mobile=390x844).",
                    )
                } else if lower.contains("viewport") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use --viewport WIDTHxHEIGHT (e.g., 1440x900).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file values.",
                    )
                }
            }
            DsxError::Unknown(msg) => ErrorPayload::new(
                ErrorCategory::Unknown,
                msg.to_string(),
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, DsxError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Input,
    Io,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
