//! Error types for salvor.

use crate::model::objects::PDFObjRef;
use thiserror::Error;

/// Primary error type for salvor operations.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("malformed document at offset {offset}: {msg}")]
    Format { offset: u64, msg: String },

    #[error("malformed dictionary entry /{key}: {msg}")]
    MalformedDictionary { key: String, msg: String },

    #[error(
        "brute-force object scan aborted at offset {offset} after {steps} steps without progress"
    )]
    NonTermination { offset: u64, steps: usize },

    #[error("security handler cannot initialize: /{field} is required for revision {revision}")]
    MissingRequiredField { field: String, revision: i64 },

    #[error("unsupported encryption algorithm: V={}", .0.map_or_else(|| "absent".to_string(), |v| v.to_string()))]
    UnsupportedAlgorithm(Option<i64>),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("content stream error in `{operator}`: {msg}")]
    Content { operator: String, msg: String },

    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    #[error("key not found: {0}")]
    KeyError(String),

    #[error("PDF object not found: {0}")]
    ObjectNotFound(PDFObjRef),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfError {
    pub(crate) fn content(operator: &str, msg: impl Into<String>) -> Self {
        Self::Content {
            operator: operator.to_string(),
            msg: msg.into(),
        }
    }
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_termination_message_names_offset() {
        let err = PdfError::NonTermination {
            offset: 42,
            steps: 1_000_001,
        };
        assert!(err.to_string().contains("offset 42"));
    }

    #[test]
    fn unsupported_algorithm_without_version() {
        let err = PdfError::UnsupportedAlgorithm(None);
        assert_eq!(err.to_string(), "unsupported encryption algorithm: V=absent");
    }

    #[test]
    fn missing_field_names_revision() {
        let err = PdfError::MissingRequiredField {
            field: "OE".into(),
            revision: 6,
        };
        assert!(err.to_string().contains("/OE"));
        assert!(err.to_string().contains("revision 6"));
    }
}
