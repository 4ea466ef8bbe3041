//! JSON rendering for exam documents.

use crate::error::{Error, Result};
use crate::model::ExamDocument;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an exam document to JSON.
pub fn to_json(doc: &ExamDocument, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    Ok(result?)
}

/// Parse an exam document from JSON.
pub fn from_json(json: &str) -> Result<ExamDocument> {
    serde_json::from_str(json).map_err(Error::from)
}
