//! Canonical raw export: the report collection pretty-printed as JSON.
//! Lossless; parsing it back yields a structurally identical collection.

use super::{ExportArtifact, ExportError};
use crate::models::ReportEntry;

pub const JSON_FILE_NAME: &str = "comparison_results.json";
pub const JSON_MIME: &str = "application/json;charset=utf-8";

pub fn export_json(entries: &[ReportEntry]) -> Result<ExportArtifact, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::EmptyReport);
    }
    let bytes = serde_json::to_vec_pretty(entries)
        .map_err(|err| ExportError::Serialize(err.to_string()))?;
    Ok(ExportArtifact {
        file_name: JSON_FILE_NAME.to_string(),
        mime_type: JSON_MIME.to_string(),
        bytes,
    })
}
