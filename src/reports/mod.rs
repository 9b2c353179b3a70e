//! Export pipeline: three independent serializations of the same report
//! (raw JSON, word-processor document, single rasterized page). Exports
//! share an in-flight guard but never each other's failure.

pub mod document;
pub mod json_export;
pub mod raster;
pub mod table;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// A downloadable artifact produced entirely on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("an export is already in progress")]
    InFlight,
    #[error("the report is empty; nothing to export")]
    EmptyReport,
    #[error("invalid table capture: {0}")]
    InvalidCapture(String),
    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Allows at most one export operation at a time, mirroring the single
/// `isExporting` flag the view holds to avoid overlapping captures.
#[derive(Debug, Default)]
pub struct ExportGuard {
    busy: Arc<AtomicBool>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard for one export. Fails while another claim is live;
    /// the claim releases when the returned slot drops.
    pub fn begin(&self) -> Result<ExportSlot, ExportError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ExportError::InFlight);
        }
        Ok(ExportSlot {
            busy: Arc::clone(&self.busy),
        })
    }
}

pub struct ExportSlot {
    busy: Arc<AtomicBool>,
}

impl Drop for ExportSlot {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
