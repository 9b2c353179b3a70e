//! Report orchestration: composes the job poller, the enrichment registry,
//! the scope builder, and the export pipeline behind one owner.
//!
//! The orchestrator owns every piece of mutable report state. The poller
//! and enrichment tasks only propose changes; merges land here, and
//! enrichment completions write exclusively to their own keyed slots.

pub mod enrichment;
pub mod poller;

pub use enrichment::{DeepSearchSessionState, EnrichmentRegistry, RowEnrichmentState};
pub use poller::{JobPoller, PollUpdate, PollerHandle, PollerPhase, DEFAULT_POLL_INTERVAL};

use crate::dispatch::RequestDispatcher;
use crate::models::{all_comparisons_terminal, normalize_source_name, JobState, ReportEntry};
use crate::reports::raster::TableCapture;
use crate::reports::table::TableContext;
use crate::reports::{document, json_export, raster, table, ExportArtifact, ExportError, ExportGuard};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Identity of one comparison job as submitted: the opaque server id plus
/// the display names that define column order in the rendered table.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    pub job_id: String,
    pub primary_name: String,
    pub comparison_sources: Vec<String>,
}

pub struct ReportOrchestrator {
    dispatcher: Arc<dyn RequestDispatcher>,
    descriptor: JobDescriptor,
    poll_interval: Duration,
    report: Vec<ReportEntry>,
    job_error: Option<String>,
    notes: HashMap<usize, String>,
    enrichment: EnrichmentRegistry,
    exports: ExportGuard,
    poller: Option<PollerHandle>,
    updates: Option<mpsc::UnboundedReceiver<PollUpdate>>,
}

impl ReportOrchestrator {
    pub fn new(dispatcher: Arc<dyn RequestDispatcher>, descriptor: JobDescriptor) -> Self {
        let enrichment = EnrichmentRegistry::new(Arc::clone(&dispatcher), &descriptor.job_id);
        Self {
            dispatcher,
            descriptor,
            poll_interval: DEFAULT_POLL_INTERVAL,
            report: Vec::new(),
            job_error: None,
            notes: HashMap::new(),
            enrichment,
            exports: ExportGuard::new(),
            poller: None,
            updates: None,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Starts the poll loop. Idempotent while a poller is running.
    pub fn start_polling(&mut self) {
        if self.poller.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        info!(job_id = %self.descriptor.job_id, "starting job polling");
        let poller = JobPoller::new(Arc::clone(&self.dispatcher)).with_interval(self.poll_interval);
        let (handle, updates) = poller.start(&self.descriptor.job_id);
        self.poller = Some(handle);
        self.updates = Some(updates);
    }

    /// Cancels polling and discards anything still queued or in flight.
    pub fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.cancel();
        }
        self.updates = None;
    }

    /// Next proposed update, or `None` once the poller has wound down.
    pub async fn next_update(&mut self) -> Option<PollUpdate> {
        self.updates.as_mut()?.recv().await
    }

    /// Applies one proposed update to the owned report state.
    pub fn apply_update(&mut self, update: PollUpdate) {
        match update {
            PollUpdate::Snapshot(entries) => {
                debug!(
                    job_id = %self.descriptor.job_id,
                    entries = entries.len(),
                    "merging report snapshot"
                );
                merge_snapshot(&mut self.report, entries);
            }
            PollUpdate::JobFailed(message) => {
                self.job_error = Some(message);
            }
        }
    }

    /// Drives polling to completion, applying every merge. Returns the
    /// final inferred job state.
    pub async fn run_until_terminal(&mut self) -> JobState {
        self.start_polling();
        while let Some(update) = self.next_update().await {
            self.apply_update(update);
        }
        self.job_state()
    }

    pub fn report(&self) -> &[ReportEntry] {
        &self.report
    }

    pub fn job_error(&self) -> Option<&str> {
        self.job_error.as_deref()
    }

    /// Job lifecycle inferred from the current view model.
    pub fn job_state(&self) -> JobState {
        if self.job_error.is_some() {
            JobState::Failed
        } else if self.report.is_empty() {
            JobState::Pending
        } else if all_comparisons_terminal(&self.report) {
            JobState::Complete
        } else {
            JobState::Partial
        }
    }

    pub fn enrichment(&self) -> &EnrichmentRegistry {
        &self.enrichment
    }

    /// Editable per-row note, included in document and raster exports.
    pub fn set_row_note(&mut self, row: usize, note: impl Into<String>) {
        self.notes.insert(row, note.into());
    }

    pub fn row_note(&self, row: usize) -> Option<&str> {
        self.notes.get(&row).map(String::as_str)
    }

    /// Rendered table over the current report, used by the document export
    /// and handed to the external rasterizer for capture.
    pub fn render_table(&self) -> String {
        table::render_report_table(&self.report, &self.table_context())
    }

    pub fn export_json(&self) -> Result<ExportArtifact, ExportError> {
        let _slot = self.exports.begin()?;
        json_export::export_json(&self.report)
    }

    pub fn export_document(&self) -> Result<ExportArtifact, ExportError> {
        let _slot = self.exports.begin()?;
        if self.report.is_empty() {
            return Err(ExportError::EmptyReport);
        }
        let table_html = table::render_report_table(&self.report, &self.table_context());
        Ok(document::export_document(
            &table_html,
            &self.descriptor.primary_name,
        ))
    }

    pub fn export_raster(&self, capture: &TableCapture) -> Result<ExportArtifact, ExportError> {
        let _slot = self.exports.begin()?;
        raster::export_raster(capture)
    }

    fn table_context(&self) -> TableContext<'_> {
        TableContext {
            primary_name: &self.descriptor.primary_name,
            comparison_sources: &self.descriptor.comparison_sources,
            notes: &self.notes,
        }
    }
}

/// Replaces the report with the incoming snapshot (the server sends the
/// complete current state, so the merge is last-write-wins per poll), with
/// one guard: a comparison that already reached a terminal status is never
/// regressed by a stale snapshot. Comparisons are matched by normalized
/// country name, not index, since results arrive asynchronously per source.
fn merge_snapshot(current: &mut Vec<ReportEntry>, mut incoming: Vec<ReportEntry>) {
    for (index, entry) in incoming.iter_mut().enumerate() {
        let Some(previous) = current.get(index) else {
            continue;
        };
        for comparison in &mut entry.country_comparisons {
            let key = normalize_source_name(&comparison.country_name);
            let prior = previous
                .country_comparisons
                .iter()
                .find(|candidate| normalize_source_name(&candidate.country_name) == key);
            if let Some(prior) = prior {
                if prior.status.is_terminal() && !comparison.status.is_terminal() {
                    *comparison = prior.clone();
                }
            }
        }
    }
    *current = incoming;
}
