//! Keyed, independently triggered enrichment state: per-row AI suggestions
//! and the per-modal-session deep-search flow.
//!
//! Rows are isolated: a completion callback writes only its own slot, and a
//! per-row generation counter (suggestions) or session epoch (deep search)
//! discards responses that arrive after the owning context moved on.
//! Enrichment failures are row/session-local and never escalate to the job.

use crate::dispatch::{
    RequestDispatcher, GENERIC_SEARCH_FAILURE, GENERIC_SUGGESTION_FAILURE,
};
use crate::models::{DeepSearchOutcome, DeepSearchSeed, Suggestion};
use crate::scope::AppliedScope;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

/// Async state of one row's suggestion request. At most one of
/// `data`/`error` is set; `loading` excludes both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowEnrichmentState {
    pub loading: bool,
    pub data: Option<Suggestion>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct RowSlot {
    generation: u64,
    state: RowEnrichmentState,
}

/// Snapshot of the deep-search modal session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeepSearchSessionState {
    pub row: Option<usize>,
    pub preparing: bool,
    pub seed: Option<DeepSearchSeed>,
    pub executing: bool,
    pub outcome: Option<DeepSearchOutcome>,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct SessionSlot {
    epoch: u64,
    state: DeepSearchSessionState,
}

pub struct EnrichmentRegistry {
    dispatcher: Arc<dyn RequestDispatcher>,
    job_id: String,
    rows: Arc<Mutex<HashMap<usize, RowSlot>>>,
    session: Arc<Mutex<SessionSlot>>,
}

impl EnrichmentRegistry {
    pub fn new(dispatcher: Arc<dyn RequestDispatcher>, job_id: impl Into<String>) -> Self {
        Self {
            dispatcher,
            job_id: job_id.into(),
            rows: Arc::new(Mutex::new(HashMap::new())),
            session: Arc::new(Mutex::new(SessionSlot::default())),
        }
    }

    /// Requests a suggestion for `row`. A no-op returning `None` while a
    /// request for that row is already in flight; a call after completion
    /// or failure starts a fresh request that overwrites the prior result.
    pub fn request_suggestion(&self, row: usize) -> Option<JoinHandle<()>> {
        let generation = {
            let mut rows = lock(&self.rows);
            let slot = rows.entry(row).or_default();
            if slot.state.loading {
                debug!(row, "suggestion already in flight, ignoring");
                return None;
            }
            slot.generation += 1;
            slot.state = RowEnrichmentState {
                loading: true,
                data: None,
                error: None,
            };
            slot.generation
        };

        let request_id = Uuid::new_v4();
        debug!(row, %request_id, "dispatching suggestion request");
        let dispatcher = Arc::clone(&self.dispatcher);
        let job_id = self.job_id.clone();
        let rows = Arc::clone(&self.rows);
        Some(tokio::spawn(async move {
            let outcome = dispatcher.fetch_suggestion(&job_id, row).await;
            let mut rows = lock(&rows);
            let Some(slot) = rows.get_mut(&row) else {
                return;
            };
            if slot.generation != generation {
                debug!(row, %request_id, "stale suggestion response discarded");
                return;
            }
            slot.state = match outcome {
                Ok(data) => RowEnrichmentState {
                    loading: false,
                    data: Some(data),
                    error: None,
                },
                Err(err) => RowEnrichmentState {
                    loading: false,
                    data: None,
                    error: Some(err.user_message(GENERIC_SUGGESTION_FAILURE)),
                },
            };
        }))
    }

    pub fn row_state(&self, row: usize) -> RowEnrichmentState {
        lock(&self.rows)
            .get(&row)
            .map(|slot| slot.state.clone())
            .unwrap_or_default()
    }

    /// Opens a deep-search session for `row`, resetting all session state.
    /// Results or errors from any earlier session can no longer land. The
    /// returned task fetches the prefill seed; its failure is swallowed
    /// since seeding is best-effort.
    pub fn open_session(&self, row: usize) -> JoinHandle<()> {
        let epoch = {
            let mut session = lock(&self.session);
            session.epoch += 1;
            session.state = DeepSearchSessionState {
                row: Some(row),
                preparing: true,
                ..Default::default()
            };
            session.epoch
        };

        debug!(row, "deep-search session opened");
        let dispatcher = Arc::clone(&self.dispatcher);
        let job_id = self.job_id.clone();
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            let outcome = dispatcher.prepare_deep_search(&job_id, row).await;
            let mut session = lock(&session);
            if session.epoch != epoch {
                return;
            }
            session.state.preparing = false;
            if let Ok(seed) = outcome {
                session.state.seed = Some(seed);
            }
        })
    }

    /// Executes the deep search for the open session. `None` when no
    /// session is open or an execution is already running.
    pub fn execute_session(&self, scope: AppliedScope) -> Option<JoinHandle<()>> {
        let (epoch, row) = {
            let mut session = lock(&self.session);
            let row = session.state.row?;
            if session.state.executing {
                debug!(row, "deep search already executing, ignoring");
                return None;
            }
            session.state.executing = true;
            session.state.outcome = None;
            session.state.error = None;
            (session.epoch, row)
        };

        let request_id = Uuid::new_v4();
        debug!(row, %request_id, "dispatching deep-search execution");
        let dispatcher = Arc::clone(&self.dispatcher);
        let job_id = self.job_id.clone();
        let session = Arc::clone(&self.session);
        Some(tokio::spawn(async move {
            let outcome = dispatcher
                .execute_deep_search(&job_id, row, &scope)
                .await;
            let mut session = lock(&session);
            if session.epoch != epoch {
                debug!(row, %request_id, "stale deep-search response discarded");
                return;
            }
            session.state.executing = false;
            match outcome {
                Ok(result) => session.state.outcome = Some(result),
                Err(err) => {
                    session.state.error = Some(err.user_message(GENERIC_SEARCH_FAILURE));
                }
            }
        }))
    }

    /// Closes the session. Any in-flight prepare or execute response is
    /// discarded when it eventually arrives.
    pub fn close_session(&self) {
        let mut session = lock(&self.session);
        session.epoch += 1;
        session.state = DeepSearchSessionState::default();
    }

    pub fn session_state(&self) -> DeepSearchSessionState {
        lock(&self.session).state.clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
