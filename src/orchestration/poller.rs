//! Fixed-interval polling of one comparison job until every comparison is
//! terminal. The poller never mutates the report itself: snapshots are
//! proposed over a channel and applied by the orchestrator.

use crate::dispatch::{PollSnapshot, RequestDispatcher, GENERIC_FETCH_FAILURE};
use crate::models::all_comparisons_terminal;
use crate::models::ReportEntry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Explicit poller lifecycle. `Idle` describes a poller that has not been
/// started; `Stopped` is terminal whether it was reached by completion,
/// job failure, or cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerPhase {
    Idle,
    Polling,
    Stopped,
}

/// Merge proposal sent to the orchestrator after each successful poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollUpdate {
    /// Full snapshot replacing the current report collection.
    Snapshot(Vec<ReportEntry>),
    /// Terminal job-level failure; polling has stopped.
    JobFailed(String),
}

pub struct JobPoller {
    dispatcher: Arc<dyn RequestDispatcher>,
    interval: Duration,
}

impl JobPoller {
    pub fn new(dispatcher: Arc<dyn RequestDispatcher>) -> Self {
        Self {
            dispatcher,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Starts polling `job_id`. The first poll fires one interval after the
    /// call, matching the cadence of the job backend. Returns a cancelable
    /// handle plus the channel the orchestrator drains.
    pub fn start(&self, job_id: impl Into<String>) -> (PollerHandle, mpsc::UnboundedReceiver<PollUpdate>) {
        let job_id = job_id.into();
        let dispatcher = Arc::clone(&self.dispatcher);
        let interval = self.interval;
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::unbounded_channel();

        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            poll_loop(dispatcher, job_id, interval, task_cancel, tx).await
        });

        (PollerHandle { cancel, task }, rx)
    }
}

/// Cancelable handle to a running poll loop. Cancellation guarantees the
/// next scheduled tick never fires and any in-flight response is dropped
/// without producing an update.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<PollerPhase>,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Current phase as observable from outside the loop. A handle only
    /// exists once polling started, so this never reports `Idle`.
    pub fn phase(&self) -> PollerPhase {
        if self.task.is_finished() {
            PollerPhase::Stopped
        } else {
            PollerPhase::Polling
        }
    }

    /// Waits for the loop to wind down and returns its final phase.
    pub async fn stopped(mut self) -> PollerPhase {
        (&mut self.task).await.unwrap_or(PollerPhase::Stopped)
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    dispatcher: Arc<dyn RequestDispatcher>,
    job_id: String,
    interval: Duration,
    cancel: CancellationToken,
    tx: mpsc::UnboundedSender<PollUpdate>,
) -> PollerPhase {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(%job_id, "polling cancelled");
                return PollerPhase::Stopped;
            }
            _ = ticker.tick() => {}
        }

        // Polls are strictly sequential: the next tick is not armed until
        // this request resolves. Cancellation discards an in-flight result.
        let outcome = tokio::select! {
            _ = cancel.cancelled() => {
                debug!(%job_id, "polling cancelled mid-request");
                return PollerPhase::Stopped;
            }
            outcome = dispatcher.fetch_results(&job_id) => outcome,
        };

        match outcome {
            Ok(PollSnapshot::Ready(entries)) => {
                if entries.is_empty() {
                    // The job has not produced its initial structure yet.
                    continue;
                }
                let terminal = all_comparisons_terminal(&entries);
                if tx.send(PollUpdate::Snapshot(entries)).is_err() {
                    // Receiver gone: the owning context has moved on.
                    return PollerPhase::Stopped;
                }
                if terminal {
                    debug!(%job_id, "all comparisons terminal, polling stopped");
                    return PollerPhase::Stopped;
                }
            }
            Ok(PollSnapshot::Processing) => {
                debug!(%job_id, "job not ready yet");
            }
            Err(err) => {
                warn!(%job_id, error = %err, "job-level poll failure");
                let _ = tx.send(PollUpdate::JobFailed(err.user_message(GENERIC_FETCH_FAILURE)));
                return PollerPhase::Stopped;
            }
        }
    }
}
