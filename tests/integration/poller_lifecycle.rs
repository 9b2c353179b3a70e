use crate::support::mock_dispatch::ScriptedDispatcher;
use crate::support::{comparison, descriptor, entry, similar};
use lexbase::dispatch::{PollSnapshot, RequestDispatcher};
use lexbase::models::{ComparisonStatus, JobState};
use lexbase::orchestration::{JobPoller, PollUpdate, PollerPhase, ReportOrchestrator};
use std::sync::Arc;
use std::time::Duration;

fn terminal_snapshot() -> PollSnapshot {
    PollSnapshot::Ready(vec![entry(
        "1",
        vec![comparison(
            "Germany",
            ComparisonStatus::Completed,
            vec![similar("Art. 5", "Both protect expression.", "Full text.")],
        )],
    )])
}

fn pending_snapshot() -> PollSnapshot {
    PollSnapshot::Ready(vec![entry(
        "1",
        vec![comparison("Germany", ComparisonStatus::Processing, Vec::new())],
    )])
}

#[tokio::test(start_paused = true)]
async fn polling_stops_once_every_comparison_is_terminal() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    dispatcher.push_result(Ok(pending_snapshot()));
    dispatcher.push_result(Ok(terminal_snapshot()));

    let poller = JobPoller::new(Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>)
        .with_interval(Duration::from_secs(5));
    let (handle, mut updates) = poller.start("job-123");
    assert_eq!(handle.phase(), PollerPhase::Polling);

    let first = updates.recv().await.expect("first snapshot");
    assert!(matches!(first, PollUpdate::Snapshot(_)));
    let second = updates.recv().await.expect("second snapshot");
    assert!(matches!(second, PollUpdate::Snapshot(_)));

    assert_eq!(handle.stopped().await, PollerPhase::Stopped);
    assert!(updates.recv().await.is_none(), "no updates after terminal");
    assert_eq!(dispatcher.result_calls(), 2, "no polls after the loop stopped");
}

#[tokio::test(start_paused = true)]
async fn not_ready_responses_keep_polling_without_failing() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    dispatcher.push_result(Ok(PollSnapshot::Processing));
    dispatcher.push_result(Ok(PollSnapshot::Processing));
    dispatcher.push_result(Ok(terminal_snapshot()));

    let mut orchestrator = ReportOrchestrator::new(
        Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>,
        descriptor(&["Germany.pdf"]),
    )
    .with_poll_interval(Duration::from_secs(5));

    assert_eq!(orchestrator.run_until_terminal().await, JobState::Complete);
    assert_eq!(dispatcher.result_calls(), 3);
    assert!(orchestrator.job_error().is_none());
}

#[tokio::test(start_paused = true)]
async fn empty_ready_snapshot_counts_as_not_ready() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    dispatcher.push_result(Ok(PollSnapshot::Ready(Vec::new())));
    dispatcher.push_result(Ok(terminal_snapshot()));

    let mut orchestrator = ReportOrchestrator::new(
        Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>,
        descriptor(&["Germany.pdf"]),
    )
    .with_poll_interval(Duration::from_secs(5));

    assert_eq!(orchestrator.run_until_terminal().await, JobState::Complete);
    assert_eq!(orchestrator.report().len(), 1, "empty snapshot never merged");
    assert_eq!(dispatcher.result_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn first_poll_waits_one_full_interval() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    dispatcher.push_result(Ok(terminal_snapshot()));

    let poller = JobPoller::new(Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>)
        .with_interval(Duration::from_secs(5));
    let (_handle, mut updates) = poller.start("job-123");

    // Arm the timer before time moves.
    tokio::task::yield_now().await;
    tokio::time::advance(Duration::from_millis(4_900)).await;
    assert_eq!(dispatcher.result_calls(), 0, "no poll before the interval");

    updates.recv().await.expect("snapshot after the interval");
    assert_eq!(dispatcher.result_calls(), 1);
}
