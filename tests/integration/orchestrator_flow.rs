use crate::support::mock_dispatch::ScriptedDispatcher;
use crate::support::{comparison, descriptor, entry, similar};
use lexbase::dispatch::{PollSnapshot, RequestDispatcher};
use lexbase::models::{ComparisonStatus, JobState};
use lexbase::orchestration::{PollUpdate, ReportOrchestrator};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn job_completes_over_two_polls_and_renders_the_final_table() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    dispatcher.push_result(Ok(PollSnapshot::Ready(vec![entry(
        "3",
        vec![
            comparison(
                "germany",
                ComparisonStatus::Completed,
                vec![similar("Art. 9", "Both guarantee assembly rights", "Matched text.")],
            ),
            comparison("france", ComparisonStatus::Processing, Vec::new()),
        ],
    )])));
    dispatcher.push_result(Ok(PollSnapshot::Ready(vec![entry(
        "3",
        vec![
            comparison(
                "germany",
                ComparisonStatus::Completed,
                vec![similar("Art. 9", "Both guarantee assembly rights", "Matched text.")],
            ),
            comparison("france", ComparisonStatus::Completed, Vec::new()),
        ],
    )])));

    let mut orchestrator = ReportOrchestrator::new(
        Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>,
        descriptor(&["Germany.pdf", "France.pdf"]),
    )
    .with_poll_interval(Duration::from_secs(5));

    assert_eq!(orchestrator.run_until_terminal().await, JobState::Complete);
    assert_eq!(dispatcher.result_calls(), 2);

    let html = orchestrator.render_table();
    assert!(html.contains("Both guarantee assembly rights"));
    assert!(html.contains("No similarity found"), "empty completed cell");
}

#[tokio::test(start_paused = true)]
async fn stale_snapshot_never_regresses_a_terminal_comparison() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    let mut orchestrator = ReportOrchestrator::new(
        Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>,
        descriptor(&["Germany.pdf", "France.pdf"]),
    );

    orchestrator.apply_update(PollUpdate::Snapshot(vec![entry(
        "1",
        vec![
            comparison(
                "germany",
                ComparisonStatus::Completed,
                vec![similar("Art. 2", "Shared scope clause", "Text.")],
            ),
            comparison("france", ComparisonStatus::Processing, Vec::new()),
        ],
    )]));

    // A reordered, stale snapshot claims germany is still processing.
    orchestrator.apply_update(PollUpdate::Snapshot(vec![entry(
        "1",
        vec![
            comparison("france", ComparisonStatus::Completed, Vec::new()),
            comparison("germany", ComparisonStatus::Processing, Vec::new()),
        ],
    )]));

    let report = orchestrator.report();
    let germany = report[0]
        .country_comparisons
        .iter()
        .find(|comparison| comparison.country_name == "germany")
        .expect("germany column present");
    assert_eq!(germany.status, ComparisonStatus::Completed);
    assert_eq!(germany.similar_articles.len(), 1, "matches survive the merge");

    let france = report[0]
        .country_comparisons
        .iter()
        .find(|comparison| comparison.country_name == "france")
        .expect("france column present");
    assert_eq!(france.status, ComparisonStatus::Completed);
    assert_eq!(orchestrator.job_state(), JobState::Complete);
}

#[tokio::test(start_paused = true)]
async fn notes_survive_merges_and_reach_the_rendered_table() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    let mut orchestrator =
        ReportOrchestrator::new(Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>, descriptor(&["Germany.pdf"]));

    orchestrator.set_row_note(0, "Check transposition deadline");
    orchestrator.apply_update(PollUpdate::Snapshot(vec![entry(
        "1",
        vec![comparison("germany", ComparisonStatus::Completed, Vec::new())],
    )]));

    assert_eq!(orchestrator.row_note(0), Some("Check transposition deadline"));
    assert!(orchestrator
        .render_table()
        .contains("Check transposition deadline"));
}

#[tokio::test(start_paused = true)]
async fn job_failure_message_reaches_the_view_model() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    let mut orchestrator =
        ReportOrchestrator::new(Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>, descriptor(&["Germany.pdf"]));

    orchestrator.apply_update(PollUpdate::JobFailed("Job expired".to_string()));
    assert_eq!(orchestrator.job_state(), JobState::Failed);
    assert_eq!(orchestrator.job_error(), Some("Job expired"));
}

#[tokio::test(start_paused = true)]
async fn exports_share_one_in_flight_slot() {
    let dispatcher = Arc::new(ScriptedDispatcher::new());
    let mut orchestrator =
        ReportOrchestrator::new(Arc::clone(&dispatcher) as Arc<dyn RequestDispatcher>, descriptor(&["Germany.pdf"]));
    orchestrator.apply_update(PollUpdate::Snapshot(vec![entry(
        "1",
        vec![comparison("germany", ComparisonStatus::Completed, Vec::new())],
    )]));

    let json = orchestrator.export_json().expect("json export succeeds");
    assert!(!json.bytes.is_empty());
    // The slot is released when each export returns, so the next one runs.
    let document = orchestrator.export_document().expect("doc export succeeds");
    assert!(!document.bytes.is_empty());
}
