use crate::support::{comparison, entry, failed_comparison, similar};
use lexbase::models::{ComparisonStatus, ReportEntry};
use lexbase::reports::raster::{export_raster, TableCapture, RASTER_FILE_NAME};
use lexbase::reports::table::{render_report_table, TableContext};
use lexbase::reports::{document, json_export, ExportError, ExportGuard};
use std::collections::HashMap;
use std::fs;

fn sample_report() -> Vec<ReportEntry> {
    vec![entry(
        "7",
        vec![
            comparison(
                "germany",
                ComparisonStatus::Completed,
                vec![similar(
                    "Art. 12",
                    "Both regulate <hazardous> substances",
                    "Full matched text.",
                )],
            ),
            comparison("france", ComparisonStatus::Completed, Vec::new()),
        ],
    )]
}

const SAMPLE_SOURCES: [&str; 2] = ["Germany.pdf", "France.pdf"];

fn sample_sources() -> Vec<String> {
    SAMPLE_SOURCES.iter().map(|name| name.to_string()).collect()
}

#[test]
fn json_export_round_trips_losslessly() {
    let report = sample_report();
    let artifact = json_export::export_json(&report).expect("export succeeds");
    assert_eq!(artifact.file_name, "comparison_results.json");
    assert_eq!(artifact.mime_type, "application/json;charset=utf-8");

    let parsed: Vec<ReportEntry> =
        serde_json::from_slice(&artifact.bytes).expect("valid JSON");
    assert_eq!(parsed, report);
}

#[test]
fn json_export_rejects_an_empty_report() {
    assert_eq!(json_export::export_json(&[]), Err(ExportError::EmptyReport));
}

#[test]
fn table_renders_one_column_per_submitted_source() {
    let report = sample_report();
    let notes = HashMap::from([(0usize, "Align terminology with EU directive".to_string())]);
    let sources = ["Germany.pdf".to_string(), "France.pdf".to_string()];
    let ctx = TableContext {
        primary_name: "Constitution.pdf",
        comparison_sources: &sources,
        notes: &notes,
    };
    let html = render_report_table(&report, &ctx);

    assert!(html.contains("<th>Germany.pdf</th>"));
    assert!(html.contains("<th>France.pdf</th>"));
    // Columns match by normalized name: "Germany.pdf" lines up with the
    // server's "germany".
    assert!(html.contains("Both regulate &lt;hazardous&gt; substances"));
    assert!(html.contains("No similarity found"));
    assert!(html.contains("Align terminology with EU directive"));
}

#[test]
fn table_shows_progress_and_failure_states() {
    let report = vec![entry(
        "1",
        vec![
            comparison("germany", ComparisonStatus::Processing, Vec::new()),
            failed_comparison("france", "source unreadable"),
        ],
    )];
    let sources = ["Germany.pdf".to_string(), "France.pdf".to_string()];
    let notes = HashMap::new();
    let ctx = TableContext {
        primary_name: "Constitution.pdf",
        comparison_sources: &sources,
        notes: &notes,
    };
    let html = render_report_table(&report, &ctx);

    assert!(html.contains("Comparing\u{2026}"));
    assert!(html.contains("source unreadable"));
}

#[test]
fn document_export_carries_landscape_shell_and_inline_highlights() {
    let notes = HashMap::new();
    let sources = sample_sources();
    let ctx = TableContext {
        primary_name: "Constitution.pdf",
        comparison_sources: &sources,
        notes: &notes,
    };
    let html = render_report_table(&sample_report(), &ctx);
    assert!(
        html.contains("class=\"similarity-reason\""),
        "table carries the marker before injection"
    );
    let artifact = document::export_document(&html, "Constitution.pdf");
    assert_eq!(artifact.file_name, "comparison_report.doc");
    assert_eq!(artifact.mime_type, "application/msword");

    assert_eq!(&artifact.bytes[..3], "\u{feff}".as_bytes(), "BOM prefix");
    let body = String::from_utf8(artifact.bytes).expect("UTF-8 document");
    assert!(body.contains("WordSection1"));
    assert!(body.contains("size: 29.7cm 21cm"));
    assert!(body.contains("mso-page-orientation: landscape"));
    assert!(body.contains(
        "class=\"similarity-reason\" style=\"background-color:#ede9fe"
    ));
    assert!(body.contains("Comparison results for Constitution.pdf"));
}

#[test]
fn raster_export_wraps_the_capture_in_a_one_page_pdf() {
    let capture = TableCapture {
        pixel_width: 200,
        pixel_height: 100,
        jpeg: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
    };
    let artifact = export_raster(&capture).expect("export succeeds");
    assert_eq!(artifact.file_name, RASTER_FILE_NAME);
    assert_eq!(artifact.mime_type, "application/pdf");

    assert!(artifact.bytes.starts_with(b"%PDF-1.4\n"));
    assert!(artifact.bytes.ends_with(b"%%EOF\n"));
    let text = String::from_utf8_lossy(&artifact.bytes);
    assert!(text.contains("/Filter /DCTDecode"));
    assert!(text.contains("/Width 200"));
    assert!(text.contains("/Height 100"));
    assert!(text.contains("/MediaBox [0 0 841.89 595.28]"));
}

#[test]
fn raster_export_preserves_the_capture_aspect_ratio() {
    let capture = TableCapture {
        pixel_width: 1000,
        pixel_height: 500,
        jpeg: vec![0xFF, 0xD8, 0xFF, 0xE0],
    };
    let (width, height) = capture.scaled_size();
    assert!((width - 841.89).abs() < f64::EPSILON);
    assert!((height - 420.945).abs() < 0.001);
}

#[test]
fn raster_export_rejects_bad_captures() {
    let zero = TableCapture {
        pixel_width: 0,
        pixel_height: 100,
        jpeg: vec![0xFF, 0xD8, 0xFF, 0xE0],
    };
    assert!(matches!(
        export_raster(&zero),
        Err(ExportError::InvalidCapture(_))
    ));

    let not_jpeg = TableCapture {
        pixel_width: 10,
        pixel_height: 10,
        jpeg: b"PNG data".to_vec(),
    };
    assert!(matches!(
        export_raster(&not_jpeg),
        Err(ExportError::InvalidCapture(_))
    ));
}

#[test]
fn export_guard_allows_one_export_at_a_time() {
    let guard = ExportGuard::new();
    let slot = guard.begin().expect("first claim succeeds");
    assert_eq!(guard.begin().err(), Some(ExportError::InFlight));
    drop(slot);
    guard.begin().expect("released after the slot dropped");
}

#[test]
fn artifacts_write_to_disk_byte_exact() {
    let report = sample_report();
    let artifact = json_export::export_json(&report).expect("export succeeds");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(&artifact.file_name);
    fs::write(&path, &artifact.bytes).expect("write artifact");
    assert_eq!(fs::read(&path).expect("read back"), artifact.bytes);
}
