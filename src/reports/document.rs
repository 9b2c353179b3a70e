//! Word-processor export: the rendered table wrapped in a minimal styled
//! document shell with a landscape page definition, served under a
//! document MIME type.

use super::table::{escape_html, SIMILARITY_REASON_CLASS};
use super::ExportArtifact;
use chrono::Local;

pub const DOCUMENT_FILE_NAME: &str = "comparison_report.doc";
pub const DOCUMENT_MIME: &str = "application/msword";

const HIGHLIGHT_STYLE: &str =
    "background-color:#ede9fe;color:#6d28d9;padding:2px 6px;border-radius:6px;display:inline-block";

pub fn export_document(table_html: &str, primary_name: &str) -> ExportArtifact {
    let highlighted = inject_highlights(table_html);
    let shell = document_shell(&highlighted, primary_name);
    // Word requires the BOM to pick up the UTF-8 encoding of the HTML body.
    let mut bytes = Vec::with_capacity(shell.len() + 3);
    bytes.extend_from_slice("\u{feff}".as_bytes());
    bytes.extend_from_slice(shell.as_bytes());
    ExportArtifact {
        file_name: DOCUMENT_FILE_NAME.to_string(),
        mime_type: DOCUMENT_MIME.to_string(),
        bytes,
    }
}

/// Re-applies the highlight style inline on every similarity-reason
/// element. Word ignores the stylesheet classes when pasting, so the style
/// has to ride on the elements themselves. Selection is by the semantic
/// marker class written at render time, never by text content.
fn inject_highlights(table_html: &str) -> String {
    let marker = format!("class=\"{SIMILARITY_REASON_CLASS}\"");
    let replacement = format!("{marker} style=\"{HIGHLIGHT_STYLE}\"");
    table_html.replace(&marker, &replacement)
}

fn document_shell(table_html: &str, primary_name: &str) -> String {
    format!(
        "<!DOCTYPE html>\
         <html xmlns:o='urn:schemas-microsoft-com:office:office' \
               xmlns:w='urn:schemas-microsoft-com:office:word' \
               xmlns='http://www.w3.org/TR/REC-html40'>\
         <head><meta charset='utf-8'><title>Comparison Report</title>\
         <style>\
           @page WordSection1 {{ size: 29.7cm 21cm; mso-page-orientation: landscape; margin: 2cm 1.5cm 2cm 1.5cm; }}\
           div.WordSection1 {{ page: WordSection1; }}\
           body {{ font-family: \"Arial\", sans-serif; background: #f9fafb; }}\
           table {{ border-collapse: collapse; width: 100%; background: #fff; }}\
           th, td {{ border: 1px solid #dddddd; padding: 8px; vertical-align: top; }}\
           th {{ background-color: #f2f2f2; }}\
           h1 {{ text-align: center; margin-bottom: 24px; }}\
           h4 {{ margin: 0 0 5px 0; }}\
           p {{ margin: 0; white-space: pre-wrap; }}\
           .{SIMILARITY_REASON_CLASS} {{ {HIGHLIGHT_STYLE} }}\
         </style>\
         </head><body>\
         <div class=\"WordSection1\">\
         <h1>Final Comparison Report</h1>\
         <p style=\"text-align:center;color:#555;margin-bottom:24px;\">Comparison results for {} (generated {})</p>\
         {table_html}\
         </div></body></html>",
        escape_html(primary_name),
        Local::now().format("%Y-%m-%d"),
    )
}
