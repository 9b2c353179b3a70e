//! Report table rendering. Produces the HTML structure the document export
//! wraps and the external rasterizer captures.
//!
//! Every similarity-reason element carries the `similarity-reason` class so
//! downstream transforms can select it semantically instead of matching
//! rendered text.

use crate::models::{normalize_source_name, ComparisonStatus, CountryComparison, ReportEntry};
use std::collections::HashMap;

/// Marker class for similarity-reason content.
pub const SIMILARITY_REASON_CLASS: &str = "similarity-reason";

/// Display context around the raw entries: column names in submission
/// order plus the user's editable notes.
pub struct TableContext<'a> {
    pub primary_name: &'a str,
    pub comparison_sources: &'a [String],
    pub notes: &'a HashMap<usize, String>,
}

pub fn render_report_table(entries: &[ReportEntry], ctx: &TableContext) -> String {
    let mut html = String::new();
    html.push_str("<table class=\"comparison-report\">");
    render_header(&mut html, ctx);
    html.push_str("<tbody>");
    for (index, entry) in entries.iter().enumerate() {
        render_row(&mut html, index, entry, ctx);
    }
    html.push_str("</tbody></table>");
    html
}

fn render_header(html: &mut String, ctx: &TableContext) {
    html.push_str("<thead><tr>");
    html.push_str(&format!(
        "<th class=\"base-article\">{}</th>",
        escape_html(ctx.primary_name)
    ));
    for source in ctx.comparison_sources {
        html.push_str(&format!("<th>{}</th>", escape_html(source)));
    }
    html.push_str("<th class=\"notes\">Editorial notes</th>");
    html.push_str("</tr></thead>");
}

fn render_row(html: &mut String, index: usize, entry: &ReportEntry, ctx: &TableContext) {
    html.push_str("<tr>");

    html.push_str("<td class=\"base-article\">");
    let title = entry
        .base_article_info
        .article_title
        .as_deref()
        .unwrap_or("Untitled");
    html.push_str(&format!(
        "<h4>{} - {}</h4>",
        escape_html(&entry.base_article_info.article_number),
        escape_html(title)
    ));
    html.push_str(&format!(
        "<p>{}</p>",
        escape_html(&entry.base_article_info.article_text)
    ));
    html.push_str("</td>");

    for source in ctx.comparison_sources {
        render_comparison_cell(html, find_comparison(entry, source));
    }

    html.push_str("<td class=\"notes\">");
    if let Some(note) = ctx.notes.get(&index) {
        html.push_str(&format!("<p>{}</p>", escape_html(note)));
    }
    html.push_str("</td>");

    html.push_str("</tr>");
}

/// Column-to-comparison assignment: exact match on the normalized source
/// name. The server derives country names from the submitted file names,
/// so the normalized forms line up; substring matching would be ambiguous
/// for overlapping names.
fn find_comparison<'a>(entry: &'a ReportEntry, source: &str) -> Option<&'a CountryComparison> {
    let key = normalize_source_name(source);
    entry
        .country_comparisons
        .iter()
        .find(|comparison| normalize_source_name(&comparison.country_name) == key)
}

fn render_comparison_cell(html: &mut String, comparison: Option<&CountryComparison>) {
    html.push_str("<td>");
    match comparison {
        Some(comparison) if comparison.status == ComparisonStatus::Completed => {
            if comparison.similar_articles.is_empty() {
                html.push_str("<span class=\"no-match\">No similarity found</span>");
            } else {
                for similar in &comparison.similar_articles {
                    html.push_str("<div class=\"match\">");
                    let mut heading = escape_html(&similar.matched_article_identifier);
                    if let Some(title) = &similar.matched_article_title {
                        heading.push_str(" - ");
                        heading.push_str(&escape_html(title));
                    }
                    html.push_str(&format!("<p class=\"match-heading\">{heading}</p>"));
                    html.push_str(&format!(
                        "<div class=\"{SIMILARITY_REASON_CLASS}\">{}</div>",
                        escape_html(&similar.reason_for_similarity)
                    ));
                    html.push_str(&format!(
                        "<p>{}</p>",
                        escape_html(&similar.matched_article_full_text)
                    ));
                    html.push_str("</div>");
                }
            }
        }
        Some(comparison) if comparison.status == ComparisonStatus::Failed => {
            let message = comparison.error.as_deref().unwrap_or("Comparison failed");
            html.push_str(&format!(
                "<span class=\"failed\">{}</span>",
                escape_html(message)
            ));
        }
        _ => {
            html.push_str("<span class=\"in-progress\">Comparing\u{2026}</span>");
        }
    }
    html.push_str("</td>");
}

pub fn escape_html(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            '<' => "&lt;".into(),
            '>' => "&gt;".into(),
            '&' => "&amp;".into(),
            '"' => "&quot;".into(),
            '\'' => "&#39;".into(),
            _ => ch.to_string(),
        })
        .collect::<String>()
}
