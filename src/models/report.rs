use serde::{Deserialize, Serialize};

/// Base article the comparison row is anchored on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaseArticleInfo {
    pub article_number: String,
    #[serde(default)]
    pub article_title: Option<String>,
    pub article_text: String,
}

/// Lifecycle of one country comparison. Forward-only: once terminal,
/// a comparison never leaves `Completed`/`Failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ComparisonStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A match found in one comparison source. Immutable once received.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimilarArticle {
    pub matched_article_identifier: String,
    #[serde(default)]
    pub matched_article_title: Option<String>,
    pub reason_for_similarity: String,
    pub matched_article_full_text: String,
}

/// Comparison of the base article against one source, identified by the
/// server-provided country name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryComparison {
    pub country_name: String,
    pub status: ComparisonStatus,
    #[serde(default)]
    pub similar_articles: Vec<SimilarArticle>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One row of the report: a base article plus its comparisons across
/// sources, in source submission order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportEntry {
    pub base_article_info: BaseArticleInfo,
    #[serde(default)]
    pub country_comparisons: Vec<CountryComparison>,
}

impl ReportEntry {
    pub fn is_terminal(&self) -> bool {
        self.country_comparisons
            .iter()
            .all(|comparison| comparison.status.is_terminal())
    }
}

/// Job lifecycle inferred from poll responses; never set directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Partial,
    Complete,
    Failed,
}

/// True once every comparison in every entry is terminal. An empty report
/// is not terminal; the job has not produced a snapshot yet.
pub fn all_comparisons_terminal(entries: &[ReportEntry]) -> bool {
    !entries.is_empty() && entries.iter().all(ReportEntry::is_terminal)
}

/// Canonical form used when matching a comparison column to a server
/// country name: file stem with a trailing `.pdf` stripped, trimmed,
/// compared case-insensitively.
pub fn normalize_source_name(name: &str) -> String {
    let trimmed = name.trim();
    let stem = trimmed
        .strip_suffix(".pdf")
        .or_else(|| trimmed.strip_suffix(".PDF"))
        .unwrap_or(trimmed);
    stem.trim().to_lowercase()
}
