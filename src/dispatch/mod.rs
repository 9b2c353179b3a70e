//! Request-dispatch seam between the orchestration core and the comparison
//! backend. Everything network-facing goes through [`RequestDispatcher`] so
//! pollers, enrichment flows, and tests stay transport-agnostic.

pub mod http;

pub use http::HttpDispatcher;

use crate::models::{DeepSearchOutcome, DeepSearchSeed, ReportEntry, Suggestion};
use crate::scope::AppliedScope;
use async_trait::async_trait;
use thiserror::Error;

/// Result of one job-status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollSnapshot {
    /// Full report snapshot; replaces the current collection wholesale.
    Ready(Vec<ReportEntry>),
    /// The job is still extracting or initializing. Not an error.
    Processing,
}

/// Failure of a dispatched request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The server answered with a structured error message.
    #[error("{0}")]
    Remote(String),
    /// Transport-level failure without a structured message.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Fallback shown when a failure carries no structured message.
pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch results. Please try again.";
pub const GENERIC_SUGGESTION_FAILURE: &str =
    "Failed to generate the suggestion. Please try again.";
pub const GENERIC_SEARCH_FAILURE: &str =
    "The search failed. Try narrowing the scope or try again later.";

impl DispatchError {
    /// Human-readable message: the server's own message verbatim when
    /// present, otherwise the supplied generic fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Remote(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// Typed access to the comparison backend's endpoints.
#[async_trait]
pub trait RequestDispatcher: Send + Sync {
    /// Job status/results fetch. A "not ready" response maps to
    /// [`PollSnapshot::Processing`], never to an error.
    async fn fetch_results(&self, job_id: &str) -> Result<PollSnapshot, DispatchError>;

    /// Row-level AI suggestion for one article index.
    async fn fetch_suggestion(
        &self,
        job_id: &str,
        article_index: usize,
    ) -> Result<Suggestion, DispatchError>;

    /// Best-effort prefill seed for the deep-search form.
    async fn prepare_deep_search(
        &self,
        job_id: &str,
        article_index: usize,
    ) -> Result<DeepSearchSeed, DispatchError>;

    /// Deep-search execution with a validated scope.
    async fn execute_deep_search(
        &self,
        job_id: &str,
        article_index: usize,
        scope: &AppliedScope,
    ) -> Result<DeepSearchOutcome, DispatchError>;
}
