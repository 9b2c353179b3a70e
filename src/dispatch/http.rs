//! `reqwest`-backed implementation of the dispatch seam, matching the
//! comparison backend's wire contract: 202 means "not ready", error bodies
//! carry `error`, `message`, or `error_message`.

use super::{DispatchError, PollSnapshot, RequestDispatcher};
use crate::models::{DeepSearchOutcome, DeepSearchSeed, ReportEntry, Suggestion};
use crate::scope::AppliedScope;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct HttpDispatcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDispatcher {
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Error body shape across endpoints. The backend is inconsistent about the
/// field name, so all three observed spellings are accepted.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error.or(self.message).or(self.error_message)
    }
}

async fn remote_error(response: reqwest::Response) -> DispatchError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| format!("server responded with status {status}"));
    DispatchError::Remote(message)
}

#[async_trait]
impl RequestDispatcher for HttpDispatcher {
    async fn fetch_results(&self, job_id: &str) -> Result<PollSnapshot, DispatchError> {
        let url = self.endpoint(&format!("results/{job_id}"));
        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::OK => {
                let entries: Vec<ReportEntry> = response.json().await?;
                Ok(PollSnapshot::Ready(entries))
            }
            StatusCode::ACCEPTED => Ok(PollSnapshot::Processing),
            _ => Err(remote_error(response).await),
        }
    }

    async fn fetch_suggestion(
        &self,
        job_id: &str,
        article_index: usize,
    ) -> Result<Suggestion, DispatchError> {
        let url = self.endpoint("suggest-amendment");
        let response = self
            .client
            .post(&url)
            .json(&json!({ "job_id": job_id, "article_index": article_index }))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(remote_error(response).await)
        }
    }

    async fn prepare_deep_search(
        &self,
        job_id: &str,
        article_index: usize,
    ) -> Result<DeepSearchSeed, DispatchError> {
        let url = self.endpoint("deep-search/start");
        let response = self
            .client
            .post(&url)
            .json(&json!({ "job_id": job_id, "article_index": article_index }))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(remote_error(response).await)
        }
    }

    async fn execute_deep_search(
        &self,
        job_id: &str,
        article_index: usize,
        scope: &AppliedScope,
    ) -> Result<DeepSearchOutcome, DispatchError> {
        let url = self.endpoint("deep-search/execute");
        let response = self
            .client
            .post(&url)
            .json(&json!({
                "job_id": job_id,
                "article_index": article_index,
                "scope": scope,
            }))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(remote_error(response).await)
        }
    }
}
