use crate::scope::AppliedScope;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Best-effort seed returned by the preparation endpoint, used only to
/// prefill the scope form. Its absence never blocks manual entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeepSearchSeed {
    #[serde(default)]
    pub article_title: Option<String>,
    #[serde(default)]
    pub prefill: HashMap<String, String>,
}

/// One ranked hit from a deep-search execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeepSearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub why: Option<String>,
}

/// Full result of a deep-search execution for one article.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeepSearchOutcome {
    #[serde(default)]
    pub queries: Vec<String>,
    #[serde(default)]
    pub results: Vec<DeepSearchHit>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub took_ms: Option<u64>,
    #[serde(default)]
    pub applied_scope: Option<AppliedScope>,
}
