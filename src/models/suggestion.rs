use serde::{Deserialize, Serialize};

/// Supporting quote cited by a suggestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionEvidence {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub why_relevant: Option<String>,
}

/// Row of the comparative jurisdiction table inside a rationale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparativeTableRow {
    #[serde(default)]
    pub jurisdiction: Option<String>,
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Constitutional compatibility assessment attached to a rationale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstitutionalCheck {
    #[serde(default)]
    pub assessment: Option<String>,
    #[serde(default)]
    pub principles: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionRationale {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub evidence: Vec<SuggestionEvidence>,
    #[serde(default)]
    pub comparative_table: Vec<ComparativeTableRow>,
    #[serde(default)]
    pub constitutional_check: Option<ConstitutionalCheck>,
    #[serde(default)]
    pub risk_assessment: Option<String>,
    #[serde(default)]
    pub implementation_impact: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestionFootnote {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub pointer: Option<String>,
}

/// AI-generated amendment suggestion for one report row. The content is
/// opaque to orchestration; it is stored and surfaced as received.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Suggestion {
    /// Server values are `keep` or `amend`; unknown values pass through.
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub rationale: Option<SuggestionRationale>,
    #[serde(default)]
    pub proposed_text: Option<String>,
    #[serde(default)]
    pub footnotes: Vec<SuggestionFootnote>,
}
