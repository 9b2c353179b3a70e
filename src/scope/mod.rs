//! Deep-search scope construction: draft form state, validation, and the
//! immutable request scope sent to the server.
//!
//! Validation order is fixed and short-circuits on the first failure
//! (subject, then geography, then timeframe, then sources) so the user
//! sees exactly one message per attempt. The preview is independent of
//! validation and always reflects the current draft.

use crate::models::DeepSearchSeed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Geographic scope presets. `Custom` requires free text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GeoPreset {
    Global,
    FederalTier,
    LocalTier,
    InternationalOrgs,
    Custom,
}

impl GeoPreset {
    /// Canonical label transmitted to the server for non-custom presets.
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "all jurisdictions",
            Self::FederalTier => "federal-tier",
            Self::LocalTier => "local-tier",
            Self::InternationalOrgs => "international organizations",
            Self::Custom => "custom",
        }
    }
}

/// Timeframe presets. `SinceSpecificYear` requires a 4-digit year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimePreset {
    LastFiveYears,
    LastTenYears,
    LastTwentyYears,
    SinceSpecificYear,
    NoLimit,
}

impl TimePreset {
    pub fn label(self) -> &'static str {
        match self {
            Self::LastFiveYears => "last 5 years",
            Self::LastTenYears => "last 10 years",
            Self::LastTwentyYears => "last 20 years",
            Self::SinceSpecificYear => "since a specific year",
            Self::NoLimit => "no limit",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "last 5 years" => Some(Self::LastFiveYears),
            "last 10 years" => Some(Self::LastTenYears),
            "last 20 years" => Some(Self::LastTwentyYears),
            "no limit" => Some(Self::NoLimit),
            _ => None,
        }
    }
}

/// Fixed enumeration of source types a deep search may draw on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Legislation,
    CaseLaw,
    Standards,
    Research,
    GovReports,
    OfficialBulletins,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        Self::Legislation,
        Self::CaseLaw,
        Self::Standards,
        Self::Research,
        Self::GovReports,
        Self::OfficialBulletins,
    ];

    /// Wire value sent inside `AppliedScope.sources`.
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Legislation => "legislation",
            Self::CaseLaw => "case_law",
            Self::Standards => "standards",
            Self::Research => "research",
            Self::GovReports => "gov_reports",
            Self::OfficialBulletins => "official_bulletins",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Legislation => "legislation",
            Self::CaseLaw => "case law",
            Self::Standards => "standards",
            Self::Research => "research",
            Self::GovReports => "government reports",
            Self::OfficialBulletins => "official bulletins",
        }
    }
}

/// Mutable form state for one deep-search session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeDraft {
    pub law_subject: String,
    pub geo_preset: GeoPreset,
    pub geo_custom: String,
    pub time_preset: TimePreset,
    pub since_year: String,
    pub sources: BTreeSet<SourceKind>,
    pub topic_refine: String,
}

impl Default for ScopeDraft {
    fn default() -> Self {
        Self {
            law_subject: String::new(),
            geo_preset: GeoPreset::Global,
            geo_custom: String::new(),
            time_preset: TimePreset::LastTenYears,
            since_year: String::new(),
            sources: BTreeSet::from([SourceKind::Legislation, SourceKind::Standards]),
            topic_refine: String::new(),
        }
    }
}

impl ScopeDraft {
    pub fn toggle_source(&mut self, kind: SourceKind) {
        if !self.sources.remove(&kind) {
            self.sources.insert(kind);
        }
    }

    /// Best-effort prefill from a server-provided seed. Unknown values fall
    /// back to the defaults; the seed never overrides an explicit custom
    /// geography with garbage.
    pub fn apply_seed(&mut self, seed: &DeepSearchSeed) {
        if let Some(subject) = seed.prefill.get("law_subject") {
            if !subject.trim().is_empty() {
                self.law_subject = subject.trim().to_string();
            }
        }
        if let Some(topic) = seed.prefill.get("topic_refine") {
            if !topic.trim().is_empty() {
                self.topic_refine = topic.trim().to_string();
            }
        }
        if let Some(geo) = seed.prefill.get("geo") {
            let geo = geo.trim();
            if geo.eq_ignore_ascii_case(GeoPreset::Global.label()) {
                self.geo_preset = GeoPreset::Global;
                self.geo_custom.clear();
            } else if !geo.is_empty() {
                self.geo_preset = GeoPreset::Custom;
                self.geo_custom = geo.to_string();
            }
        }
        if let Some(timeframe) = seed.prefill.get("timeframe") {
            self.time_preset =
                TimePreset::from_label(timeframe.trim()).unwrap_or(TimePreset::LastTenYears);
        }
    }

    /// Resolved preview of the draft, shown before validation succeeds.
    /// Unresolved fields render as an em-dash placeholder.
    pub fn preview(&self) -> ScopePreview {
        let geo = match self.geo_preset {
            GeoPreset::Custom => {
                let custom = self.geo_custom.trim();
                if custom.is_empty() {
                    PREVIEW_PLACEHOLDER.to_string()
                } else {
                    custom.to_string()
                }
            }
            preset => preset.label().to_string(),
        };
        let timeframe = match self.time_preset {
            TimePreset::SinceSpecificYear => {
                let year = self.since_year.trim();
                if year.is_empty() {
                    PREVIEW_PLACEHOLDER.to_string()
                } else {
                    format!("since {year}")
                }
            }
            preset => preset.label().to_string(),
        };
        let sources = if self.sources.is_empty() {
            PREVIEW_PLACEHOLDER.to_string()
        } else {
            self.sources
                .iter()
                .map(|kind| kind.label())
                .collect::<Vec<_>>()
                .join(", ")
        };
        ScopePreview {
            law_subject: non_empty_or_placeholder(&self.law_subject),
            geo,
            timeframe,
            sources,
            topic_refine: non_empty_or_placeholder(&self.topic_refine),
        }
    }

    /// Validates the draft and builds the immutable scope. Checks run in a
    /// fixed order and stop at the first failure.
    pub fn build(&self) -> Result<AppliedScope, ScopeError> {
        let law_subject = self.law_subject.trim();
        if law_subject.is_empty() {
            return Err(ScopeError::MissingSubject);
        }

        let geo = match self.geo_preset {
            GeoPreset::Custom => {
                let custom = self.geo_custom.trim();
                if custom.is_empty() {
                    return Err(ScopeError::MissingCustomGeo);
                }
                custom.to_string()
            }
            preset => preset.label().to_string(),
        };

        let timeframe = match self.time_preset {
            TimePreset::SinceSpecificYear => {
                let year = self.since_year.trim();
                if year.len() != 4 || !year.chars().all(|ch| ch.is_ascii_digit()) {
                    return Err(ScopeError::InvalidYear);
                }
                format!("since {year}")
            }
            preset => preset.label().to_string(),
        };

        if self.sources.is_empty() {
            return Err(ScopeError::NoSources);
        }

        Ok(AppliedScope {
            law_subject: law_subject.to_string(),
            geo,
            timeframe,
            sources: self
                .sources
                .iter()
                .map(|kind| kind.wire_value().to_string())
                .collect(),
            topic_refine: self.topic_refine.trim().to_string(),
        })
    }
}

pub const PREVIEW_PLACEHOLDER: &str = "—";

fn non_empty_or_placeholder(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        PREVIEW_PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validation failure. Blocks submission; no network call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("The main law subject is required. Please fill it in before searching.")]
    MissingSubject,
    #[error("Please name a country, state, or organization when choosing a custom geography.")]
    MissingCustomGeo,
    #[error("Enter a valid 4-digit year (for example: 2016).")]
    InvalidYear,
    #[error("Select at least one source type.")]
    NoSources,
}

/// Immutable, validated scope sent to the deep-search execution endpoint.
/// All presets are resolved to canonical strings before transmission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedScope {
    pub law_subject: String,
    pub geo: String,
    pub timeframe: String,
    pub sources: Vec<String>,
    #[serde(default)]
    pub topic_refine: String,
}

/// Live preview of a draft, for user feedback ahead of submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePreview {
    pub law_subject: String,
    pub geo: String,
    pub timeframe: String,
    pub sources: String,
    pub topic_refine: String,
}
