pub mod deepsearch;
pub mod report;
pub mod suggestion;

pub use deepsearch::{DeepSearchHit, DeepSearchOutcome, DeepSearchSeed};
pub use report::{
    all_comparisons_terminal, normalize_source_name, BaseArticleInfo, ComparisonStatus,
    CountryComparison, JobState, ReportEntry, SimilarArticle,
};
pub use suggestion::{
    ComparativeTableRow, ConstitutionalCheck, Suggestion, SuggestionEvidence, SuggestionFootnote,
    SuggestionRationale,
};
