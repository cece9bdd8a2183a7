use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entry::ProvisioningEntry;

/// Relationship between the two sides of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Match,
    Mismatch,
    InputOnly,
    FetchedOnly,
    BothMissing,
}

impl FieldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldStatus::Match => "match",
            FieldStatus::Mismatch => "mismatch",
            FieldStatus::InputOnly => "input_only",
            FieldStatus::FetchedOnly => "fetched_only",
            FieldStatus::BothMissing => "both_missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldComparison {
    pub field: String,
    pub input_value: Option<String>,
    pub fetched_value: Option<String>,
    pub matches: bool,
    pub status: FieldStatus,
}

/// Entry-level verdict. Provenance outranks score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    CompleteMatch,
    PartialMatch,
    NoMatch,
    InputOnly,
    FetchedOnly,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::CompleteMatch => "complete_match",
            OverallStatus::PartialMatch => "partial_match",
            OverallStatus::NoMatch => "no_match",
            OverallStatus::InputOnly => "input_only",
            OverallStatus::FetchedOnly => "fetched_only",
        }
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryComparison {
    pub entry: ProvisioningEntry,
    pub comparisons: Vec<FieldComparison>,
    pub overall_status: OverallStatus,
    /// Percentage (0–100) of comparable fields that matched.
    pub match_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisioningAnalysis {
    pub analysis_id: String,
    pub created_at: String,
    pub total_entries: usize,
    pub complete_matches: usize,
    pub partial_matches: usize,
    pub no_matches: usize,
    pub input_only_entries: usize,
    pub fetched_only_entries: usize,
    pub entries: Vec<EntryComparison>,
}

impl ProvisioningAnalysis {
    pub fn new(entries: Vec<EntryComparison>) -> Self {
        let count = |status: OverallStatus| {
            entries
                .iter()
                .filter(|e| e.overall_status == status)
                .count()
        };

        ProvisioningAnalysis {
            analysis_id: format!(
                "an_{}_{}",
                Utc::now().format("%Y%m%d_%H%M%S"),
                Uuid::new_v4().simple()
            ),
            created_at: Utc::now().to_rfc3339(),
            total_entries: entries.len(),
            complete_matches: count(OverallStatus::CompleteMatch),
            partial_matches: count(OverallStatus::PartialMatch),
            no_matches: count(OverallStatus::NoMatch),
            input_only_entries: count(OverallStatus::InputOnly),
            fetched_only_entries: count(OverallStatus::FetchedOnly),
            entries,
        }
    }
}
