use tracing::info;

use crate::application::compare::{compare_field, compare_list_field};
use crate::domain::{
    analysis::{EntryComparison, FieldComparison, FieldStatus, OverallStatus, ProvisioningAnalysis},
    entry::{EntrySource, ProvisioningEntry},
    entry_set::EntrySet,
};

/// Compare every tracked field pair of one entry and grade it.
pub fn analyze_entry(entry: &ProvisioningEntry) -> EntryComparison {
    let comparisons = field_comparisons(entry);
    let match_score = match_score(&comparisons);
    let overall_status = overall_status(entry.source(), &comparisons);

    EntryComparison {
        entry: entry.clone(),
        comparisons,
        overall_status,
        match_score,
    }
}

/// Analyse a whole snapshot into a fresh report.
pub fn analyze(entries: &EntrySet) -> ProvisioningAnalysis {
    let analysis = ProvisioningAnalysis::new(entries.iter().map(analyze_entry).collect());

    info!(
        total = analysis.total_entries,
        complete = analysis.complete_matches,
        partial = analysis.partial_matches,
        no_match = analysis.no_matches,
        input_only = analysis.input_only_entries,
        fetched_only = analysis.fetched_only_entries,
        "analysis completed"
    );
    analysis
}

fn field_comparisons(entry: &ProvisioningEntry) -> Vec<FieldComparison> {
    let external_input = entry.network.is_external.input.map(|b| b.to_string());
    let external_fetched = entry.network.is_external.fetched.map(|b| b.to_string());

    vec![
        compare_field(
            "server_name",
            entry.server.name.input.as_deref(),
            entry.server.name.fetched.as_deref(),
        ),
        compare_field(
            "server_interface",
            entry.server.interface.input.as_deref(),
            entry.server.interface.fetched.as_deref(),
        ),
        compare_field(
            "link_speed",
            entry.network.speed.input.as_deref(),
            entry.network.speed.fetched.as_deref(),
        ),
        compare_field(
            "is_external",
            external_input.as_deref(),
            external_fetched.as_deref(),
        ),
        compare_field(
            "lag_name",
            entry.lag.name.input.as_deref(),
            entry.lag.name.fetched.as_deref(),
        ),
        compare_field(
            "lag_mode",
            entry.lag.mode.input.as_deref(),
            entry.lag.mode.fetched.as_deref(),
        ),
        compare_list_field(
            "connectivity_templates",
            entry.connectivity.templates.input.as_deref(),
            entry.connectivity.templates.fetched.as_deref(),
        ),
    ]
}

/// Matches over comparable (not both-missing) fields, as a percentage.
/// Zero when nothing is comparable.
fn match_score(comparisons: &[FieldComparison]) -> f64 {
    let (matched, comparable) = tally(comparisons);
    if comparable == 0 {
        0.0
    } else {
        matched as f64 / comparable as f64 * 100.0
    }
}

fn tally(comparisons: &[FieldComparison]) -> (usize, usize) {
    let comparable = comparisons
        .iter()
        .filter(|c| c.status != FieldStatus::BothMissing)
        .count();
    let matched = comparisons
        .iter()
        .filter(|c| c.status == FieldStatus::Match)
        .count();
    (matched, comparable)
}

fn overall_status(source: EntrySource, comparisons: &[FieldComparison]) -> OverallStatus {
    let (matched, comparable) = tally(comparisons);
    match source {
        EntrySource::InputOnly => OverallStatus::InputOnly,
        EntrySource::ApiOnly => OverallStatus::FetchedOnly,
        EntrySource::Both if comparable > 0 && matched == comparable => {
            OverallStatus::CompleteMatch
        }
        EntrySource::Both if matched > 0 => OverallStatus::PartialMatch,
        EntrySource::Both => OverallStatus::NoMatch,
    }
}
