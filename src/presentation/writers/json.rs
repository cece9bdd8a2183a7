use anyhow::Result;
use serde::Serialize;

use crate::domain::{
    analysis::{EntryComparison, FieldComparison, OverallStatus, ProvisioningAnalysis},
    entry::EntrySource,
    ports::OutputWriter,
    row::NetworkConfigRow,
};

// ─── Serialisation view types ─────────────────────────────────────────────────
//
// Flatter than the domain structs: each entry carries its key and the
// reverse-converted row instead of the whole canonical entry.

#[derive(Serialize)]
struct JsonAnalysis<'a> {
    analysis_id: &'a str,
    created_at: &'a str,
    summary: JsonSummary,
    entries: Vec<JsonEntry<'a>>,
}

#[derive(Serialize)]
struct JsonSummary {
    total_entries: usize,
    complete_matches: usize,
    partial_matches: usize,
    no_matches: usize,
    input_only_entries: usize,
    fetched_only_entries: usize,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    connection_key: &'a str,
    source: EntrySource,
    overall_status: OverallStatus,
    match_score: f64,
    comparisons: &'a [FieldComparison],
    row: NetworkConfigRow,
}

fn build_entry(e: &EntryComparison) -> JsonEntry<'_> {
    JsonEntry {
        connection_key: e.entry.key().as_str(),
        source: e.entry.source(),
        overall_status: e.overall_status,
        match_score: e.match_score,
        comparisons: &e.comparisons,
        row: NetworkConfigRow::from(&e.entry),
    }
}

// ─── Writer ───────────────────────────────────────────────────────────────────

pub struct JsonWriter;

impl OutputWriter for JsonWriter {
    fn format(&self, analysis: &ProvisioningAnalysis) -> Result<String> {
        let view = JsonAnalysis {
            analysis_id: &analysis.analysis_id,
            created_at: &analysis.created_at,
            summary: JsonSummary {
                total_entries: analysis.total_entries,
                complete_matches: analysis.complete_matches,
                partial_matches: analysis.partial_matches,
                no_matches: analysis.no_matches,
                input_only_entries: analysis.input_only_entries,
                fetched_only_entries: analysis.fetched_only_entries,
            },
            entries: analysis.entries.iter().map(build_entry).collect(),
        };

        Ok(serde_json::to_string_pretty(&view)?)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
