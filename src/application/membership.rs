use std::collections::BTreeSet;
use tracing::{info, warn};

use crate::domain::{
    api_data::ApiDataMap, entry::EntrySource, entry_set::EntrySet, row::NetworkConfigRow,
};

/// Every switch that appears in at least one connection of `fetched`, the
/// controller data of the current cycle, read from the merged entries.
///
/// Entries marked `both` by an earlier cycle whose connection is no longer
/// reported do not count.
pub fn known_switches(merged: &EntrySet, fetched: &ApiDataMap) -> BTreeSet<String> {
    merged
        .iter()
        .filter(|e| e.source() != EntrySource::InputOnly && fetched.contains(e.key()))
        .map(|e| e.switch_name().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keep rows whose switch the controller knows, plus rows with no switch
/// label at all (identity checks belong to the entry builder).
///
/// Only meaningful after a merge: before one, `known` is empty and every
/// labelled row would be dropped.
pub fn filter_rows_to_blueprint_switches(
    rows: &[NetworkConfigRow],
    known: &BTreeSet<String>,
) -> Vec<NetworkConfigRow> {
    warn_if_unpopulated(rows.len(), known);

    let kept: Vec<NetworkConfigRow> = rows
        .iter()
        .filter(|row| row.switch().map_or(true, |s| known.contains(s)))
        .cloned()
        .collect();

    info!(before = rows.len(), after = kept.len(), "filtered rows to blueprint switches");
    kept
}

/// Entry flavour of [`filter_rows_to_blueprint_switches`]. Order is kept.
pub fn filter_entries_to_blueprint_switches(
    entries: &EntrySet,
    known: &BTreeSet<String>,
) -> EntrySet {
    warn_if_unpopulated(entries.len(), known);

    let kept: EntrySet = entries
        .iter()
        .filter(|e| {
            let switch = e.switch_name().trim();
            switch.is_empty() || known.contains(switch)
        })
        .cloned()
        .collect();

    info!(before = entries.len(), after = kept.len(), "filtered entries to blueprint switches");
    kept
}

fn warn_if_unpopulated(candidates: usize, known: &BTreeSet<String>) {
    if known.is_empty() && candidates > 0 {
        warn!(candidates, "no controller switches known, filter will drop every labelled row");
    }
}
