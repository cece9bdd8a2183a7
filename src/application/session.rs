use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

use crate::application::{
    analyze::analyze,
    builder::build_entries,
    extraction::ExtractionRules,
    membership::{filter_entries_to_blueprint_switches, known_switches},
    merge::merge_api_data,
};
use crate::domain::{
    analysis::ProvisioningAnalysis,
    api_data::ApiDataMap,
    entry_set::EntrySet,
    fingerprint::fingerprint,
    row::NetworkConfigRow,
    value_objects::Fingerprint,
};

// ─────────────────────────────────────────────────────────────────────────────
// ReviewSession
// ─────────────────────────────────────────────────────────────────────────────

/// Holds the current entry snapshot for a review and replaces it wholesale on
/// every pipeline step.
///
/// The engine functions stay pure; this is the one place that remembers the
/// last snapshot, its fingerprint and the switches the last controller fetch
/// reported (`None` until a merge has happened, which gates the blueprint
/// membership filter).
#[derive(Debug, Clone)]
pub struct ReviewSession {
    rules: ExtractionRules,
    snapshot: EntrySet,
    fingerprint: Fingerprint,
    known: Option<BTreeSet<String>>,
}

/// What one merge/filter cycle did to the stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotUpdate {
    pub entries_before: usize,
    pub entries_after: usize,
    /// API-only entries synthesised by the merge that survived the filter.
    pub added: usize,
    /// Entries dropped because their switch is unknown to the controller.
    pub removed: usize,
    /// Whether the snapshot content changed, by fingerprint.
    pub changed: bool,
}

impl ReviewSession {
    pub fn new(rules: ExtractionRules) -> Self {
        let snapshot = EntrySet::new();
        Self {
            rules,
            fingerprint: fingerprint(&snapshot),
            snapshot,
            known: None,
        }
    }

    /// Replace the snapshot with entries built from `rows`.
    ///
    /// Forgets the known switches: a fresh upload has not been checked
    /// against the controller yet.
    pub fn load_rows(&mut self, rows: &[NetworkConfigRow]) -> usize {
        self.replace(build_entries(rows));
        self.known = None;
        self.snapshot.len()
    }

    /// Merge controller data, drop entries on switches `api_data` does not
    /// report and store the result.
    pub fn apply_api_data(&mut self, api_data: &ApiDataMap) -> SnapshotUpdate {
        let before = self.snapshot.len();
        let merged = merge_api_data(&self.snapshot, api_data, &self.rules);
        let synthesized = merged.len() - before;

        let known = known_switches(&merged, api_data);
        let filtered = filter_entries_to_blueprint_switches(&merged, &known);
        let removed = merged.len() - filtered.len();
        let added = filtered
            .keys()
            .filter(|k| !self.snapshot.contains(k))
            .count();

        let previous = self.fingerprint.clone();
        self.replace(filtered);
        self.known = Some(known);

        let update = SnapshotUpdate {
            entries_before: before,
            entries_after: self.snapshot.len(),
            added,
            removed,
            changed: previous != self.fingerprint,
        };
        info!(
            before = update.entries_before,
            after = update.entries_after,
            synthesized,
            added = update.added,
            removed = update.removed,
            changed = update.changed,
            "snapshot updated from controller data"
        );
        update
    }

    /// Run the membership filter on the stored snapshot.
    ///
    /// Refused until controller data has been merged at least once, since an
    /// empty membership set would drop every entry.
    pub fn filter_to_blueprint(&self) -> Result<EntrySet> {
        let Some(known) = &self.known else {
            bail!("blueprint filter requires controller data to be merged first");
        };
        Ok(filter_entries_to_blueprint_switches(&self.snapshot, known))
    }

    pub fn analysis(&self) -> ProvisioningAnalysis {
        analyze(&self.snapshot)
    }

    /// Reverse-converted rows of the current snapshot, one per entry.
    pub fn rows(&self) -> Vec<NetworkConfigRow> {
        self.snapshot.iter().map(NetworkConfigRow::from).collect()
    }

    pub fn snapshot(&self) -> &EntrySet {
        &self.snapshot
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn is_merged(&self) -> bool {
        self.known.is_some()
    }

    fn replace(&mut self, snapshot: EntrySet) {
        self.fingerprint = fingerprint(&snapshot);
        self.snapshot = snapshot;
    }
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new(ExtractionRules::default())
    }
}
