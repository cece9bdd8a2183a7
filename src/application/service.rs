use anyhow::Result;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::application::{
    analyze::analyze,
    builder::build_entries,
    extraction::ExtractionRules,
    membership::{filter_entries_to_blueprint_switches, known_switches},
    merge::merge_api_data,
    monitoring::PerfReport,
};
use crate::domain::{
    analysis::ProvisioningAnalysis,
    api_data::{ApiDataMap, PayloadShapeError},
    entry_set::EntrySet,
    ports::{ControllerSource, RowSource},
    row::NetworkConfigRow,
};

/// Outcome of one build → merge → filter → analyse run.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    /// Final entry snapshot the analysis was computed from.
    pub entries: EntrySet,
    pub analysis: ProvisioningAnalysis,
    /// `false` when no controller data was merged (fetch failed), in which
    /// case the snapshot is the input-only build and was not filtered.
    pub merged: bool,
}

impl Reconciliation {
    /// Reverse-converted rows of the final snapshot.
    pub fn rows(&self) -> Vec<NetworkConfigRow> {
        self.entries.iter().map(NetworkConfigRow::from).collect()
    }
}

/// Run the whole engine over already-fetched inputs. Pure and synchronous.
pub fn reconcile(
    rows: &[NetworkConfigRow],
    api_data: &ApiDataMap,
    rules: &ExtractionRules,
) -> Reconciliation {
    let built = build_entries(rows);
    let merged = merge_api_data(&built, api_data, rules);
    let known = known_switches(&merged, api_data);
    let entries = filter_entries_to_blueprint_switches(&merged, &known);
    let analysis = analyze(&entries);

    Reconciliation {
        entries,
        analysis,
        merged: true,
    }
}

// ─── Reconcile Service ───

pub struct ReconcileService {
    row_source: Arc<dyn RowSource>,
    controller: Arc<dyn ControllerSource>,
    rules: ExtractionRules,
}

impl ReconcileService {
    pub fn new(
        row_source: Arc<dyn RowSource>,
        controller: Arc<dyn ControllerSource>,
        rules: ExtractionRules,
    ) -> Self {
        Self {
            row_source,
            controller,
            rules,
        }
    }

    /// Fetch both inputs concurrently, then run the engine stages in order,
    /// timing each into `report`.
    ///
    /// A row-source failure aborts the run, and so does a controller payload
    /// of the wrong shape ([`PayloadShapeError`]). Any other controller
    /// failure does not: the merge is skipped and the input-only snapshot is
    /// analysed as-is.
    pub async fn run(&self, report: &Arc<Mutex<PerfReport>>) -> Result<Reconciliation> {
        let (rows, api_data) = tokio::join!(
            self.row_source.fetch_rows(),
            self.controller.fetch_connections()
        );
        let rows = rows?;

        let built = PerfReport::time_stage(report, "build_entries", || build_entries(&rows), EntrySet::len);

        let api_data = match api_data {
            Ok(data) => data,
            Err(err) if err.downcast_ref::<PayloadShapeError>().is_some() => {
                return Err(err.context(format!(
                    "Malformed controller data from {}",
                    self.controller.describe()
                )));
            }
            Err(err) => {
                warn!(
                    source = %self.controller.describe(),
                    error = %err,
                    "controller fetch failed, keeping input-only snapshot"
                );
                let analysis = PerfReport::time_stage(report, "analyze", || analyze(&built), |a| a.total_entries);
                return Ok(Reconciliation {
                    entries: built,
                    analysis,
                    merged: false,
                });
            }
        };

        let merged = PerfReport::time_stage(
            report,
            "merge_api_data",
            || merge_api_data(&built, &api_data, &self.rules),
            EntrySet::len,
        );
        let entries = PerfReport::time_stage(
            report,
            "filter_blueprint",
            || filter_entries_to_blueprint_switches(&merged, &known_switches(&merged, &api_data)),
            EntrySet::len,
        );
        let analysis = PerfReport::time_stage(report, "analyze", || analyze(&entries), |a| a.total_entries);

        Ok(Reconciliation {
            entries,
            analysis,
            merged: true,
        })
    }
}
