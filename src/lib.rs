use anyhow::Result;
use std::sync::Arc;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// ─── Log level ────────────────────────────────────────────────────────────────

/// Controls the verbosity of linkrecon's internal tracing output.
///
/// Pass to [`init_tracing`] before calling any async entry point.
///
/// | Variant | `tracing` level | When to use                                  |
/// |---------|-----------------|----------------------------------------------|
/// | `Error` | `error`         | `--quiet` / CI scripting                     |
/// | `Info`  | `info`          | Default, shows per-stage timings             |
/// | `Debug` | `debug`         | `--verbose`, also shows missing payload paths |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Info,
    Debug,
}

/// Initialise the global `tracing` subscriber for linkrecon.
///
/// Respects `RUST_LOG` when set, falling back to `level` otherwise. Call
/// once at startup. Library consumers who manage their own subscriber
/// should skip this.
///
/// Only available with the `cli` feature (pulls in `tracing-subscriber`).
#[cfg(feature = "cli")]
pub fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let default_filter = match level {
        LogLevel::Error => "linkrecon=error",
        LogLevel::Info  => "linkrecon=info",
        LogLevel::Debug => "linkrecon=debug",
    };

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

// ─── Public API Facade ───

pub use application::analyze::{analyze, analyze_entry};
pub use application::builder::build_entries;
pub use application::compare::{compare_field, compare_list_field, is_empty};
pub use application::extraction::{ExtractionRules, FetchedField};
pub use application::membership::{
    filter_entries_to_blueprint_switches, filter_rows_to_blueprint_switches, known_switches,
};
pub use application::merge::merge_api_data;
pub use application::monitoring::PerfReport;
pub use application::service::{reconcile, Reconciliation};
pub use application::session::{ReviewSession, SnapshotUpdate};
pub use domain::analysis::{
    EntryComparison, FieldComparison, FieldStatus, OverallStatus, ProvisioningAnalysis,
};
pub use domain::api_data::{ApiDataMap, PayloadShapeError};
pub use domain::entry::{EntrySource, ProvisioningEntry, ONLY_IN_BLUEPRINT};
pub use domain::entry_set::EntrySet;
pub use domain::fingerprint::fingerprint;
pub use domain::row::NetworkConfigRow;
pub use domain::value_objects::{ConnectionKey, Fingerprint};
pub use infrastructure::config::{AppConfig, ControllerConfig, InputConfig, OutputConfig};

use crate::application::monitoring::{MonitoringControllerSource, MonitoringRowSource};
use crate::application::service::ReconcileService;
use crate::infrastructure::sources::{open_row_source, JsonControllerSource};

// ─── Public entry points ───

/// Load the configured row export and controller snapshot, then reconcile.
///
/// Use [`run_with_timing`] if you also want a performance report.
pub async fn run(cfg: &AppConfig) -> Result<Reconciliation> {
    let (reconciliation, _) = run_with_timing(cfg).await?;
    Ok(reconciliation)
}

/// Reconcile with performance timing.
///
/// Returns the [`Reconciliation`] and a [`PerfReport`] containing fetch
/// and per-stage timings.
pub async fn run_with_timing(cfg: &AppConfig) -> Result<(Reconciliation, PerfReport)> {
    let report = PerfReport::new();
    let rules = cfg.extraction.rules()?;

    let row_source = Arc::new(MonitoringRowSource::new(
        open_row_source(&cfg.input.rows)?,
        Arc::clone(&report),
    ));
    let controller = Arc::new(MonitoringControllerSource::new(
        Arc::new(JsonControllerSource::new(&cfg.controller.snapshot)),
        Arc::clone(&report),
    ));

    let service = ReconcileService::new(row_source, controller, rules);
    let reconciliation = service.run(&report).await?;

    Ok((reconciliation, PerfReport::snapshot(&report)))
}
