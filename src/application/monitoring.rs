use crate::domain::ports::{ControllerSource, RowSource};
use crate::domain::{api_data::ApiDataMap, row::NetworkConfigRow};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, instrument};

// ─── PerfReport ──────────────────────────────────────────────────────────────

/// A single timed operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OpTiming {
    /// Operation name: "fetch_rows", "fetch_connections", or an engine stage
    /// ("build_entries", "merge_api_data", "filter_blueprint", "analyze").
    pub operation: &'static str,
    /// Source or stage this operation ran against.
    pub target: String,
    /// Elapsed wall time in milliseconds.
    pub duration_ms: u128,
    /// Number of records produced.
    pub records: usize,
}

/// Accumulated performance timings for a single reconciliation run.
///
/// Shared across all decorator instances for one run via `Arc<Mutex<_>>`.
/// After the run, pass to [`crate::presentation::cli_summary::print_perf_summary`]
/// to render a human-readable table.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct PerfReport {
    pub timings: Vec<OpTiming>,
    pub total_records_fetched: usize,
    pub total_ms: u128,
}

impl PerfReport {
    pub fn new() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    pub(crate) fn record(report: &Arc<Mutex<Self>>, timing: OpTiming) {
        if let Ok(mut r) = report.lock() {
            r.total_ms += timing.duration_ms;
            if timing.operation.starts_with("fetch_") {
                r.total_records_fetched += timing.records;
            }
            r.timings.push(timing);
        }
    }

    /// Time a synchronous engine stage. `count` reports how many records the
    /// stage produced.
    pub(crate) fn time_stage<T>(
        report: &Arc<Mutex<Self>>,
        operation: &'static str,
        stage: impl FnOnce() -> T,
        count: impl Fn(&T) -> usize,
    ) -> T {
        let start = Instant::now();
        let out = stage();
        let duration_ms = start.elapsed().as_millis();
        let records = count(&out);

        info!(operation, records, duration_ms, "stage completed");

        Self::record(
            report,
            OpTiming {
                operation,
                target: "engine".to_string(),
                duration_ms,
                records,
            },
        );
        out
    }

    /// Snapshot of the shared report, empty if the lock was poisoned.
    pub fn snapshot(report: &Arc<Mutex<Self>>) -> Self {
        report.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

// ─── MonitoringRowSource ─────────────────────────────────────────────────────

/// Decorator: wraps any `RowSource`, measures wall time per `fetch_rows`
/// call, and appends the result to the shared `PerfReport`.
pub struct MonitoringRowSource {
    inner: Arc<dyn RowSource>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringRowSource {
    pub fn new(inner: Arc<dyn RowSource>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

#[async_trait]
impl RowSource for MonitoringRowSource {
    #[instrument(
        name = "fetch_rows",
        skip(self),
        fields(source = %self.inner.describe()),
        level = "info"
    )]
    async fn fetch_rows(&self) -> Result<Vec<NetworkConfigRow>> {
        let start = Instant::now();
        let rows = self.inner.fetch_rows().await?;
        let duration_ms = start.elapsed().as_millis();

        info!(source = %self.inner.describe(), rows = rows.len(), duration_ms, "fetch_rows completed");

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "fetch_rows",
                target: self.inner.describe(),
                duration_ms,
                records: rows.len(),
            },
        );

        Ok(rows)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

// ─── MonitoringControllerSource ──────────────────────────────────────────────

/// Decorator: wraps any `ControllerSource`, measures wall time per
/// `fetch_connections` call, and appends the result to the shared `PerfReport`.
pub struct MonitoringControllerSource {
    inner: Arc<dyn ControllerSource>,
    report: Arc<Mutex<PerfReport>>,
}

impl MonitoringControllerSource {
    pub fn new(inner: Arc<dyn ControllerSource>, report: Arc<Mutex<PerfReport>>) -> Self {
        Self { inner, report }
    }
}

#[async_trait]
impl ControllerSource for MonitoringControllerSource {
    #[instrument(
        name = "fetch_connections",
        skip(self),
        fields(source = %self.inner.describe()),
        level = "info"
    )]
    async fn fetch_connections(&self) -> Result<ApiDataMap> {
        let start = Instant::now();
        let data = self.inner.fetch_connections().await?;
        let duration_ms = start.elapsed().as_millis();

        info!(source = %self.inner.describe(), connections = data.len(), duration_ms, "fetch_connections completed");

        PerfReport::record(
            &self.report,
            OpTiming {
                operation: "fetch_connections",
                target: self.inner.describe(),
                duration_ms,
                records: data.len(),
            },
        );

        Ok(data)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRows(usize);

    #[async_trait]
    impl RowSource for FixedRows {
        async fn fetch_rows(&self) -> Result<Vec<NetworkConfigRow>> {
            Ok(vec![NetworkConfigRow::default(); self.0])
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[tokio::test]
    async fn row_fetch_is_recorded() {
        let report = PerfReport::new();
        let source = MonitoringRowSource::new(Arc::new(FixedRows(3)), Arc::clone(&report));

        let rows = source.fetch_rows().await.unwrap();
        assert_eq!(rows.len(), 3);

        let perf = PerfReport::snapshot(&report);
        assert_eq!(perf.timings.len(), 1);
        assert_eq!(perf.timings[0].operation, "fetch_rows");
        assert_eq!(perf.timings[0].target, "fixed");
        assert_eq!(perf.total_records_fetched, 3);
    }

    #[test]
    fn stages_do_not_count_as_fetched() {
        let report = PerfReport::new();
        let out = PerfReport::time_stage(&report, "analyze", || vec![1, 2], |v| v.len());
        assert_eq!(out, vec![1, 2]);

        let perf = PerfReport::snapshot(&report);
        assert_eq!(perf.timings[0].records, 2);
        assert_eq!(perf.total_records_fetched, 0);
    }
}
