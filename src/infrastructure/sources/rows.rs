use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{ports::RowSource, row::NetworkConfigRow};

/// Reads a JSON array of rows whose keys are already canonical field names.
pub struct JsonRowSource {
    path: PathBuf,
}

impl JsonRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowSource for JsonRowSource {
    async fn fetch_rows(&self) -> Result<Vec<NetworkConfigRow>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read rows file: {}", self.path.display()))?;
        let rows: Vec<NetworkConfigRow> = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse rows JSON: {}", self.path.display()))?;
        debug!(path = %self.path.display(), rows = rows.len(), "rows loaded");
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

/// Reads a CSV export with one header row of canonical field names.
/// Unknown columns are ignored and empty cells read as absent.
pub struct CsvRowSource {
    path: PathBuf,
}

impl CsvRowSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowSource for CsvRowSource {
    async fn fetch_rows(&self) -> Result<Vec<NetworkConfigRow>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read rows file: {}", self.path.display()))?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes.as_slice());

        let mut rows = Vec::new();
        for (i, record) in reader.deserialize::<NetworkConfigRow>().enumerate() {
            // Line 1 is the header.
            let row = record.with_context(|| {
                format!("Bad CSV row at line {} of {}", i + 2, self.path.display())
            })?;
            rows.push(row);
        }
        debug!(path = %self.path.display(), rows = rows.len(), "rows loaded");
        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}
