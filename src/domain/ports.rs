use crate::domain::{analysis::ProvisioningAnalysis, api_data::ApiDataMap, row::NetworkConfigRow};
use anyhow::Result;
use async_trait::async_trait;

/// Port: spreadsheet rows, already mapped to canonical field names
/// (implemented by JsonRowSource and CsvRowSource)
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<NetworkConfigRow>>;

    /// Short label for logs and timing reports.
    fn describe(&self) -> String;
}

/// Port: per-connection controller payloads (implemented by JsonControllerSource)
#[async_trait]
pub trait ControllerSource: Send + Sync {
    async fn fetch_connections(&self) -> Result<ApiDataMap>;

    fn describe(&self) -> String;
}

/// Port: output formatting (implemented by JsonWriter, HtmlWriter, CsvWriter)
pub trait OutputWriter: Send + Sync {
    /// Serializes the reconciliation to a string (JSON, HTML, CSV)
    fn format(&self, analysis: &ProvisioningAnalysis) -> Result<String>;
    /// Extension of the produced file (e.g. "json", "html", "csv")
    fn extension(&self) -> &'static str;
}
