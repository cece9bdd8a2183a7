use anyhow::{Context, Result};

use crate::domain::{
    analysis::ProvisioningAnalysis, ports::OutputWriter, row::NetworkConfigRow,
};

/// Reverse-converted rows, one per analysed entry, ready to re-import into
/// the spreadsheet the review started from.
pub struct CsvWriter;

impl OutputWriter for CsvWriter {
    fn format(&self, analysis: &ProvisioningAnalysis) -> Result<String> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(Vec::new());

        for comparison in &analysis.entries {
            writer
                .serialize(NetworkConfigRow::from(&comparison.entry))
                .with_context(|| format!("Failed to write row for {}", comparison.entry.key()))?;
        }

        let bytes = writer.into_inner().context("Failed to flush CSV output")?;
        Ok(String::from_utf8(bytes)?)
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
