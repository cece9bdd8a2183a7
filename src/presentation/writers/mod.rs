use crate::domain::{analysis::ProvisioningAnalysis, ports::OutputWriter};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use self::{csv::CsvWriter, html::HtmlWriter, json::JsonWriter};

pub mod csv;
pub mod html;
pub mod json;

/// Register available writers - OCP: add new ones without touching main.rs
pub fn all_writers() -> Vec<Box<dyn OutputWriter>> {
    vec![Box::new(JsonWriter), Box::new(HtmlWriter), Box::new(CsvWriter)]
}

pub fn writer_for(format: &str) -> Option<Box<dyn OutputWriter>> {
    match format {
        "json" => Some(Box::new(JsonWriter)),
        "html" => Some(Box::new(HtmlWriter)),
        "csv" => Some(Box::new(CsvWriter)),
        _ => None,
    }
}

/// Writes the analysis to `<dir>/<analysis_id>.<ext>` and returns the path.
pub fn write_to_file(
    writer: &dyn OutputWriter,
    analysis: &ProvisioningAnalysis,
    dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let content = writer.format(analysis)?;
    let path = dir.join(format!("{}.{}", analysis.analysis_id, writer.extension()));
    fs::write(&path, &content)?;
    Ok(path)
}
