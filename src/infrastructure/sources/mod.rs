use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;

use crate::domain::ports::RowSource;

pub mod controller;
pub mod rows;

pub use controller::JsonControllerSource;
pub use rows::{CsvRowSource, JsonRowSource};

/// Pick a row source for `path` from its extension (`json` or `csv`).
pub fn open_row_source(path: &str) -> Result<Arc<dyn RowSource>> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => Ok(Arc::new(JsonRowSource::new(path))),
        Some("csv") => Ok(Arc::new(CsvRowSource::new(path))),
        _ => bail!("Unsupported row export '{}': expected a .json or .csv file", path),
    }
}
