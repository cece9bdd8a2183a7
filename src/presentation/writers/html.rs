use anyhow::Result;
use sailfish::TemplateOnce;

use crate::domain::{
    analysis::{EntryComparison, FieldStatus, ProvisioningAnalysis},
    ports::OutputWriter,
};

struct EntryView {
    key: String,
    source: &'static str,
    status: &'static str,
    score: String,
    fields: Vec<FieldView>,
}

struct FieldView {
    field: String,
    input: String,
    fetched: String,
    status: &'static str,
    /// CSS class: `ok`, `bad` or `warn`.
    class: &'static str,
}

impl From<&EntryComparison> for EntryView {
    fn from(e: &EntryComparison) -> Self {
        EntryView {
            key: e.entry.key().to_string(),
            source: e.entry.source().as_str(),
            status: e.overall_status.as_str(),
            score: format!("{:.1}", e.match_score),
            fields: e
                .comparisons
                .iter()
                .map(|c| FieldView {
                    field: c.field.clone(),
                    input: c.input_value.clone().unwrap_or_default(),
                    fetched: c.fetched_value.clone().unwrap_or_default(),
                    status: c.status.as_str(),
                    class: match c.status {
                        FieldStatus::Match | FieldStatus::BothMissing => "ok",
                        FieldStatus::Mismatch => "bad",
                        FieldStatus::InputOnly | FieldStatus::FetchedOnly => "warn",
                    },
                })
                .collect(),
        }
    }
}

#[derive(TemplateOnce)]
#[template(path = "html/analysis.stpl")] // base dir declared inside sailfish.toml
struct AnalysisTemplate<'a> {
    analysis: &'a ProvisioningAnalysis,
    entries: Vec<EntryView>,
}

pub struct HtmlWriter;

impl OutputWriter for HtmlWriter {
    fn format(&self, analysis: &ProvisioningAnalysis) -> Result<String> {
        let entries = analysis.entries.iter().map(EntryView::from).collect();
        Ok(AnalysisTemplate { analysis, entries }.render_once()?)
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
