use crate::application::monitoring::PerfReport;
use crate::domain::analysis::{OverallStatus, ProvisioningAnalysis};
use colored::*;
use tabled::settings::{object::Columns, Alignment, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    connection: String,
    status: String,
    #[tabled(rename = "score (%)")]
    score: String,
    mismatched: String,
}

#[derive(Tabled)]
struct SummaryRow {
    metric: String,
    value: String,
}

fn colored_status(status: OverallStatus) -> String {
    let s = status.as_str();
    match status {
        OverallStatus::CompleteMatch => s.green().to_string(),
        OverallStatus::PartialMatch => s.yellow().to_string(),
        OverallStatus::NoMatch => s.red().to_string(),
        OverallStatus::InputOnly => s.blue().to_string(),
        OverallStatus::FetchedOnly => s.magenta().to_string(),
    }
}

pub fn print_summary(analysis: &ProvisioningAnalysis) {
    println!();

    println!("{}", "LINKRECON ANALYSIS".bold().cyan());
    println!("Analysis: {}", analysis.analysis_id.bright_yellow());
    println!();

    if analysis.total_entries == 0 {
        println!("{}", "No entries to analyse.".italic());
        return;
    }

    // Complete matches are the quiet majority; only list what needs review.
    let rows: Vec<EntryRow> = analysis
        .entries
        .iter()
        .filter(|e| e.overall_status != OverallStatus::CompleteMatch)
        .map(|e| EntryRow {
            connection: e.entry.key().as_str().bold().to_string(),
            status: colored_status(e.overall_status),
            score: format!("{:.1}", e.match_score),
            mismatched: e
                .comparisons
                .iter()
                .filter(|c| !c.matches && c.input_value.is_some() && c.fetched_value.is_some())
                .map(|c| c.field.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    if rows.is_empty() {
        println!("{}", "✓ Every entry matches the blueprint.".bold().green());
    } else {
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..=2)).with(Alignment::right()))
            .to_string();
        println!("{table}");
    }

    let summary_rows = vec![
        SummaryRow {
            metric: "Complete matches".into(),
            value: analysis.complete_matches.to_string().green().to_string(),
        },
        SummaryRow {
            metric: "Partial matches".into(),
            value: analysis.partial_matches.to_string().yellow().to_string(),
        },
        SummaryRow {
            metric: "No matches".into(),
            value: analysis.no_matches.to_string().red().to_string(),
        },
        SummaryRow {
            metric: "Input only".into(),
            value: analysis.input_only_entries.to_string().blue().to_string(),
        },
        SummaryRow {
            metric: "Only in blueprint".into(),
            value: analysis.fetched_only_entries.to_string().magenta().to_string(),
        },
        SummaryRow {
            metric: "Total entries".into(),
            value: analysis.total_entries.to_string().bold().to_string(),
        },
    ];

    let summary_table = Table::new(summary_rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..=1)).with(Alignment::right()))
        .to_string();

    println!();
    println!("{summary_table}");
    println!();
}

// ─── Performance summary ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct PerfRow {
    operation: String,
    target: String,
    records: String,
    #[tabled(rename = "time (ms)")]
    duration_ms: String,
}

/// Print a performance timing table to stdout.
pub fn print_perf_summary(report: &PerfReport) {
    if report.timings.is_empty() {
        return;
    }

    println!("{}", "PERFORMANCE".bold().cyan());

    let rows: Vec<PerfRow> = report
        .timings
        .iter()
        .map(|t| PerfRow {
            operation: t.operation.dimmed().to_string(),
            target: t.target.bold().to_string(),
            records: t.records.to_string(),
            duration_ms: format_duration(t.duration_ms),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..=3)).with(Alignment::right()))
        .to_string();

    println!("{table}");

    println!(
        "  Total: {} record(s) fetched  ·  {} ms elapsed",
        report.total_records_fetched.to_string().bold(),
        format_duration(report.total_ms),
    );
    println!();
}

fn format_duration(ms: u128) -> String {
    if ms >= 1_000 {
        format!("{:.1}s", ms as f64 / 1_000.0).yellow().to_string()
    } else if ms >= 100 {
        ms.to_string().yellow().to_string()
    } else {
        ms.to_string().green().to_string()
    }
}
