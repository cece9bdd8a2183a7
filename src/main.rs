use anyhow::Result;
use chrono::Local;
use clap::Parser;
use linkrecon::presentation::cli_summary::{print_perf_summary, print_summary};
use linkrecon::presentation::writers::{all_writers, write_to_file, writer_for};
use linkrecon::{AppConfig, LogLevel};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "linkrecon",
    about = "Reconcile cabling spreadsheets against a fabric blueprint."
)]
struct Cli {
    /// Config file. Defaults to ./linkrecon.toml, then the user config dir.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the summary without writing reports.
    #[arg(long)]
    dry_run: bool,

    #[arg(short, long, default_value = "all", value_parser = ["all", "json", "html", "csv"])]
    format: String,

    /// Print per-stage timings.
    #[arg(long)]
    perf: bool,

    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    linkrecon::init_tracing(match (cli.verbose, cli.quiet) {
        (true, _) => LogLevel::Debug,
        (_, true) => LogLevel::Error,
        _ => LogLevel::Info,
    });

    let config_path = cli.config.unwrap_or_else(AppConfig::default_path);
    let cfg = AppConfig::load(&config_path.to_string_lossy())?;
    let (reconciliation, perf) = linkrecon::run_with_timing(&cfg).await?;

    if !reconciliation.merged {
        warn!("controller snapshot unavailable, report covers spreadsheet rows only");
    }

    print_summary(&reconciliation.analysis);
    if cli.perf {
        print_perf_summary(&perf);
    }

    if cli.dry_run {
        return Ok(());
    }

    // --- one subdirectory per run, grouped by blueprint ---
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let blueprint = cfg.controller.blueprint.as_deref().unwrap_or("default");
    let output_subdir = Path::new(&cfg.output.dir)
        .join(blueprint)
        .join(format!("{}_{}", timestamp, reconciliation.analysis.analysis_id));

    match cli.format.as_str() {
        "all" => {
            for writer in all_writers() {
                write_to_file(&*writer, &reconciliation.analysis, &output_subdir)?;
            }
        }
        fmt => {
            let writer =
                writer_for(fmt).ok_or_else(|| anyhow::anyhow!("Unknown format: {}", fmt))?;
            write_to_file(&*writer, &reconciliation.analysis, &output_subdir)?;
        }
    }

    println!("Analysis written to {}", output_subdir.display());

    Ok(())
}
