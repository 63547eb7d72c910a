use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use mineral_forecast::mineral::{MineralId, MineralSpec};
use mineral_forecast::pipeline::{run_all, PipelineOptions};
use std::path::PathBuf;

/// Draw production forecast charts for critical minerals
#[derive(Debug, Parser)]
#[command(name = "mineral-forecast", version, about)]
struct Cli {
    /// Directory containing the data_*.txt files
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Existing directory the PNG charts are written to
    #[arg(long, default_value = "plots")]
    plots_dir: PathBuf,

    /// Only chart these minerals (repeatable); all five by default
    #[arg(long = "mineral", value_enum)]
    minerals: Vec<MineralId>,

    /// Also write the charted history and forecast as <Name>.csv
    #[arg(long)]
    export_csv: bool,

    /// Print ARIMA fit summaries as JSON
    #[arg(long)]
    summary_json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let options = PipelineOptions {
        data_dir: cli.data_dir,
        plots_dir: cli.plots_dir,
        export_csv: cli.export_csv,
        summary_json: cli.summary_json,
    };

    let specs: Vec<MineralSpec> = MineralSpec::catalog()?
        .into_iter()
        .filter(|spec| cli.minerals.is_empty() || cli.minerals.contains(&spec.id))
        .collect();

    let reports = run_all(&specs, &options)?;
    info!("Drew {} charts in {}", reports.len(), options.plots_dir.display());

    Ok(())
}
