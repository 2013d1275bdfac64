//! Run projection for the entire model point table
//!
//! Projects every model point in parallel and writes the cashflows and
//! present values summed across the block

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use term_projection::output::{self, BlockReport};
use term_projection::{ModelRunner, ProjectionConfig, DEFAULT_DATA_PATH};

#[derive(Parser)]
#[command(name = "run_block")]
#[command(about = "Project all model points and aggregate the results")]
struct Cli {
    /// Directory holding model_point_table.csv, mort_table.csv and disc_rate_ann.csv
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    data_dir: PathBuf,

    /// JSON projection config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for result files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    threads: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = match &cli.config {
        Some(path) => ProjectionConfig::from_json_path(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ProjectionConfig::default(),
    };

    let start = Instant::now();
    let runner = ModelRunner::from_csv_path(&cli.data_dir, config)
        .with_context(|| format!("Failed to load data from {}", cli.data_dir.display()))?;
    println!("Loaded {} model points in {:?}", runner.table().len(), start.elapsed());

    let proj_start = Instant::now();
    let block = runner.run_block()?;
    println!("Projections complete in {:?}", proj_start.elapsed());

    std::fs::create_dir_all(&cli.output_dir)?;

    let cf_path = cli.output_dir.join("block_result_cf.csv");
    output::write_result_cf(output::create_file(&cf_path)?, block.result_cf())?;

    let pv_path = cli.output_dir.join("block_result_pv.csv");
    output::write_result_pv(output::create_file(&pv_path)?, &block.result_pv())?;

    let json_path = cli.output_dir.join("block_summary.json");
    output::write_json(output::create_file(&json_path)?, &BlockReport::new(&block))?;

    println!("\nBlock Summary:");
    println!("  Model points: {}", block.point_count);
    println!("  Periods: {}", block.cashflows.len());
    for row in block.result_pv() {
        println!("  {:<14} {:>16.2} {:>9.2}%", row.item, row.pv, row.pct_premium * 100.0);
    }
    if block.failed_checks.is_empty() && block.check_pv_net_cf() {
        println!("  PV check: OK");
    } else {
        println!("  PV check: FAILED for points {:?}", block.failed_checks);
    }

    println!("\nOutput written to {}", cli.output_dir.display());
    println!("Total time: {:?}", start.elapsed());
    Ok(())
}
